use crate::constants::{DEFAULT_WRAP_WIDTH, GROUPING_CODE};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::{io, path::PathBuf};
use strum_macros::{Display, EnumIs};
use thiserror::Error;

/// One logical piece of translatable text, plus the control codes that closed it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Placeholder token, unique within an extraction run.
    pub key: String,
    /// Trimmed source lines concatenated without separators.
    pub text: String,
    /// Terminating bracketed suffix, byte-for-byte. Empty when the unit was closed
    /// by a command line or by the end of the file.
    pub eol: String,
}

impl TranslationUnit {
    pub fn new(
        key: impl Into<String>,
        text: impl Into<String>,
        eol: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            eol: eol.into(),
        }
    }
}

/// A line of a skeleton file.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs)]
pub enum SkeletonLine {
    /// Command, label, comment or blank line, kept verbatim.
    Verbatim(String),
    /// Placeholder key standing in for one [`TranslationUnit`].
    Placeholder(String),
}

impl SkeletonLine {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Verbatim(line) | Self::Placeholder(line) => line,
        }
    }
}

/// Classification of a trailing control code suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum Suffix<'a> {
    /// Soft wrap: the logical line continues on the next physical line.
    Grouping,
    /// Any other bracketed run; closes the logical line and is kept on the unit.
    Terminating(&'a str),
}

/// What a single physical line is, as far as extraction is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs)]
pub enum LineKind<'a> {
    /// Empty, whitespace-only, or starting with a command prefix.
    Control,
    /// Prose followed by a bracketed suffix.
    Suffixed { text: &'a str, suffix: Suffix<'a> },
    /// Prose with no suffix at all: an implicit continuation.
    Bare(&'a str),
}

/// Grouping state carried from one physical line to the next.
#[derive(Debug, Default, Clone, PartialEq, Eq, EnumIs)]
pub enum GroupState {
    #[default]
    Idle,
    InProgress { key: String, text: String },
}

/// Result of scanning one source file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub skeleton: Vec<SkeletonLine>,
    pub units: Vec<TranslationUnit>,
}

impl ScannedFile {
    /// Skeleton file contents, lines joined by `\n` with no trailing newline.
    #[must_use]
    pub fn skeleton_text(&self) -> String {
        let lines: Vec<&str> =
            self.skeleton.iter().map(SkeletonLine::as_str).collect();
        lines.join("\n")
    }
}

/// How to treat a translated corpus whose line count differs from the unit count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CorpusCheck {
    /// Refuse to insert anything.
    #[default]
    Strict,
    /// Zip positionally, truncating to the shorter side, and log a warning.
    Lenient,
}

/// Knobs shared by extraction and insertion.
///
/// Both runs over one set of artifacts must use the same settings, otherwise keys
/// and skeleton files won't line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Tried first when decoding, and always used for writing.
    pub primary_encoding: &'static Encoding,
    /// Tried when the primary encoding can't decode a file.
    pub fallback_encoding: &'static Encoding,
    /// Suffix that continues a logical line instead of closing it.
    pub grouping_code: String,
    /// Column width translated text is wrapped to on insertion.
    pub wrap_width: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            primary_encoding: encoding_rs::SHIFT_JIS,
            fallback_encoding: encoding_rs::UTF_8,
            grouping_code: GROUPING_CODE.to_owned(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub units: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertSummary {
    pub files: usize,
    pub replaced: usize,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: IO error occurred: {1}")]
    Io(PathBuf, io::Error),
    #[error("{0}: couldn't be decoded with either the primary or the fallback encoding.")]
    Decode(PathBuf),
    #[error("{path}: character {character:?} can't be represented in the output encoding.")]
    Encode { path: PathBuf, character: char },
    #[error("Placeholder {0} has no matching entry. The corpus, skeleton files and unit store likely come from different runs.")]
    UnknownKey(String),
    #[error("Key {0} was inserted into the unit store twice.")]
    DuplicateKey(String),
    #[error("File name {0} was extracted twice. Skeleton files are keyed by file name, so input names must be unique.")]
    DuplicateFile(String),
    #[error("Translated corpus has {actual} lines, but the unit store holds {expected} units.")]
    CorpusLengthMismatch { expected: usize, actual: usize },
    #[error("Parsing the unit store failed with: {0}")]
    StoreParse(#[from] serde_json::Error),
}
