use const_format::formatcp;
use phf::phf_set;

pub(crate) mod localization {
    pub const EXTRACTED_FILE_MSG: &str = "Extracted.";
    pub const PATCHED_FILE_MSG: &str = "Patched.";
    pub const WROTE_CORPUS_MSG: &str = "Wrote corpus.";
    pub const WROTE_STORE_MSG: &str = "Wrote unit store.";

    pub const PRIMARY_DECODE_FAILED_MSG: &str =
        "Couldn't decode with the primary encoding, trying the fallback.";
    pub const CORPUS_LENGTH_MISMATCH_MSG: &str = "Corpus line count doesn't match the stored unit count. \
                                                  Translations are assigned positionally and may land on wrong lines.";
}

/// First non-whitespace characters that mark a line as a command, label or comment.
///
/// `[` opens a tag, `*` declares a label, `;` starts a comment.
pub const COMMAND_PREFIXES: phf::Set<char> = phf_set! {
    '[', '*', ';'
};

/// Soft line break. Text ending with it continues on the next physical line.
pub const GROUPING_CODE: &str = "[r]";

pub const PLACEHOLDER_PREFIX: &str = "<<<TRANS:";
pub const PLACEHOLDER_SUFFIX: &str = ">>>";
pub(crate) const PLACEHOLDER_PATTERN: &str = formatcp!(
    r"^{}(?P<file>.+)-(?P<index>\d+){}$",
    PLACEHOLDER_PREFIX,
    PLACEHOLDER_SUFFIX
);

/// Trailing run of bracketed tags, preceded by the lazily matched text.
pub(crate) const SUFFIX_PATTERN: &str =
    r"^(?P<text>.*?)(?P<eol>(?:\[[^\]]+\])+)$";

pub const DEFAULT_WRAP_WIDTH: usize = 40;

pub const STORE_FILE_NAME: &str = "trans.json";

pub const DEFAULT_CORPUS_PATH: &str = "./project/source/trans.txt";
pub const DEFAULT_TRANSLATED_CORPUS_PATH: &str = "./project/target/trans.txt";
pub const DEFAULT_WORK_DIR: &str = "./working/";
pub const DEFAULT_PATCH_DIR: &str = "./patch/";
