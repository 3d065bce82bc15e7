//! Line classification and grouping.
//!
//! A script file is walked one physical line at a time. Command, label, comment and
//! empty lines pass through to the skeleton untouched. Prose lines are merged into
//! logical units: a line ending with the grouping code, or with no bracketed suffix at
//! all, continues the current unit, and any other trailing suffix closes it. Closed
//! units are replaced in the skeleton by a single placeholder, positioned at the line
//! that closed them and keyed by the line that opened them.

use crate::{
    constants::{COMMAND_PREFIXES, SUFFIX_PATTERN},
    functions::placeholder_key,
    types::{
        GroupState, LineKind, ScanSettings, ScannedFile, SkeletonLine, Suffix,
        TranslationUnit,
    },
};
use log::debug;
use regex::Regex;
use std::cell::LazyCell;

thread_local! {
    static SUFFIX_RE: LazyCell<Regex> = LazyCell::new(|| unsafe {
        Regex::new(SUFFIX_PATTERN).unwrap_unchecked()
    });
}

pub struct Scanner<'a> {
    settings: &'a ScanSettings,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(settings: &'a ScanSettings) -> Self {
        Self { settings }
    }

    /// Decides whether `line` is a control line, suffixed prose or bare prose.
    ///
    /// Prose is returned whitespace-trimmed; the suffix is the whole trailing run of
    /// bracketed tags, so `text[l][r]` terminates with `[l][r]`. Only a truly empty
    /// line is blank: a whitespace-only line is bare prose with no text.
    pub fn classify<'l>(&self, line: &'l str) -> LineKind<'l> {
        let trimmed: &str = line.trim();

        if line.is_empty()
            || trimmed.starts_with(|c: char| COMMAND_PREFIXES.contains(&c))
        {
            return LineKind::Control;
        }

        let captures: Option<(&str, &str)> = SUFFIX_RE.with(|re| {
            re.captures(trimmed).and_then(|captures| {
                Some((
                    captures.name("text")?.as_str(),
                    captures.name("eol")?.as_str(),
                ))
            })
        });

        match captures {
            Some((text, eol)) => LineKind::Suffixed {
                text,
                suffix: if eol == self.settings.grouping_code {
                    Suffix::Grouping
                } else {
                    Suffix::Terminating(eol)
                },
            },
            None => LineKind::Bare(trimmed),
        }
    }

    /// Scans a whole file, producing its skeleton and the units extracted from it.
    ///
    /// `file_name` scopes every key, so files scanned in one run never collide as long
    /// as their names differ.
    pub fn scan(&self, file_name: &str, content: &str) -> ScannedFile {
        let (state, mut scanned): (GroupState, ScannedFile) = content.lines().enumerate().fold(
            (GroupState::Idle, ScannedFile::default()),
            |(state, mut scanned), (index, line)| {
                let state: GroupState =
                    self.step(state, file_name, index, line, &mut scanned);
                (state, scanned)
            },
        );

        Self::flush(state, &mut scanned);

        debug!(
            "{file_name}: {} skeleton lines, {} units",
            scanned.skeleton.len(),
            scanned.units.len()
        );

        scanned
    }

    fn step(
        &self,
        state: GroupState,
        file_name: &str,
        index: usize,
        line: &str,
        scanned: &mut ScannedFile,
    ) -> GroupState {
        match self.classify(line) {
            LineKind::Control => {
                Self::flush(state, scanned);
                scanned.skeleton.push(SkeletonLine::Verbatim(line.to_owned()));
                GroupState::Idle
            }

            LineKind::Suffixed {
                text,
                suffix: Suffix::Grouping,
            }
            | LineKind::Bare(text) => match state {
                GroupState::Idle => GroupState::InProgress {
                    key: placeholder_key(file_name, index),
                    text: text.to_owned(),
                },
                GroupState::InProgress { key, text: mut group } => {
                    group.push_str(text);
                    GroupState::InProgress { key, text: group }
                }
            },

            LineKind::Suffixed {
                text,
                suffix: Suffix::Terminating(eol),
            } => {
                let unit: TranslationUnit = match state {
                    GroupState::Idle => TranslationUnit::new(
                        placeholder_key(file_name, index),
                        text,
                        eol,
                    ),
                    GroupState::InProgress { key, text: mut group } => {
                        group.push_str(text);
                        TranslationUnit::new(key, group, eol)
                    }
                };

                Self::emit(unit, scanned);
                GroupState::Idle
            }
        }
    }

    /// Closes an open group with an empty suffix.
    ///
    /// A group that only ever saw whitespace-only lines has nothing to translate and
    /// is dropped along with those lines.
    fn flush(state: GroupState, scanned: &mut ScannedFile) {
        match state {
            GroupState::InProgress { key, text } if text.is_empty() => {
                debug!("{key}: dropped group without text");
            }
            GroupState::InProgress { key, text } => {
                Self::emit(TranslationUnit::new(key, text, String::new()), scanned);
            }
            GroupState::Idle => {}
        }
    }

    fn emit(unit: TranslationUnit, scanned: &mut ScannedFile) {
        scanned
            .skeleton
            .push(SkeletonLine::Placeholder(unit.key.clone()));
        scanned.units.push(unit);
    }
}
