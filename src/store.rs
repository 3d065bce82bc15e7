use crate::{
    constants::localization::CORPUS_LENGTH_MISMATCH_MSG,
    functions::read_to_string_without_bom,
    types::{CorpusCheck, Error, TranslationUnit},
};
use indexmap::{map::Entry, IndexMap};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs::write, path::Path};

/// On-disk shape of the store.
#[derive(Serialize, Deserialize)]
struct StoreFile {
    files: Vec<String>,
    units: Vec<TranslationUnit>,
}

/// Ordered mapping from placeholder key to [`TranslationUnit`].
///
/// Built append-only during extraction, then persisted next to the skeleton files so
/// insertion can look up every unit's suffix. Iteration order is extraction order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnitStore {
    files: Vec<String>,
    units: IndexMap<String, TranslationUnit>,
}

impl UnitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a unit.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateKey`] - if a unit with the same key is already stored.
    pub fn insert(&mut self, unit: TranslationUnit) -> Result<(), Error> {
        match self.units.entry(unit.key.clone()) {
            Entry::Occupied(entry) => Err(Error::DuplicateKey(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(unit);
                Ok(())
            }
        }
    }

    /// Registers a scanned file together with the units extracted from it.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateFile`] - if a file with the same name was already added.
    /// - [`Error::DuplicateKey`] - if any of the units' keys is already stored.
    pub fn push_file(
        &mut self,
        file_name: &str,
        units: impl IntoIterator<Item = TranslationUnit>,
    ) -> Result<(), Error> {
        if self.files.iter().any(|file| file == file_name) {
            return Err(Error::DuplicateFile(file_name.to_owned()));
        }

        self.files.push(file_name.to_owned());

        for unit in units {
            self.insert(unit)?;
        }

        Ok(())
    }

    /// Looks up the unit behind a placeholder.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownKey`] - if `key` isn't stored.
    pub fn lookup(&self, key: &str) -> Result<&TranslationUnit, Error> {
        self.units
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_owned()))
    }

    pub fn all_units_in_order(
        &self,
    ) -> impl ExactSizeIterator<Item = &TranslationUnit> {
        self.units.values()
    }

    /// Names of the skeleton files, in extraction order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Translator-facing corpus: every unit's text on its own `\n`-terminated line.
    #[must_use]
    pub fn corpus(&self) -> String {
        let mut corpus: String = String::with_capacity(
            self.units.values().map(|unit| unit.text.len() + 1).sum(),
        );

        for unit in self.units.values() {
            corpus.push_str(&unit.text);
            corpus.push('\n');
        }

        corpus
    }

    /// Pairs translated corpus lines with stored units by position.
    ///
    /// The result holds the same keys, suffixes and files, with each unit's text
    /// replaced by its translation. Corpus lines carry no keys, so the N-th line always
    /// lands on the N-th unit.
    ///
    /// # Errors
    ///
    /// - [`Error::CorpusLengthMismatch`] - if line and unit counts differ under [`CorpusCheck::Strict`].
    pub fn rebind(
        &self,
        corpus: &str,
        check: CorpusCheck,
    ) -> Result<UnitStore, Error> {
        let lines: Vec<&str> = corpus.lines().collect();

        if lines.len() != self.units.len() {
            if check.is_strict() {
                return Err(Error::CorpusLengthMismatch {
                    expected: self.units.len(),
                    actual: lines.len(),
                });
            }

            warn!(
                "{CORPUS_LENGTH_MISMATCH_MSG} Expected {}, got {} ({check} check).",
                self.units.len(),
                lines.len()
            );
        }

        let units: IndexMap<String, TranslationUnit> = self
            .units
            .iter()
            .zip(lines)
            .map(|((key, unit), line)| {
                (
                    key.clone(),
                    TranslationUnit::new(key.as_str(), line, unit.eol.as_str()),
                )
            })
            .collect();

        Ok(UnitStore {
            files: self.files.clone(),
            units,
        })
    }

    /// Serializes the store to JSON.
    ///
    /// # Errors
    ///
    /// - [`Error::StoreParse`] - if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        let file: StoreFile = StoreFile {
            files: self.files.clone(),
            units: self.units.values().cloned().collect(),
        };

        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Deserializes a store previously produced by [`UnitStore::to_json`].
    ///
    /// # Errors
    ///
    /// - [`Error::StoreParse`] - if `json` isn't a valid store.
    /// - [`Error::DuplicateKey`] - if the same key appears twice.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let file: StoreFile = serde_json::from_str(json)?;
        let mut store: UnitStore = Self {
            files: file.files,
            units: IndexMap::with_capacity(file.units.len()),
        };

        for unit in file.units {
            store.insert(unit)?;
        }

        Ok(store)
    }

    /// Writes the store to `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] - if writing fails.
    /// - [`Error::StoreParse`] - if serialization fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path: &Path = path.as_ref();
        write(path, self.to_json()?)
            .map_err(|e| Error::Io(path.to_path_buf(), e))
    }

    /// Reads a store written by [`UnitStore::save`].
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] - if reading fails.
    /// - [`Error::StoreParse`] - if the file isn't a valid store.
    /// - [`Error::DuplicateKey`] - if the same key appears twice.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json: String = read_to_string_without_bom(path)?;
        Self::from_json(&json)
    }
}
