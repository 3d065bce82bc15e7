use crate::{
    constants::{
        localization::{
            EXTRACTED_FILE_MSG, PATCHED_FILE_MSG, WROTE_CORPUS_MSG,
            WROTE_STORE_MSG,
        },
        STORE_FILE_NAME,
    },
    functions::{
        encode_lossy, encode_strict, read_to_string_without_bom,
        read_with_fallback,
    },
    reinsert::weave,
    scanner::Scanner,
    store::UnitStore,
    types::{
        CorpusCheck, Error, ExtractSummary, InsertSummary, ScanSettings,
        ScannedFile,
    },
};
use log::info;
use std::{
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

fn create_dir<P: AsRef<Path>>(path: P) -> Result<(), Error> {
    let path: &Path = path.as_ref();

    if path.as_os_str().is_empty() {
        return Ok(());
    }

    create_dir_all(path).map_err(|e| Error::Io(path.to_path_buf(), e))
}

fn write_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<(), Error> {
    let path: &Path = path.as_ref();
    write(path, content).map_err(|e| Error::Io(path.to_path_buf(), e))
}

fn file_name_of(path: &Path) -> Result<String, Error> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Io(
                path.to_path_buf(),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path has no file name",
                ),
            )
        })
}

/// Extracts translatable text from script files.
///
/// Produces three artifacts:
///
/// - a skeleton copy of every input file in the working directory, with text replaced by placeholders;
/// - the unit store (`trans.json` by default) in the working directory;
/// - the flat corpus, one unit per line, for translators.
///
/// # Example
///
/// ```no_run
/// use kstr::Extractor;
///
/// let extractor = Extractor::new();
/// extractor.extract(&["scenario/first.ks"], "project/source/trans.txt", "working")?;
/// # Ok::<(), kstr::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    settings: ScanSettings,
    store_file_name: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            settings: ScanSettings::default(),
            store_file_name: STORE_FILE_NAME.to_owned(),
        }
    }
}

impl Extractor {
    /// Creates a new [`Extractor`] with Shift_JIS/UTF-8 decoding, `[r]` grouping and a 40 column width.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scan settings. Insertion must later use the same ones.
    pub fn set_settings(&mut self, settings: ScanSettings) {
        self.settings = settings;
    }

    /// Sets the file name of the unit store inside the working directory.
    pub fn set_store_file_name(&mut self, name: impl Into<String>) {
        self.store_file_name = name.into();
    }

    /// Extracts `input_files` into `work_dir` and writes the corpus to `corpus_path`.
    ///
    /// Files are processed one by one, in the given order. Missing directories are created.
    ///
    /// # Parameters
    ///
    /// - `input_files` - Script files to extract. Their file names must be unique.
    /// - `corpus_path` - Where to write the translator-facing corpus.
    /// - `work_dir` - Directory for skeleton files and the unit store.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] - if any I/O operation fails.
    /// - [`Error::Decode`] - if a file can't be decoded with either encoding.
    /// - [`Error::Encode`] - if a skeleton line can't be written in the primary encoding.
    /// - [`Error::DuplicateFile`] - if two input files share a name.
    pub fn extract<P: AsRef<Path>, C: AsRef<Path>, W: AsRef<Path>>(
        &self,
        input_files: &[P],
        corpus_path: C,
        work_dir: W,
    ) -> Result<ExtractSummary, Error> {
        let corpus_path: &Path = corpus_path.as_ref();
        let work_dir: &Path = work_dir.as_ref();

        create_dir(work_dir)?;

        if let Some(parent) = corpus_path.parent() {
            create_dir(parent)?;
        }

        let scanner: Scanner = Scanner::new(&self.settings);
        let mut store: UnitStore = UnitStore::new();

        for input_file in input_files {
            let input_file: &Path = input_file.as_ref();
            let file_name: String = file_name_of(input_file)?;

            let content: String = read_with_fallback(input_file, &self.settings)?;
            let scanned: ScannedFile = scanner.scan(&file_name, &content);

            let skeleton_path: PathBuf = work_dir.join(&file_name);
            let skeleton: Vec<u8> = encode_strict(
                self.settings.primary_encoding,
                &scanned.skeleton_text(),
            )
            .map_err(|character| Error::Encode {
                path: skeleton_path.clone(),
                character,
            })?;

            store.push_file(&file_name, scanned.units)?;
            write_file(&skeleton_path, &skeleton)?;

            info!("{file_name}: {EXTRACTED_FILE_MSG}");
        }

        write_file(corpus_path, store.corpus().as_bytes())?;
        info!("{}: {WROTE_CORPUS_MSG}", corpus_path.display());

        let store_path: PathBuf = work_dir.join(&self.store_file_name);
        store.save(&store_path)?;
        info!("{}: {WROTE_STORE_MSG}", store_path.display());

        Ok(ExtractSummary {
            files: store.files().len(),
            units: store.len(),
        })
    }
}

/// A builder struct for [`Extractor`].
///
/// # Example
///
/// ```
/// use kstr::{ExtractorBuilder, ScanSettings};
///
/// let extractor = ExtractorBuilder::new()
///     .with_settings(ScanSettings { wrap_width: 32, ..Default::default() })
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    extractor: Extractor,
}

impl ExtractorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ScanSettings) -> Self {
        self.extractor.settings = settings;
        self
    }

    #[must_use]
    pub fn store_file_name(mut self, name: impl Into<String>) -> Self {
        self.extractor.store_file_name = name.into();
        self
    }

    #[must_use]
    pub fn build(self) -> Extractor {
        self.extractor
    }
}

/// Weaves a translated corpus back into the skeleton files of a previous extraction.
///
/// Every placeholder is replaced by its translation, wrapped to the configured width
/// with the grouping code as a soft break, followed by the unit's original suffix.
/// Output is written in the primary encoding; characters it can't represent become `?`.
/// Nothing is written unless every file weaves cleanly.
///
/// # Example
///
/// ```no_run
/// use kstr::{CorpusCheck, InserterBuilder};
///
/// let inserter = InserterBuilder::new().corpus_check(CorpusCheck::Strict).build();
/// inserter.insert("project/target/trans.txt", "patch", "working")?;
/// # Ok::<(), kstr::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Inserter {
    settings: ScanSettings,
    store_file_name: String,
    corpus_check: CorpusCheck,
}

impl Default for Inserter {
    fn default() -> Self {
        Self {
            settings: ScanSettings::default(),
            store_file_name: STORE_FILE_NAME.to_owned(),
            corpus_check: CorpusCheck::Strict,
        }
    }
}

impl Inserter {
    /// Creates a new [`Inserter`] with default settings and [`CorpusCheck::Strict`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scan settings. They must match the ones used for extraction.
    pub fn set_settings(&mut self, settings: ScanSettings) {
        self.settings = settings;
    }

    /// Sets the file name of the unit store inside the working directory.
    pub fn set_store_file_name(&mut self, name: impl Into<String>) {
        self.store_file_name = name.into();
    }

    /// Sets what happens when the corpus and the store disagree on the number of units. See [`CorpusCheck`].
    pub fn set_corpus_check(&mut self, check: CorpusCheck) {
        self.corpus_check = check;
    }

    /// Patches the skeleton files in `work_dir` with the translations from `corpus_path`.
    ///
    /// # Parameters
    ///
    /// - `corpus_path` - Translated corpus, UTF-8, one unit per line in extraction order.
    /// - `output_dir` - Directory for the patched files. Created if missing.
    /// - `work_dir` - Directory holding the skeleton files and unit store from extraction.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] - if any I/O operation fails.
    /// - [`Error::StoreParse`] - if the unit store is malformed.
    /// - [`Error::CorpusLengthMismatch`] - if the corpus has the wrong number of lines under [`CorpusCheck::Strict`].
    /// - [`Error::Decode`] - if a skeleton file can't be decoded.
    /// - [`Error::UnknownKey`] - if a skeleton placeholder has no translation.
    pub fn insert<C: AsRef<Path>, O: AsRef<Path>, W: AsRef<Path>>(
        &self,
        corpus_path: C,
        output_dir: O,
        work_dir: W,
    ) -> Result<InsertSummary, Error> {
        let output_dir: &Path = output_dir.as_ref();
        let work_dir: &Path = work_dir.as_ref();

        let store: UnitStore =
            UnitStore::load(work_dir.join(&self.store_file_name))?;
        let corpus: String = read_to_string_without_bom(corpus_path)?;
        let translations: UnitStore =
            store.rebind(&corpus, self.corpus_check)?;

        let mut summary: InsertSummary = InsertSummary::default();
        let mut patched_files: Vec<(&str, Vec<u8>)> =
            Vec::with_capacity(store.files().len());

        // Nothing is written until every file has woven.
        for file_name in store.files() {
            let skeleton_path: PathBuf = work_dir.join(file_name);
            let skeleton: String =
                read_with_fallback(&skeleton_path, &self.settings)?;

            let (patched, replaced): (String, usize) =
                weave(file_name, &skeleton, &translations, &self.settings)?;

            patched_files.push((
                file_name.as_str(),
                encode_lossy(self.settings.primary_encoding, &patched),
            ));

            summary.files += 1;
            summary.replaced += replaced;
        }

        create_dir(output_dir)?;

        for (file_name, patched) in patched_files {
            write_file(output_dir.join(file_name), &patched)?;
            info!("{file_name}: {PATCHED_FILE_MSG}");
        }

        Ok(summary)
    }
}

/// A builder struct for [`Inserter`].
///
/// # Example
///
/// ```
/// use kstr::{CorpusCheck, InserterBuilder};
///
/// let inserter = InserterBuilder::new().corpus_check(CorpusCheck::Lenient).build();
/// ```
#[derive(Debug, Default)]
pub struct InserterBuilder {
    inserter: Inserter,
}

impl InserterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ScanSettings) -> Self {
        self.inserter.settings = settings;
        self
    }

    #[must_use]
    pub fn store_file_name(mut self, name: impl Into<String>) -> Self {
        self.inserter.store_file_name = name.into();
        self
    }

    #[must_use]
    pub fn corpus_check(mut self, check: CorpusCheck) -> Self {
        self.inserter.corpus_check = check;
        self
    }

    #[must_use]
    pub fn build(self) -> Inserter {
        self.inserter
    }
}
