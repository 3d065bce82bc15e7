//! Library providing text extraction and reinsertion for KAG-style visual novel scripts (`.ks`).
//!
//! Extraction turns script files into a flat corpus with one translatable unit per line,
//! a skeleton copy of each file with text replaced by placeholder keys, and a unit store
//! that remembers each unit's trailing control codes. Insertion takes the translated
//! corpus and weaves it back into the skeletons.

mod constants;
mod functions;
mod processors;
mod reinsert;
mod scanner;
mod store;
mod types;

pub use constants::{
    COMMAND_PREFIXES, DEFAULT_CORPUS_PATH, DEFAULT_PATCH_DIR,
    DEFAULT_TRANSLATED_CORPUS_PATH, DEFAULT_WORK_DIR, DEFAULT_WRAP_WIDTH,
    GROUPING_CODE, PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX, STORE_FILE_NAME,
};
pub use functions::{
    encode_lossy, encode_strict, parse_placeholder, placeholder_key,
    read_to_string_without_bom, read_with_fallback,
};
pub use processors::{Extractor, ExtractorBuilder, Inserter, InserterBuilder};
pub use reinsert::{render_unit, weave, wrap_text, Segments};
pub use scanner::Scanner;
pub use store::UnitStore;
pub use types::*;
