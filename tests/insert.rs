use kstr::{
    CorpusCheck, Error, InserterBuilder, ScanSettings, TranslationUnit,
    UnitStore, STORE_FILE_NAME,
};
use std::{
    fs::{create_dir_all, read, read_to_string, write},
    path::Path,
};
use tempfile::TempDir;

/// Lays out a working directory as extraction would have left it.
fn working_dir(work_dir: &Path) {
    create_dir_all(work_dir).unwrap();

    let mut store = UnitStore::new();
    store
        .push_file(
            "a.ks",
            [
                TranslationUnit::new("<<<TRANS:a.ks-1>>>", "こんにちは", "[l]"),
                TranslationUnit::new("<<<TRANS:a.ks-3>>>", "長い文章", "[p]"),
            ],
        )
        .unwrap();
    store
        .push_file(
            "b.ks",
            [TranslationUnit::new("<<<TRANS:b.ks-0>>>", "終わり", "")],
        )
        .unwrap();
    store.save(work_dir.join(STORE_FILE_NAME)).unwrap();

    write(
        work_dir.join("a.ks"),
        "*start\n<<<TRANS:a.ks-1>>>\n[cm]\n<<<TRANS:a.ks-3>>>\n[s]",
    )
    .unwrap();
    write(work_dir.join("b.ks"), "<<<TRANS:b.ks-0>>>\n; done").unwrap();
}

#[test]
fn insert_wraps_and_restores_suffixes() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let output_dir = dir.path().join("patch");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    write(
        &corpus_path,
        "Hello.\n\
         This sentence is long enough that it has to be wrapped over two lines.\n\
         The end.\n",
    )
    .unwrap();

    let summary = InserterBuilder::new()
        .build()
        .insert(&corpus_path, &output_dir, &work_dir)
        .unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.replaced, 3);

    assert_eq!(
        read_to_string(output_dir.join("a.ks")).unwrap(),
        "*start
Hello.[l]
[cm]
This sentence is long enough that it has[r]
to be wrapped over two lines.[p]
[s]"
    );
    assert_eq!(
        read_to_string(output_dir.join("b.ks")).unwrap(),
        "The end.\n; done"
    );
}

#[test]
fn wrapped_segments_respect_width() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let output_dir = dir.path().join("patch");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    write(
        &corpus_path,
        "a bb ccc dddd eeeee ffffff\nsupercalifragilisticexpialidocious yes\nok\n",
    )
    .unwrap();

    InserterBuilder::new()
        .with_settings(ScanSettings {
            wrap_width: 12,
            ..Default::default()
        })
        .build()
        .insert(&corpus_path, &output_dir, &work_dir)
        .unwrap();

    let patched = read_to_string(output_dir.join("a.ks")).unwrap();
    assert_eq!(
        patched,
        "*start
a bb ccc[r]
dddd eeeee[r]
ffffff[l]
[cm]
supercalifragilisticexpialidocious[r]
yes[p]
[s]"
    );

    for line in patched.lines() {
        let text = line.trim_end_matches("[r]");
        assert!(
            text.chars().count() <= 12 || !text.contains(' '),
            "{line:?} is too wide"
        );
    }
}

#[test]
fn unrepresentable_characters_are_replaced() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let output_dir = dir.path().join("patch");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    write(&corpus_path, "Ça va\u{1F600}\nさようなら\nend\n").unwrap();

    InserterBuilder::new()
        .build()
        .insert(&corpus_path, &output_dir, &work_dir)
        .unwrap();

    let (expected, _, _) = encoding_rs::SHIFT_JIS
        .encode("*start\n?a va?[l]\n[cm]\nさようなら[p]\n[s]");

    assert_eq!(read(output_dir.join("a.ks")).unwrap(), expected.into_owned());
}

#[test]
fn corpus_length_mismatch() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let output_dir = dir.path().join("patch");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    write(&corpus_path, "Hello.\nOnly two lines.\n").unwrap();

    let strict = InserterBuilder::new()
        .build()
        .insert(&corpus_path, &output_dir, &work_dir);

    assert!(matches!(
        strict,
        Err(Error::CorpusLengthMismatch {
            expected: 3,
            actual: 2
        })
    ));
    assert!(!output_dir.exists());

    // Lenient mode zips what it can, then trips over the placeholder left without a line.
    let lenient = InserterBuilder::new()
        .corpus_check(CorpusCheck::Lenient)
        .build()
        .insert(&corpus_path, &output_dir, &work_dir);

    assert!(matches!(
        lenient,
        Err(Error::UnknownKey(key)) if key == "<<<TRANS:b.ks-0>>>"
    ));
    // a.ks weaves fine, but isn't written either.
    assert!(!output_dir.exists());
}

#[test]
fn failed_insert_leaves_existing_output_untouched() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let output_dir = dir.path().join("patch");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    create_dir_all(&output_dir).unwrap();
    write(output_dir.join("a.ks"), "previous patch").unwrap();
    write(work_dir.join("b.ks"), "<<<TRANS:b.ks-5>>>").unwrap();
    write(&corpus_path, "a\nb\nc\n").unwrap();

    let result = InserterBuilder::new()
        .build()
        .insert(&corpus_path, &output_dir, &work_dir);

    assert!(matches!(result, Err(Error::UnknownKey(_))));
    assert_eq!(
        read_to_string(output_dir.join("a.ks")).unwrap(),
        "previous patch"
    );
    assert!(!output_dir.join("b.ks").exists());
}

#[test]
fn placeholder_from_another_run_is_fatal() {
    let dir = TempDir::new().unwrap();
    let work_dir = dir.path().join("working");
    let corpus_path = dir.path().join("trans.txt");

    working_dir(&work_dir);
    write(work_dir.join("b.ks"), "<<<TRANS:b.ks-5>>>").unwrap();
    write(&corpus_path, "a\nb\nc\n").unwrap();

    let result = InserterBuilder::new().build().insert(
        &corpus_path,
        dir.path().join("patch"),
        &work_dir,
    );

    assert!(matches!(
        result,
        Err(Error::UnknownKey(key)) if key == "<<<TRANS:b.ks-5>>>"
    ));
}

#[test]
fn missing_store_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("trans.txt");
    write(&corpus_path, "a\n").unwrap();

    let result = InserterBuilder::new().build().insert(
        &corpus_path,
        dir.path().join("patch"),
        dir.path().join("working"),
    );

    assert!(matches!(result, Err(Error::Io(path, _)) if path.ends_with(STORE_FILE_NAME)));
}
