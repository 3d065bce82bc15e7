//! Weaving translated text back into skeleton files.

use crate::{
    functions::parse_placeholder,
    store::UnitStore,
    types::{Error, ScanSettings, TranslationUnit},
};
use log::debug;
use smallvec::SmallVec;

/// Wrapped lines of a single unit. Most dialogue fits in a few.
pub type Segments = SmallVec<[String; 4]>;

/// Greedily wraps `text` to at most `width` characters per segment.
///
/// Words are separated by whitespace and rejoined with single spaces. A word longer
/// than `width` gets a segment of its own and is never split.
pub fn wrap_text(text: &str, width: usize) -> Segments {
    let mut segments: Segments = Segments::new();
    let mut current: String = String::new();
    let mut current_width: usize = 0;

    for word in text.split_whitespace() {
        let word_width: usize = word.chars().count();

        if current_width != 0 && current_width + 1 + word_width > width {
            segments.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if current_width != 0 {
            current.push(' ');
            current_width += 1;
        }

        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Renders one translated unit in script form.
///
/// Segments are separated by the grouping code and a line break, and the unit's
/// original suffix closes the last one.
pub fn render_unit(translation: &str, eol: &str, settings: &ScanSettings) -> String {
    let segments: Segments = wrap_text(translation.trim(), settings.wrap_width);
    let separator: String = format!("{}\n", settings.grouping_code);

    let mut rendered: String = segments.join(separator.as_str());
    rendered.push_str(eol);
    rendered
}

/// Substitutes every placeholder of `file_name` in `skeleton` with its rendered translation.
///
/// Placeholders naming another file and all other lines are passed through. Returns the
/// patched text, joined by `\n`, and the number of substituted placeholders.
///
/// # Errors
///
/// - [`Error::UnknownKey`] - if a placeholder has no translation in `translations`.
pub fn weave(
    file_name: &str,
    skeleton: &str,
    translations: &UnitStore,
    settings: &ScanSettings,
) -> Result<(String, usize), Error> {
    let mut lines: Vec<String> = Vec::new();
    let mut replaced: usize = 0;

    for line in skeleton.lines() {
        match parse_placeholder(line) {
            Some((file, _)) if file == file_name => {
                let unit: &TranslationUnit = translations.lookup(line.trim())?;
                debug!("{}: {:?}", unit.key, unit.text);

                lines.push(render_unit(&unit.text, &unit.eol, settings));
                replaced += 1;
            }
            _ => lines.push(line.to_owned()),
        }
    }

    Ok((lines.join("\n"), replaced))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_width() {
        let text = "The quick brown fox jumps over the lazy dog and keeps on running far away";
        let segments = wrap_text(text, 40);

        assert_eq!(
            segments.as_slice(),
            [
                "The quick brown fox jumps over the lazy",
                "dog and keeps on running far away",
            ]
        );
        assert!(segments.iter().all(|s| s.chars().count() <= 40));
    }

    #[test]
    fn long_words_are_kept_whole() {
        let long = "x".repeat(45);
        let text = format!("a {long} b");

        assert_eq!(
            wrap_text(&text, 40).as_slice(),
            ["a".to_owned(), long, "b".to_owned()]
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(wrap_text("  a \t b  ", 40).as_slice(), ["a b"]);
        assert!(wrap_text("   ", 40).is_empty());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "あ".repeat(20) + " " + &"い".repeat(19);
        assert_eq!(wrap_text(&text, 40).len(), 1);
    }

    #[test]
    fn renders_with_grouping_code_and_suffix() {
        let settings = ScanSettings {
            wrap_width: 10,
            ..Default::default()
        };

        assert_eq!(
            render_unit(" one two three four\n", "[l][r]", &settings),
            "one two[r]\nthree four[l][r]"
        );
        assert_eq!(render_unit("", "[p]", &settings), "[p]");
    }

    #[test]
    fn weaves_only_own_placeholders() {
        let settings = ScanSettings::default();
        let mut store = UnitStore::new();
        store
            .push_file(
                "a.ks",
                [TranslationUnit::new("<<<TRANS:a.ks-1>>>", "Hi there", "[l]")],
            )
            .unwrap();

        let skeleton = "*start\n<<<TRANS:a.ks-1>>>\n<<<TRANS:b.ks-0>>>\n[p]";
        let (patched, replaced) =
            weave("a.ks", skeleton, &store, &settings).unwrap();

        assert_eq!(patched, "*start\nHi there[l]\n<<<TRANS:b.ks-0>>>\n[p]");
        assert_eq!(replaced, 1);
    }

    #[test]
    fn unknown_placeholder_is_fatal() {
        let settings = ScanSettings::default();
        let store = UnitStore::new();

        assert!(matches!(
            weave("a.ks", "<<<TRANS:a.ks-7>>>", &store, &settings),
            Err(Error::UnknownKey(key)) if key == "<<<TRANS:a.ks-7>>>"
        ));
    }
}
