use crate::{
    constants::{
        localization::PRIMARY_DECODE_FAILED_MSG, PLACEHOLDER_PATTERN,
        PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX,
    },
    types::{Error, ScanSettings},
};
use encoding_rs::{Encoder, EncoderResult, Encoding};
use log::warn;
use regex::{Captures, Regex};
use std::{
    borrow::Cow,
    cell::LazyCell,
    convert::Infallible,
    fs::{read, read_to_string},
    path::Path,
};

thread_local! {
    static PLACEHOLDER_RE: LazyCell<Regex> = LazyCell::new(|| unsafe {
        Regex::new(PLACEHOLDER_PATTERN).unwrap_unchecked()
    });
}

/// Substituted for characters the output encoding can't represent.
const REPLACEMENT_BYTE: u8 = b'?';

#[inline]
/// This function is exactly similar to `std::fs::read_to_string`, but it doesn't include Byte Order Mark, if there's any.
pub fn read_to_string_without_bom<P: AsRef<Path>>(
    file_path: P,
) -> Result<String, Error> {
    let file_path: &Path = file_path.as_ref();
    let content: String = read_to_string(file_path)
        .map_err(|e| Error::Io(file_path.to_path_buf(), e))?;

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_owned(),
        None => content,
    })
}

/// Decodes `bytes` as `encoding`, returning [`None`] on the first malformed sequence.
///
/// A BOM is skipped only when it belongs to `encoding` itself.
pub(crate) fn decode_strict(
    encoding: &'static Encoding,
    bytes: &[u8],
) -> Option<String> {
    let bytes: &[u8] = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_length)) if bom_encoding == encoding => {
            &bytes[bom_length..]
        }
        _ => bytes,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// Reads a script file, decoding it with the primary encoding and falling back to the secondary one.
///
/// # Errors
///
/// - [`Error::Io`] - if the file can't be read.
/// - [`Error::Decode`] - if neither encoding decodes the file cleanly.
pub fn read_with_fallback<P: AsRef<Path>>(
    path: P,
    settings: &ScanSettings,
) -> Result<String, Error> {
    let path: &Path = path.as_ref();
    let bytes: Vec<u8> = read(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;

    if let Some(content) = decode_strict(settings.primary_encoding, &bytes) {
        return Ok(content);
    }

    warn!("{}: {PRIMARY_DECODE_FAILED_MSG}", path.display());

    decode_strict(settings.fallback_encoding, &bytes)
        .ok_or_else(|| Error::Decode(path.to_path_buf()))
}

fn encode_with<E>(
    encoding: &'static Encoding,
    text: &str,
    mut on_unmappable: impl FnMut(char, &mut Vec<u8>) -> Result<(), E>,
) -> Result<Vec<u8>, E> {
    let mut encoder: Encoder = encoding.new_encoder();
    let mut output: Vec<u8> = Vec::with_capacity(text.len());
    let mut buffer: [u8; 4096] = [0u8; 4096];
    let mut remaining: &str = text;

    loop {
        let (result, read, written): (EncoderResult, usize, usize) = encoder
            .encode_from_utf8_without_replacement(remaining, &mut buffer, true);

        output.extend_from_slice(&buffer[..written]);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(character) => {
                on_unmappable(character, &mut output)?;
            }
        }
    }

    Ok(output)
}

/// Encodes `text`, failing with the first character `encoding` can't represent.
pub fn encode_strict(
    encoding: &'static Encoding,
    text: &str,
) -> Result<Vec<u8>, char> {
    encode_with(encoding, text, |character, _| Err(character))
}

/// Encodes `text`, writing `?` in place of every character `encoding` can't represent.
///
/// Patched output goes through this, so writing it never fails on encoding.
pub fn encode_lossy(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    let encoded: Result<Vec<u8>, Infallible> =
        encode_with(encoding, text, |_, output| {
            output.push(REPLACEMENT_BYTE);
            Ok(())
        });

    match encoded {
        Ok(bytes) => bytes,
        Err(never) => match never {},
    }
}

#[inline]
/// Builds the placeholder that stands in for a unit starting at `line_index` of `file_name`.
pub fn placeholder_key(file_name: &str, line_index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{file_name}-{line_index}{PLACEHOLDER_SUFFIX}")
}

/// Splits a placeholder line into its file name and line index.
///
/// Returns [`None`] for anything but a lone placeholder, surrounding whitespace aside.
pub fn parse_placeholder(line: &str) -> Option<(&str, usize)> {
    let line: &str = line.trim();

    PLACEHOLDER_RE.with(|re| {
        let captures: Captures = re.captures(line)?;
        let file: &str = captures.name("file")?.as_str();
        let index: usize = captures.name("index")?.as_str().parse().ok()?;
        Some((file, index))
    })
}
