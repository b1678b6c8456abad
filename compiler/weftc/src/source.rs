//! Source bytes and their declared encoding.
//!
//! Files are UTF-8 unless a coding comment on one of the first two lines
//! declares otherwise. The Latin-1 family is decoded and re-encoded here;
//! any other declared encoding is reported as unsupported.

use std::sync::OnceLock;

use regex::bytes::Regex;

/// Encoding a source file is read and written back in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

/// Why a source could not be decoded or written back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("unsupported source encoding `{0}` (supported: utf-8, latin-1)")]
    Unsupported(String),
    #[error("source is not valid {encoding} (byte {offset})")]
    Invalid { encoding: &'static str, offset: usize },
    #[error("character {0:?} cannot be written as latin-1")]
    Unencodable(char),
}

const LATIN1_NAMES: &[&str] = &[
    "latin-1", "latin1", "latin", "l1", "iso-8859-1", "iso8859-1", "iso-latin-1", "cp819", "8859",
];
const UTF8_NAMES: &[&str] = &["utf-8", "utf8", "utf-8-sig", "ascii", "us-ascii"];

fn coding_comment() -> Option<&'static Regex> {
    static CODING: OnceLock<Option<Regex>> = OnceLock::new();
    CODING
        .get_or_init(|| Regex::new(r"^[ \t\x0c]*#.*?coding[:=][ \t]*([-\w.]+)").ok())
        .as_ref()
}

/// The encoding named by a coding comment, normalized to lower case with
/// `-` separators.
pub fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let re = coding_comment()?;
    let mut lines = bytes.split(|&byte| byte == b'\n');
    for _ in 0..2 {
        let line = lines.next()?;
        if let Some(name) = re.captures(line).and_then(|caps| caps.get(1)) {
            let name = String::from_utf8_lossy(name.as_bytes());
            return Some(name.to_ascii_lowercase().replace('_', "-"));
        }
        // Only a comment or blank first line lets the second line declare.
        let trimmed = line.trim_ascii();
        if !trimmed.is_empty() && !trimmed.starts_with(b"#") {
            return None;
        }
    }
    None
}

/// Decode source bytes in their declared encoding.
pub fn decode(bytes: Vec<u8>) -> Result<(String, Encoding), EncodingError> {
    let encoding = match declared_encoding(&bytes) {
        None => Encoding::Utf8,
        Some(name) if UTF8_NAMES.contains(&name.as_str()) => Encoding::Utf8,
        Some(name) if LATIN1_NAMES.contains(&name.as_str()) => Encoding::Latin1,
        Some(name) => return Err(EncodingError::Unsupported(name)),
    };
    let text = match encoding {
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|err| EncodingError::Invalid {
            encoding: "utf-8",
            offset: err.utf8_error().valid_up_to(),
        })?,
        Encoding::Latin1 => bytes.iter().map(|&byte| char::from(byte)).collect(),
    };
    Ok((text, encoding))
}

/// Encode text for writing back in `encoding`.
pub fn encode(text: &str, encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Latin1 => text
            .chars()
            .map(|c| u8::try_from(u32::from(c)).map_err(|_| EncodingError::Unencodable(c)))
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
