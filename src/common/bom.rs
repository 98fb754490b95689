//! Byte Order Mark (BOM) detection and text decoding.
//!
//! Text views of a blob are decoded as UTF-8 unless a UTF-16 BOM says
//! otherwise. Decoding never replaces invalid sequences: content that is not
//! valid text in its declared encoding yields `None`.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Supported BOM encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl BomKind {
    /// Returns the byte representation of the BOM.
    #[inline]
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            BomKind::Utf8 => &UTF8_BOM,
            BomKind::Utf16Le => &UTF16_LE_BOM,
            BomKind::Utf16Be => &UTF16_BE_BOM,
        }
    }

    /// Returns the length in bytes of the BOM.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            BomKind::Utf8 => UTF_8,
            BomKind::Utf16Le => UTF_16LE,
            BomKind::Utf16Be => UTF_16BE,
        }
    }
}

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Detects a BOM at the start of `bytes`.
pub fn detect_bom(bytes: &[u8]) -> Option<BomKind> {
    [BomKind::Utf8, BomKind::Utf16Le, BomKind::Utf16Be]
        .into_iter()
        .find(|kind| bytes.starts_with(kind.as_bytes()))
}

/// Decodes `bytes` as text, honouring a leading BOM.
///
/// Returns `None` if the bytes are not valid in the detected encoding.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    let (encoding, body) = match detect_bom(bytes) {
        Some(kind) => (kind.encoding(), &bytes[kind.len()..]),
        None => (UTF_8, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

/// Decodes the leading bytes of a longer content as UTF-8.
///
/// A multi-byte sequence cut by the end of the prefix is tolerated, so
/// scanning the first kilobyte of a large file does not fail on a split
/// character.
pub fn decode_utf8_prefix(bytes: &[u8]) -> Option<&str> {
    let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Some(text),
        Err(e) if e.error_len().is_none() => std::str::from_utf8(&body[..e.valid_up_to()]).ok(),
        Err(_) => None,
    }
}
