//! Style sheets, scripts and plain text.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

fn text_format() -> Format {
    Format::new(&[Specification::Text], media_types::TEXT, "txt")
}

/// Returns `true` for characters that do not occur in plain text.
fn is_binary_char(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0C')
}

/// Detects CSS and JavaScript from hints, and falls back to plain text for
/// content that decodes as UTF-8 without control characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageFormatSniffer;

#[async_trait]
impl FormatSniffer for LanguageFormatSniffer {
    fn name(&self) -> &'static str {
        "language"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        if hints_match(hints, &["css"], &[media_types::CSS]) {
            return Some(Format::new(&[Specification::Css], media_types::CSS, "css"));
        }
        if hints_match(
            hints,
            &["js", "mjs"],
            &[media_types::JAVASCRIPT, "application/javascript", "application/ecmascript"],
        ) {
            return Some(Format::new(
                &[Specification::JavaScript],
                media_types::JAVASCRIPT,
                "js",
            ));
        }
        hints_match(hints, &["txt", "text"], &[media_types::TEXT]).then(text_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let Some(prefix) = blob.read_text_prefix().await? else {
            return Ok(None);
        };
        let is_text = !prefix.is_empty() && !prefix.chars().any(is_binary_char);
        Ok(is_text.then(text_format))
    }
}
