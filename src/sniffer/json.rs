//! Schema-less JSON documents.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

fn json_format() -> Format {
    Format::new(&[Specification::Json], media_types::JSON, "json")
}

/// Detects JSON objects and arrays.
///
/// JSON-based formats (manifests, licenses, catalogs) are refined from the
/// [`Specification::Json`] this detector establishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatSniffer;

#[async_trait]
impl FormatSniffer for JsonFormatSniffer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        (hints_match(hints, &["json"], &[media_types::JSON, "text/json"])
            || hints.has_media_type_suffix("application", "json"))
        .then(json_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        Ok(blob.read_as_json().await?.is_some().then(json_format))
    }
}
