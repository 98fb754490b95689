//! Readium Web Publication Manifests.

use async_trait::async_trait;

use super::FormatSniffer;
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

/// Manifest media types, from the most to the least specific profile.
const MANIFEST_TYPES: [&str; 3] = [
    media_types::READIUM_AUDIOBOOK_MANIFEST,
    media_types::DIVINA_MANIFEST,
    media_types::READIUM_WEBPUB_MANIFEST,
];

fn manifest_format(media_type: &'static str) -> Format {
    Format::new(&[Specification::Json, Specification::Rwpm], media_type, "json")
}

/// Detects standalone Readium manifests (audiobook, Divina and generic web
/// publication profiles).
///
/// A JSON document is a manifest when it deserializes as one and its `self`
/// link declares one of the manifest media types.
#[derive(Debug, Clone, Copy, Default)]
pub struct RwpmFormatSniffer;

#[async_trait]
impl FormatSniffer for RwpmFormatSniffer {
    fn name(&self) -> &'static str {
        "rwpm"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        MANIFEST_TYPES
            .into_iter()
            .find(|media_type| hints.has_media_type(&[*media_type]))
            .map(manifest_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.conforms_to(Specification::Json) || format.conforms_to(Specification::Rwpm) {
            return Ok(None);
        }
        let Some(self_link) = blob.read_as_manifest().await?.and_then(|m| m.self_link()) else {
            return Ok(None);
        };
        Ok(MANIFEST_TYPES
            .into_iter()
            .find(|media_type| self_link.has_media_type(media_type))
            .map(|media_type| format.refined(&[Specification::Rwpm], media_type, "json")))
    }
}
