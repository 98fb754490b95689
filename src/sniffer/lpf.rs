//! W3C Lightweight Packaging Format.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::common::Result;
use crate::container::Container;
use crate::format::{Format, FormatHints, Specification, media_types};

const PUBLICATION_CONTEXT: &str = "https://www.w3.org/ns/pub-context";

/// Formats an LPF package never refines.
const PACKAGE_SPECIFICATIONS: [Specification; 5] = [
    Specification::Epub,
    Specification::Rpf,
    Specification::Lpf,
    Specification::InformalAudiobook,
    Specification::InformalComic,
];

/// Detects LPF packages: a ZIP holding an `index.html` entry point, or a
/// `publication.json` in the W3C publication context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpfFormatSniffer;

impl LpfFormatSniffer {
    async fn has_publication_manifest(&self, container: &dyn Container) -> Result<bool> {
        let Some(blob) = container.open("publication.json") else {
            return Ok(false);
        };
        let Some(value) = blob.read_as_json().await? else {
            return Ok(false);
        };
        let context = &value["@context"];
        let names_context = match context {
            serde_json::Value::String(s) => s == PUBLICATION_CONTEXT,
            serde_json::Value::Array(items) => items
                .iter()
                .any(|item| item.as_str() == Some(PUBLICATION_CONTEXT)),
            _ => false,
        };
        Ok(names_context)
    }
}

#[async_trait]
impl FormatSniffer for LpfFormatSniffer {
    fn name(&self) -> &'static str {
        "lpf"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(hints, &["lpf"], &[media_types::LPF]).then(|| {
            Format::new(
                &[Specification::Zip, Specification::Lpf],
                media_types::LPF,
                "lpf",
            )
        })
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        if !format.conforms_to(Specification::Zip) || format.conforms_to_any(&PACKAGE_SPECIFICATIONS) {
            return Ok(None);
        }
        if container.contains("index.html") || self.has_publication_manifest(container).await? {
            return Ok(Some(format.refined(&[Specification::Lpf], media_types::LPF, "lpf")));
        }
        Ok(None)
    }
}
