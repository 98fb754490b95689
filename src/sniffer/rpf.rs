//! Readium Package Format: ZIP packages carrying a `manifest.json`.
//!
//! One structural shape yields several formats. The declared conformance
//! profile of the manifest picks the family, and LCP protection of the
//! reading order picks the protected variant:
//!
//! | profile   | protected | media type                   | extension   |
//! |-----------|-----------|------------------------------|-------------|
//! | audiobook | no        | `application/audiobook+zip`  | `audiobook` |
//! | audiobook | yes       | `application/audiobook+lcp`  | `lcpa`      |
//! | divina    | either    | `application/divina+zip`     | `divina`    |
//! | pdf       | yes       | `application/pdf+lcp`        | `lcpdf`     |
//! | other     | either    | `application/webpub+zip`     | `webpub`    |

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::common::Result;
use crate::container::Container;
use crate::format::{Format, FormatHints, Specification, media_types};
use crate::manifest::{Manifest, PROFILE_AUDIOBOOK, PROFILE_DIVINA, PROFILE_PDF};

const MANIFEST_PATH: &str = "manifest.json";

/// Detects Readium packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpfFormatSniffer;

/// Classify a package from its manifest.
fn classify(manifest: &Manifest, format: &Format) -> Format {
    use Specification::{Lcp, Rpf};

    let protected = manifest.has_lcp_reading_order();
    let specs: &[Specification] = if protected { &[Rpf, Lcp] } else { &[Rpf] };

    if manifest.conforms_to(PROFILE_AUDIOBOOK) {
        if protected {
            format.refined(specs, media_types::LCP_PROTECTED_AUDIOBOOK, "lcpa")
        } else {
            format.refined(specs, media_types::READIUM_AUDIOBOOK, "audiobook")
        }
    } else if manifest.conforms_to(PROFILE_DIVINA) {
        format.refined(specs, media_types::DIVINA, "divina")
    } else if protected && manifest.conforms_to(PROFILE_PDF) {
        format.refined(specs, media_types::LCP_PROTECTED_PDF, "lcpdf")
    } else {
        format.refined(specs, media_types::READIUM_WEBPUB, "webpub")
    }
}

#[async_trait]
impl FormatSniffer for RpfFormatSniffer {
    fn name(&self) -> &'static str {
        "rpf"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        use Specification::{Lcp, Rpf, Zip};

        if hints_match(hints, &["audiobook"], &[media_types::READIUM_AUDIOBOOK]) {
            return Some(Format::new(&[Zip, Rpf], media_types::READIUM_AUDIOBOOK, "audiobook"));
        }
        if hints_match(hints, &["divina"], &[media_types::DIVINA]) {
            return Some(Format::new(&[Zip, Rpf], media_types::DIVINA, "divina"));
        }
        if hints_match(hints, &["webpub"], &[media_types::READIUM_WEBPUB]) {
            return Some(Format::new(&[Zip, Rpf], media_types::READIUM_WEBPUB, "webpub"));
        }
        if hints_match(hints, &["lcpa"], &[media_types::LCP_PROTECTED_AUDIOBOOK]) {
            return Some(Format::new(
                &[Zip, Rpf, Lcp],
                media_types::LCP_PROTECTED_AUDIOBOOK,
                "lcpa",
            ));
        }
        if hints_match(hints, &["lcpdf"], &[media_types::LCP_PROTECTED_PDF]) {
            return Some(Format::new(&[Zip, Rpf, Lcp], media_types::LCP_PROTECTED_PDF, "lcpdf"));
        }
        None
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        if !format.conforms_to(Specification::Zip) || format.conforms_to(Specification::Rpf) {
            return Ok(None);
        }
        let Some(blob) = container.open(MANIFEST_PATH) else {
            return Ok(None);
        };
        Ok(blob
            .read_as_manifest()
            .await?
            .map(|manifest| classify(manifest, format)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryContainer;
    use crate::manifest::LCP_SCHEME;

    fn zip() -> Format {
        Format::new(&[Specification::Zip], media_types::ZIP, "zip")
    }

    fn package(profile: Option<&str>, protected: bool) -> MemoryContainer {
        let conforms_to = profile
            .map(|p| format!(r#", "conformsTo": "{p}""#))
            .unwrap_or_default();
        let properties = if protected {
            format!(r#", "properties": {{"encrypted": {{"scheme": "{LCP_SCHEME}"}}}}"#)
        } else {
            String::new()
        };
        let manifest = format!(
            r#"{{"metadata": {{"title": "T"{conforms_to}}},
                "readingOrder": [{{"href": "item", "type": "audio/mpeg"{properties}}}]}}"#
        );
        MemoryContainer::new("package")
            .with_archive(Specification::Zip)
            .with_entry(MANIFEST_PATH, manifest)
            .with_entry("item", "")
    }

    async fn sniff(container: &MemoryContainer) -> Option<Format> {
        RpfFormatSniffer.sniff_container(container, &zip()).await.unwrap()
    }

    #[tokio::test]
    async fn test_classification_table() {
        let cases = [
            (Some(PROFILE_AUDIOBOOK), false, media_types::READIUM_AUDIOBOOK, "audiobook", false),
            (Some(PROFILE_AUDIOBOOK), true, media_types::LCP_PROTECTED_AUDIOBOOK, "lcpa", true),
            (Some(PROFILE_DIVINA), false, media_types::DIVINA, "divina", false),
            (Some(PROFILE_DIVINA), true, media_types::DIVINA, "divina", true),
            (Some(PROFILE_PDF), true, media_types::LCP_PROTECTED_PDF, "lcpdf", true),
            (Some(PROFILE_PDF), false, media_types::READIUM_WEBPUB, "webpub", false),
            (None, false, media_types::READIUM_WEBPUB, "webpub", false),
            (None, true, media_types::READIUM_WEBPUB, "webpub", true),
        ];

        for (profile, protected, media_type, extension, lcp) in cases {
            let format = sniff(&package(profile, protected)).await.unwrap();
            assert_eq!(format.media_type(), media_type, "{profile:?} protected={protected}");
            assert_eq!(format.file_extension(), extension);
            assert!(format.conforms_to_all(&[Specification::Zip, Specification::Rpf]));
            assert_eq!(format.conforms_to(Specification::Lcp), lcp);
        }
    }

    #[tokio::test]
    async fn test_requires_zip_and_manifest() {
        let container = package(None, false);
        assert!(
            RpfFormatSniffer
                .sniff_container(&container, &Format::empty())
                .await
                .unwrap()
                .is_none()
        );

        let no_manifest = MemoryContainer::new("p").with_entry("item", "");
        assert!(sniff(&no_manifest).await.is_none());

        let not_a_manifest = MemoryContainer::new("p").with_entry(MANIFEST_PATH, r#"{"a": 1}"#);
        assert!(sniff(&not_a_manifest).await.is_none());
    }

    #[test]
    fn test_hints() {
        let lcpa = RpfFormatSniffer
            .sniff_hints(&FormatHints::new().with_file_extension("lcpa"))
            .unwrap();
        assert!(lcpa.conforms_to(Specification::Lcp));
        assert!(RpfFormatSniffer.sniff_hints(&FormatHints::new().with_file_extension("zip")).is_none());
    }
}
