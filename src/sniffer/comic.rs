//! Informal comic archives: CBZ and CBR.

use async_trait::async_trait;
use phf::phf_set;

use super::{FormatSniffer, bitmap, hints_match};
use crate::common::Result;
use crate::container::{Container, matches_extension_profile};
use crate::format::{Format, FormatHints, Specification, media_types};

/// Metadata files allowed beside the pages (ComicRack and ACBF).
static METADATA_EXTENSIONS: phf::Set<&'static str> = phf_set! { "acbf", "xml" };

const PACKAGE_SPECIFICATIONS: [Specification; 5] = [
    Specification::Epub,
    Specification::Rpf,
    Specification::Lpf,
    Specification::InformalAudiobook,
    Specification::InformalComic,
];

/// Detects ZIP or RAR archives holding only bitmap pages and comic
/// metadata, with at least one page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComicFormatSniffer;

#[async_trait]
impl FormatSniffer for ComicFormatSniffer {
    fn name(&self) -> &'static str {
        "comic"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        if hints_match(hints, &["cbz"], &[media_types::CBZ]) {
            return Some(Format::new(
                &[Specification::Zip, Specification::InformalComic],
                media_types::CBZ,
                "cbz",
            ));
        }
        if hints_match(hints, &["cbr"], &[media_types::CBR, "application/x-cbr"]) {
            return Some(Format::new(
                &[Specification::Rar, Specification::InformalComic],
                media_types::CBR,
                "cbr",
            ));
        }
        None
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        if format.conforms_to_any(&PACKAGE_SPECIFICATIONS) {
            return Ok(None);
        }
        let (media_type, extension) = if format.conforms_to(Specification::Zip) {
            (media_types::CBZ, "cbz")
        } else if format.conforms_to(Specification::Rar) {
            (media_types::CBR, "cbr")
        } else {
            return Ok(None);
        };
        let matches = matches_extension_profile(
            container,
            bitmap::is_bitmap_extension,
            |ext| METADATA_EXTENSIONS.contains(ext),
        );
        Ok(matches.then(|| format.refined(&[Specification::InformalComic], media_type, extension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryContainer;

    fn pages() -> MemoryContainer {
        MemoryContainer::new("comic")
            .with_entry("001.jpg", "")
            .with_entry("002.png", "")
            .with_entry("ComicInfo.xml", "<ComicInfo/>")
            .with_entry("Thumbs.db", "")
    }

    #[tokio::test]
    async fn test_cbz() {
        let zip = Format::new(&[Specification::Zip], media_types::ZIP, "zip");
        let format = ComicFormatSniffer.sniff_container(&pages(), &zip).await.unwrap().unwrap();
        assert_eq!(format.specifications(), &[Specification::Zip, Specification::InformalComic]);
        assert_eq!(format.media_type(), media_types::CBZ);
        assert_eq!(format.file_extension(), "cbz");
    }

    #[tokio::test]
    async fn test_cbr() {
        let rar = Format::new(&[Specification::Rar], media_types::RAR, "rar");
        let format = ComicFormatSniffer.sniff_container(&pages(), &rar).await.unwrap().unwrap();
        assert_eq!(format.media_type(), media_types::CBR);
        assert_eq!(format.file_extension(), "cbr");
    }

    #[tokio::test]
    async fn test_requires_archive_and_pages() {
        assert!(
            ComicFormatSniffer
                .sniff_container(&pages(), &Format::empty())
                .await
                .unwrap()
                .is_none()
        );

        let zip = Format::new(&[Specification::Zip], media_types::ZIP, "zip");
        let with_text = pages().with_entry("notes.txt", "");
        assert!(ComicFormatSniffer.sniff_container(&with_text, &zip).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pages_use_every_bitmap_extension() {
        let zip = Format::new(&[Specification::Zip], media_types::ZIP, "zip");
        let container = MemoryContainer::new("comic")
            .with_entry("001.jpe", "")
            .with_entry("002.JFIF", "")
            .with_entry("003.dib", "");
        let format = ComicFormatSniffer.sniff_container(&container, &zip).await.unwrap().unwrap();
        assert_eq!(format.file_extension(), "cbz");
    }
}
