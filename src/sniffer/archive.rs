//! Archive signatures: ZIP and RAR.
//!
//! Both detectors only classify assets nothing is known about yet. A
//! container reports its own archive kind, so no entry is read for it.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match, starts_with_any};
use crate::blob::Blob;
use crate::common::Result;
use crate::container::Container;
use crate::format::{Format, FormatHints, Specification, media_types};

/// Local file header, empty archive and spanned archive markers.
const ZIP_SIGNATURES: &[&[u8]] = &[b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

/// RAR 1.5 to 4.x, then RAR 5.
const RAR_SIGNATURES: &[&[u8]] = &[b"Rar!\x1a\x07\x00", b"Rar!\x1a\x07\x01\x00"];

fn zip_format() -> Format {
    Format::new(&[Specification::Zip], media_types::ZIP, "zip")
}

fn rar_format() -> Format {
    Format::new(&[Specification::Rar], media_types::RAR, "rar")
}

/// Detects ZIP archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipFormatSniffer;

#[async_trait]
impl FormatSniffer for ZipFormatSniffer {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        // Any `application/*+zip` is at least a ZIP archive.
        (hints_match(hints, &["zip"], &[media_types::ZIP, "application/x-zip-compressed"])
            || hints.has_media_type_suffix("application", "zip"))
        .then(zip_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let prefix = blob.read_prefix(4).await?;
        Ok(starts_with_any(&prefix, ZIP_SIGNATURES).then(zip_format))
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        let is_zip = container.archive() == Some(Specification::Zip);
        Ok((format.is_empty() && is_zip).then(zip_format))
    }
}

/// Detects RAR archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct RarFormatSniffer;

#[async_trait]
impl FormatSniffer for RarFormatSniffer {
    fn name(&self) -> &'static str {
        "rar"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(
            hints,
            &["rar"],
            &[media_types::RAR, "application/x-rar", "application/x-rar-compressed"],
        )
        .then(rar_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let prefix = blob.read_prefix(8).await?;
        Ok(starts_with_any(&prefix, RAR_SIGNATURES).then(rar_format))
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        let is_rar = container.archive() == Some(Specification::Rar);
        Ok((format.is_empty() && is_rar).then(rar_format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemoryContainer;
    use crate::sniffer::tests::sniff_blob_with;

    #[test]
    fn test_zip_hints() {
        let sniffer = ZipFormatSniffer;
        assert_eq!(
            sniffer.sniff_hints(&FormatHints::new().with_file_extension("ZIP")),
            Some(zip_format())
        );
        assert_eq!(
            sniffer.sniff_hints(&FormatHints::new().with_media_type("application/x.custom+zip")),
            Some(zip_format())
        );
        assert!(sniffer.sniff_hints(&FormatHints::new().with_file_extension("rar")).is_none());
    }

    #[tokio::test]
    async fn test_zip_signatures() {
        for magic in [&b"PK\x03\x04"[..], b"PK\x05\x06", b"PK\x07\x08"] {
            let blob = Blob::from_bytes("a", magic.to_vec());
            assert_eq!(
                sniff_blob_with(&ZipFormatSniffer, Format::empty(), &blob).await,
                Some(zip_format())
            );
        }
        let short = Blob::from_bytes("short", &b"PK"[..]);
        assert!(sniff_blob_with(&ZipFormatSniffer, Format::empty(), &short).await.is_none());
    }

    #[tokio::test]
    async fn test_zip_does_not_reclassify() {
        let blob = Blob::from_bytes("a", &b"PK\x03\x04"[..]);
        let pdf = Format::new(&[Specification::Pdf], media_types::PDF, "pdf");
        assert!(sniff_blob_with(&ZipFormatSniffer, pdf, &blob).await.is_none());
    }

    #[tokio::test]
    async fn test_rar_signatures() {
        for magic in [&b"Rar!\x1a\x07\x00"[..], b"Rar!\x1a\x07\x01\x00"] {
            let blob = Blob::from_bytes("a", magic.to_vec());
            assert_eq!(
                sniff_blob_with(&RarFormatSniffer, Format::empty(), &blob).await,
                Some(rar_format())
            );
        }
        let truncated = Blob::from_bytes("b", &b"Rar!\x1a\x07"[..]);
        assert!(sniff_blob_with(&RarFormatSniffer, Format::empty(), &truncated).await.is_none());
    }

    #[tokio::test]
    async fn test_container_archive_kind() {
        let zip = MemoryContainer::new("z").with_archive(Specification::Zip);
        let dir = MemoryContainer::new("d");

        let result = ZipFormatSniffer.sniff_container(&zip, &Format::empty()).await.unwrap();
        assert_eq!(result, Some(zip_format()));
        assert!(ZipFormatSniffer.sniff_container(&dir, &Format::empty()).await.unwrap().is_none());
        assert!(RarFormatSniffer.sniff_container(&zip, &Format::empty()).await.unwrap().is_none());
    }
}
