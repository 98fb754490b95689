//! Bitmap images, by extension, media type or magic number.

use async_trait::async_trait;
use phf::phf_map;

use super::{FormatSniffer, starts_with_any};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

static EXTENSIONS: phf::Map<&'static str, Specification> = phf_map! {
    "avif" => Specification::Avif,
    "bmp" => Specification::Bmp,
    "dib" => Specification::Bmp,
    "gif" => Specification::Gif,
    "jfi" => Specification::Jpeg,
    "jfif" => Specification::Jpeg,
    "jif" => Specification::Jpeg,
    "jpe" => Specification::Jpeg,
    "jpeg" => Specification::Jpeg,
    "jpg" => Specification::Jpeg,
    "jxl" => Specification::Jxl,
    "png" => Specification::Png,
    "tif" => Specification::Tiff,
    "tiff" => Specification::Tiff,
    "webp" => Specification::Webp,
};

/// Returns `true` for a lower-cased bitmap file extension.
pub(super) fn is_bitmap_extension(ext: &str) -> bool {
    EXTENSIONS.contains_key(ext)
}

const MEDIA_TYPES: &[(&str, Specification)] = &[
    (media_types::AVIF, Specification::Avif),
    (media_types::BMP, Specification::Bmp),
    ("image/x-bmp", Specification::Bmp),
    ("image/x-ms-bmp", Specification::Bmp),
    (media_types::GIF, Specification::Gif),
    (media_types::JPEG, Specification::Jpeg),
    (media_types::JXL, Specification::Jxl),
    (media_types::PNG, Specification::Png),
    (media_types::TIFF, Specification::Tiff),
    ("image/tiff-fx", Specification::Tiff),
    (media_types::WEBP, Specification::Webp),
];

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const GIF_SIGNATURES: &[&[u8]] = &[b"GIF87a", b"GIF89a"];
const TIFF_SIGNATURES: &[&[u8]] = &[b"II*\x00", b"MM\x00*"];
/// Bare JPEG XL codestream, then the ISO BMFF container.
const JXL_SIGNATURES: &[&[u8]] = &[b"\xFF\x0A", b"\x00\x00\x00\x0CJXL \r\n\x87\n"];
const AVIF_BRANDS: &[&[u8]] = &[b"avif", b"avis"];

const SIGNATURE_LENGTH: u64 = 16;

fn bitmap_format(specification: Specification) -> Option<Format> {
    let (media_type, extension) = match specification {
        Specification::Avif => (media_types::AVIF, "avif"),
        Specification::Bmp => (media_types::BMP, "bmp"),
        Specification::Gif => (media_types::GIF, "gif"),
        Specification::Jpeg => (media_types::JPEG, "jpg"),
        Specification::Jxl => (media_types::JXL, "jxl"),
        Specification::Png => (media_types::PNG, "png"),
        Specification::Tiff => (media_types::TIFF, "tiff"),
        Specification::Webp => (media_types::WEBP, "webp"),
        _ => return None,
    };
    Some(Format::new(&[specification], media_type, extension))
}

/// Identify a bitmap from its leading bytes.
fn detect(bytes: &[u8]) -> Option<Specification> {
    if bytes.starts_with(PNG_SIGNATURE) {
        return Some(Specification::Png);
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(Specification::Jpeg);
    }
    if starts_with_any(bytes, GIF_SIGNATURES) {
        return Some(Specification::Gif);
    }
    if starts_with_any(bytes, JXL_SIGNATURES) {
        return Some(Specification::Jxl);
    }
    if starts_with_any(bytes, TIFF_SIGNATURES) {
        return Some(Specification::Tiff);
    }
    if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        return Some(Specification::Webp);
    }
    if bytes.get(4..8) == Some(b"ftyp".as_slice())
        && bytes
            .get(8..12)
            .is_some_and(|brand| starts_with_any(brand, AVIF_BRANDS))
    {
        return Some(Specification::Avif);
    }
    // The four reserved bytes after the file size are always zero.
    if bytes.starts_with(b"BM") && bytes.get(6..10) == Some([0u8; 4].as_slice()) {
        return Some(Specification::Bmp);
    }
    None
}

/// Detects common bitmap formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFormatSniffer;

#[async_trait]
impl FormatSniffer for BitmapFormatSniffer {
    fn name(&self) -> &'static str {
        "bitmap"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        let by_extension = hints
            .file_extensions()
            .find_map(|ext| EXTENSIONS.get(ext).copied());
        let specification = by_extension.or_else(|| {
            MEDIA_TYPES
                .iter()
                .find(|(media_type, _)| hints.has_media_type(&[*media_type]))
                .map(|(_, specification)| *specification)
        })?;
        bitmap_format(specification)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let prefix = blob.read_prefix(SIGNATURE_LENGTH).await?;
        Ok(detect(&prefix).and_then(bitmap_format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signatures() {
        assert_eq!(detect(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"), Some(Specification::Png));
        assert_eq!(detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]), Some(Specification::Jpeg));
        assert_eq!(detect(b"GIF89a\x01\x00"), Some(Specification::Gif));
        assert_eq!(detect(b"\xFF\x0A\xFA"), Some(Specification::Jxl));
        assert_eq!(
            detect(b"\x00\x00\x00\x0CJXL \r\n\x87\n\x00\x00"),
            Some(Specification::Jxl)
        );
        assert_eq!(detect(b"II*\x00\x08\x00"), Some(Specification::Tiff));
        assert_eq!(detect(b"MM\x00*\x00\x00"), Some(Specification::Tiff));
        assert_eq!(detect(b"RIFF\x1a\x00\x00\x00WEBPVP8L"), Some(Specification::Webp));
        assert_eq!(detect(b"\x00\x00\x00\x1cftypavif\x00\x00"), Some(Specification::Avif));
        assert_eq!(detect(b"BM\x36\x00\x0c\x00\x00\x00\x00\x00\x36\x00"), Some(Specification::Bmp));
        assert_eq!(detect(b"BMW owners club"), None);
        assert_eq!(detect(b"RIFF\x24\x08\x00\x00WAVE"), None);
    }

    #[test]
    fn test_hints() {
        let jpeg = BitmapFormatSniffer
            .sniff_hints(&FormatHints::new().with_file_extension("JPEG"))
            .unwrap();
        assert_eq!(jpeg.file_extension(), "jpg");

        let webp = BitmapFormatSniffer
            .sniff_hints(&FormatHints::new().with_media_type("image/webp"))
            .unwrap();
        assert_eq!(webp.specifications(), &[Specification::Webp]);
    }

    #[tokio::test]
    async fn test_blob_only_classifies_unknown_content() {
        let blob = Blob::from_bytes("page", &b"GIF87a\x01\x00\x01\x00"[..]);
        assert!(BitmapFormatSniffer.sniff_blob(&blob, &Format::empty()).await.unwrap().is_some());

        let zip = Format::new(&[Specification::Zip], media_types::ZIP, "zip");
        assert!(BitmapFormatSniffer.sniff_blob(&blob, &zip).await.unwrap().is_none());
    }
}
