//! PDF documents.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

fn pdf_format() -> Format {
    Format::new(&[Specification::Pdf], media_types::PDF, "pdf")
}

/// Detects PDF documents by their `%PDF-` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfFormatSniffer;

#[async_trait]
impl FormatSniffer for PdfFormatSniffer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(hints, &["pdf"], &[media_types::PDF]).then(pdf_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        let prefix = blob.read_prefix(PDF_SIGNATURE.len() as u64).await?;
        Ok((prefix.as_ref() == PDF_SIGNATURE).then(pdf_format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::tests::sniff_blob_with;

    #[tokio::test]
    async fn test_signature() {
        let pdf = Blob::from_bytes("doc", &b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"[..]);
        assert_eq!(
            sniff_blob_with(&PdfFormatSniffer, Format::empty(), &pdf).await,
            Some(pdf_format())
        );

        let short = Blob::from_bytes("short", &b"%PDF"[..]);
        assert!(sniff_blob_with(&PdfFormatSniffer, Format::empty(), &short).await.is_none());
    }

    #[test]
    fn test_hints() {
        let hints = FormatHints::new().with_media_type("application/pdf");
        assert_eq!(PdfFormatSniffer.sniff_hints(&hints), Some(pdf_format()));
    }
}
