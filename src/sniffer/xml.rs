//! Generic XML documents.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

fn xml_format() -> Format {
    Format::new(&[Specification::Xml], media_types::XML, "xml")
}

/// Detects well-formed XML documents.
///
/// A document is XML when it parses. XML-based formats (OPDS 1, XHTML) are
/// refined from the [`Specification::Xml`] this detector establishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlFormatSniffer;

#[async_trait]
impl FormatSniffer for XmlFormatSniffer {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        (hints_match(hints, &["xml"], &[media_types::XML, "text/xml"])
            || hints.has_media_type_suffix("application", "xml"))
        .then(xml_format)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.is_empty() {
            return Ok(None);
        }
        Ok(blob.read_as_xml().await?.is_some().then(xml_format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::tests::sniff_blob_with;

    #[test]
    fn test_hints() {
        let hints = FormatHints::new().with_media_type("text/xml; charset=utf-8");
        assert_eq!(XmlFormatSniffer.sniff_hints(&hints), Some(xml_format()));
        let atom = FormatHints::new().with_media_type("application/atom+xml");
        assert_eq!(XmlFormatSniffer.sniff_hints(&atom), Some(xml_format()));
    }

    #[tokio::test]
    async fn test_blob() {
        let doc = Blob::from_bytes("doc", "<?xml version=\"1.0\"?>\n<root><child/></root>");
        assert_eq!(
            sniff_blob_with(&XmlFormatSniffer, Format::empty(), &doc).await,
            Some(xml_format())
        );

        let html = Blob::from_bytes("page", "<!DOCTYPE html><p>unclosed");
        assert!(sniff_blob_with(&XmlFormatSniffer, Format::empty(), &html).await.is_none());
    }
}
