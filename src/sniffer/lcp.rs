//! Readium LCP license documents.

use async_trait::async_trait;

use super::{FormatSniffer, hints_match};
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

/// Keys every LCP license carries.
const REQUIRED_KEYS: [&str; 4] = ["id", "issued", "provider", "encryption"];

/// Detects LCP license documents (`.lcpl`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LcpLicenseFormatSniffer;

#[async_trait]
impl FormatSniffer for LcpLicenseFormatSniffer {
    fn name(&self) -> &'static str {
        "lcp-license"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        hints_match(hints, &["lcpl"], &[media_types::LCP_LICENSE]).then(|| {
            Format::new(
                &[Specification::Json, Specification::LcpLicense],
                media_types::LCP_LICENSE,
                "lcpl",
            )
        })
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if !format.conforms_to(Specification::Json) || format.conforms_to(Specification::LcpLicense) {
            return Ok(None);
        }
        let Some(object) = blob.read_as_json().await?.and_then(|v| v.as_object()) else {
            return Ok(None);
        };
        if !REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)) {
            return Ok(None);
        }
        Ok(Some(format.refined(
            &[Specification::LcpLicense],
            media_types::LCP_LICENSE,
            "lcpl",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::tests::sniff_blob_with;

    fn json() -> Format {
        Format::new(&[Specification::Json], media_types::JSON, "json")
    }

    #[tokio::test]
    async fn test_license_keys() {
        let license = Blob::from_bytes(
            "license.lcpl",
            r#"{"id": "1", "issued": "2024-01-01T00:00:00Z", "provider": "https://example.com",
                "encryption": {}, "links": [], "signature": {}}"#,
        );
        let format = sniff_blob_with(&LcpLicenseFormatSniffer, json(), &license)
            .await
            .unwrap();
        assert!(format.conforms_to_all(&[Specification::Json, Specification::LcpLicense]));
        assert_eq!(format.file_extension(), "lcpl");
        assert_eq!(format.media_type(), media_types::LCP_LICENSE);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let partial = Blob::from_bytes("partial", r#"{"id": "1", "issued": "x", "provider": "y"}"#);
        assert!(sniff_blob_with(&LcpLicenseFormatSniffer, json(), &partial).await.is_none());
    }

    #[tokio::test]
    async fn test_requires_json() {
        let license = Blob::from_bytes(
            "license",
            r#"{"id": "1", "issued": "x", "provider": "y", "encryption": {}}"#,
        );
        assert!(sniff_blob_with(&LcpLicenseFormatSniffer, Format::empty(), &license).await.is_none());
    }
}
