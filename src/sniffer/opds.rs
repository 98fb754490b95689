//! OPDS catalogs, entries, publications and authentication documents.
//!
//! OPDS 1 documents are Atom feeds and entries, refined from
//! [`Specification::Xml`]. OPDS 2 documents and authentication documents are
//! refined from [`Specification::Json`].

use async_trait::async_trait;

use super::FormatSniffer;
use crate::blob::Blob;
use crate::common::Result;
use crate::format::{Format, FormatHints, Specification, media_types};

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Relations starting with this prefix mark OPDS acquisition links.
const ACQUISITION_REL_PREFIX: &str = "http://opds-spec.org/acquisition";

/// Keys every authentication document carries.
const AUTHENTICATION_KEYS: [&str; 3] = ["id", "title", "authentication"];

const OPDS_SPECIFICATIONS: [Specification; 5] = [
    Specification::Opds1Catalog,
    Specification::Opds1Entry,
    Specification::Opds2Catalog,
    Specification::Opds2Publication,
    Specification::OpdsAuthentication,
];

/// Detects OPDS 1 and OPDS 2 documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpdsFormatSniffer;

impl OpdsFormatSniffer {
    async fn sniff_atom(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        let Some(document) = blob.read_as_xml().await? else {
            return Ok(None);
        };
        let root = document.root();
        let refined = if root.is(Some(ATOM_NAMESPACE), "feed") {
            Some(format.refined(
                &[Specification::Opds1Catalog],
                media_types::OPDS1_CATALOG,
                "atom",
            ))
        } else if root.is(Some(ATOM_NAMESPACE), "entry") {
            Some(format.refined(
                &[Specification::Opds1Entry],
                media_types::OPDS1_ENTRY,
                "atom",
            ))
        } else {
            None
        };
        Ok(refined)
    }

    async fn sniff_json(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if let Some(manifest) = blob.read_as_manifest().await? {
            if manifest
                .self_link()
                .is_some_and(|link| link.has_media_type(media_types::OPDS2_CATALOG))
            {
                return Ok(Some(format.refined(
                    &[Specification::Opds2Catalog],
                    media_types::OPDS2_CATALOG,
                    "json",
                )));
            }
            let acquisition = manifest
                .links
                .iter()
                .flat_map(|link| link.rel.iter())
                .any(|rel| rel.starts_with(ACQUISITION_REL_PREFIX));
            if acquisition {
                return Ok(Some(format.refined(
                    &[Specification::Opds2Publication],
                    media_types::OPDS2_PUBLICATION,
                    "json",
                )));
            }
        }

        let is_authentication = blob
            .read_as_json()
            .await?
            .and_then(|value| value.as_object())
            .is_some_and(|object| AUTHENTICATION_KEYS.iter().all(|key| object.contains_key(*key)));
        Ok(is_authentication.then(|| {
            format.refined(
                &[Specification::OpdsAuthentication],
                media_types::OPDS_AUTHENTICATION,
                "json",
            )
        }))
    }
}

#[async_trait]
impl FormatSniffer for OpdsFormatSniffer {
    fn name(&self) -> &'static str {
        "opds"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        use Specification::*;

        // The entry type carries the catalog profile too, so test it first.
        if hints.has_media_type(&[media_types::OPDS1_ENTRY]) {
            return Some(Format::new(&[Xml, Opds1Entry], media_types::OPDS1_ENTRY, "atom"));
        }
        if hints.has_media_type(&[media_types::OPDS1_CATALOG]) {
            return Some(Format::new(&[Xml, Opds1Catalog], media_types::OPDS1_CATALOG, "atom"));
        }
        if hints.has_media_type(&[media_types::OPDS2_CATALOG]) {
            return Some(Format::new(&[Json, Opds2Catalog], media_types::OPDS2_CATALOG, "json"));
        }
        if hints.has_media_type(&[media_types::OPDS2_PUBLICATION]) {
            return Some(Format::new(
                &[Json, Opds2Publication],
                media_types::OPDS2_PUBLICATION,
                "json",
            ));
        }
        if hints.has_media_type(&[
            media_types::OPDS_AUTHENTICATION,
            media_types::OPDS_AUTHENTICATION_V1,
        ]) {
            return Some(Format::new(
                &[Json, OpdsAuthentication],
                media_types::OPDS_AUTHENTICATION,
                "json",
            ));
        }
        None
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        if format.conforms_to_any(&OPDS_SPECIFICATIONS) {
            return Ok(None);
        }
        if format.conforms_to(Specification::Xml) {
            return self.sniff_atom(blob, format).await;
        }
        if format.conforms_to(Specification::Json)
            && !format.conforms_to_any(&[Specification::Rwpm, Specification::LcpLicense])
        {
            return self.sniff_json(blob, format).await;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::tests::sniff_blob_with;

    fn xml() -> Format {
        Format::new(&[Specification::Xml], media_types::XML, "xml")
    }

    fn json() -> Format {
        Format::new(&[Specification::Json], media_types::JSON, "json")
    }

    #[test]
    fn test_hints() {
        let entry = FormatHints::new()
            .with_media_type("application/atom+xml;type=entry;profile=opds-catalog");
        let format = OpdsFormatSniffer.sniff_hints(&entry).unwrap();
        assert!(format.conforms_to(Specification::Opds1Entry));

        let catalog =
            FormatHints::new().with_media_type("application/atom+xml;profile=opds-catalog;kind=navigation");
        let format = OpdsFormatSniffer.sniff_hints(&catalog).unwrap();
        assert!(format.conforms_to(Specification::Opds1Catalog));

        let plain_atom = FormatHints::new().with_media_type("application/atom+xml");
        assert!(OpdsFormatSniffer.sniff_hints(&plain_atom).is_none());

        let auth = FormatHints::new().with_media_type(media_types::OPDS_AUTHENTICATION_V1);
        let format = OpdsFormatSniffer.sniff_hints(&auth).unwrap();
        assert!(format.conforms_to(Specification::OpdsAuthentication));
    }

    #[tokio::test]
    async fn test_atom_feed_and_entry() {
        let feed = Blob::from_bytes(
            "feed.atom",
            r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>Catalog</title></feed>"#,
        );
        let format = sniff_blob_with(&OpdsFormatSniffer, xml(), &feed).await.unwrap();
        assert!(format.conforms_to_all(&[Specification::Xml, Specification::Opds1Catalog]));
        assert_eq!(format.media_type(), media_types::OPDS1_CATALOG);

        let entry = Blob::from_bytes(
            "entry.atom",
            r#"<atom:entry xmlns:atom="http://www.w3.org/2005/Atom"/>"#,
        );
        let format = sniff_blob_with(&OpdsFormatSniffer, xml(), &entry).await.unwrap();
        assert!(format.conforms_to(Specification::Opds1Entry));

        let rss = Blob::from_bytes("rss", "<rss><channel/></rss>");
        assert!(sniff_blob_with(&OpdsFormatSniffer, xml(), &rss).await.is_none());
    }

    #[tokio::test]
    async fn test_opds2_catalog() {
        let catalog = Blob::from_bytes(
            "catalog.json",
            r#"{"metadata": {"title": "Catalog"},
                "links": [{"rel": "self", "href": "/opds", "type": "application/opds+json"}],
                "navigation": []}"#,
        );
        let format = sniff_blob_with(&OpdsFormatSniffer, json(), &catalog).await.unwrap();
        assert!(format.conforms_to(Specification::Opds2Catalog));
        assert_eq!(format.media_type(), media_types::OPDS2_CATALOG);
    }

    #[tokio::test]
    async fn test_opds2_publication() {
        let publication = Blob::from_bytes(
            "publication.json",
            r#"{"metadata": {"title": "Book"},
                "links": [{"rel": "http://opds-spec.org/acquisition/open-access",
                           "href": "/book.epub", "type": "application/epub+zip"}]}"#,
        );
        let format = sniff_blob_with(&OpdsFormatSniffer, json(), &publication).await.unwrap();
        assert!(format.conforms_to(Specification::Opds2Publication));
    }

    #[tokio::test]
    async fn test_authentication_document() {
        let auth = Blob::from_bytes(
            "auth.json",
            r#"{"id": "https://example.com/auth", "title": "Library", "authentication": []}"#,
        );
        let format = sniff_blob_with(&OpdsFormatSniffer, json(), &auth).await.unwrap();
        assert!(format.conforms_to(Specification::OpdsAuthentication));

        let other = Blob::from_bytes("other.json", r#"{"id": "x", "title": "y"}"#);
        assert!(sniff_blob_with(&OpdsFormatSniffer, json(), &other).await.is_none());
    }
}
