#![cfg(feature = "zip")]

use std::io::{Cursor, Write};

use longan::{
    Blob, DefaultFormatSniffer, DirectoryContainer, Error, Format, FormatHints, Specification,
    ZipContainer, media_types,
};
use proptest::prelude::*;
use zip::write::SimpleFileOptions;

fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, content) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const LICENSE: &str = r#"{
  "id": "ef15e740-697f-11e3-949a-0800200c9a66",
  "issued": "2013-11-04T01:08:15+01:00",
  "provider": "https://www.imaginaryebookretailer.com",
  "encryption": {
    "profile": "http://readium.org/lcp/basic-profile",
    "content_key": {"algorithm": "http://www.w3.org/2001/04/xmlenc#aes256-cbc"}
  },
  "links": []
}"#;

#[test]
fn test_epub_from_extension() {
    let format = DefaultFormatSniffer::new()
        .resolve(&FormatHints::new().with_file_extension("epub"))
        .unwrap();
    assert!(format.conforms_to_all(&[Specification::Zip, Specification::Epub]));
    assert_eq!(format.specifications().len(), 2);
    assert_eq!(format.media_type(), "application/epub+zip");
    assert_eq!(format.file_extension(), "epub");
}

#[tokio::test]
async fn test_lcp_protected_epub() {
    let data = zip_archive(&[
        ("mimetype", b"application/epub+zip"),
        ("META-INF/container.xml", CONTAINER_XML),
        ("META-INF/license.lcpl", LICENSE.as_bytes()),
        ("OEBPS/content.opf", b"<package/>"),
    ]);
    let container = ZipContainer::from_bytes("book", data).unwrap();
    let sniffer = DefaultFormatSniffer::new();

    let format = sniffer
        .resolve_container(&FormatHints::new(), &container)
        .await
        .unwrap()
        .unwrap();
    assert!(format.conforms_to_all(&[Specification::Zip, Specification::Epub, Specification::Lcp]));
    assert_eq!(format.specifications().len(), 3);
    assert_eq!(format.media_type(), media_types::EPUB);

    // Same result when the hints already tell it is an EPUB.
    let hinted = sniffer
        .resolve_container(&FormatHints::new().with_file_extension("epub"), &container)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hinted, format);

    // No encryption.xml: the map is empty, but present.
    let resolution = sniffer
        .resolve_container_with_encryption(&FormatHints::new(), &container)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolution.encryption.map(|map| map.len()), Some(0));
}

#[tokio::test]
async fn test_comic_archive() {
    let data = zip_archive(&[
        ("01.jpg", b"\xFF\xD8\xFF\xE0"),
        ("02.png", b"\x89PNG\r\n\x1a\n"),
        ("03.jpg", b"\xFF\xD8\xFF\xE0"),
    ]);
    let container = ZipContainer::from_bytes("comic", data).unwrap();
    let format = DefaultFormatSniffer::new()
        .resolve_container(&FormatHints::new(), &container)
        .await
        .unwrap()
        .unwrap();
    assert!(format.conforms_to_all(&[Specification::Zip, Specification::InformalComic]));
    assert_eq!(format.specifications().len(), 2);
    assert_eq!(format.media_type(), "application/vnd.comicbook+zip");
    assert_eq!(format.file_extension(), "cbz");
}

#[tokio::test]
async fn test_pdf_signature() {
    let sniffer = DefaultFormatSniffer::new();
    for hints in [
        FormatHints::new(),
        FormatHints::new().with_file_extension("bin"),
        FormatHints::new().with_media_type("application/octet-stream"),
    ] {
        let blob = Blob::from_bytes("document", &b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n"[..]);
        let format = sniffer.resolve_blob(&hints, &blob).await.unwrap().unwrap();
        assert_eq!(format.specifications(), &[Specification::Pdf]);
        assert_eq!(format.media_type(), media_types::PDF);
    }
}

#[tokio::test]
async fn test_lcp_license() {
    let blob = Blob::from_bytes("license", LICENSE);
    let format = DefaultFormatSniffer::new()
        .resolve_blob(&FormatHints::new(), &blob)
        .await
        .unwrap()
        .unwrap();
    assert!(format.conforms_to_all(&[Specification::Json, Specification::LcpLicense]));
    assert_eq!(format.specifications().len(), 2);
    assert_eq!(format.file_extension(), "lcpl");
}

#[tokio::test]
async fn test_hints_keep_precedence() {
    let data = zip_archive(&[("mimetype", b"application/epub+zip")]);
    let blob = Blob::from_bytes("book", data);
    let hints = FormatHints::new().with_file_extension("epub");

    let format = DefaultFormatSniffer::new()
        .resolve_blob(&hints, &blob)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(format.media_type(), media_types::EPUB);
    assert_eq!(format.file_extension(), "epub");
}

#[tokio::test]
async fn test_readium_audiobook_package() {
    let manifest = br#"{
      "@context": "https://readium.org/webpub-manifest/context.jsonld",
      "metadata": {
        "title": "Moby-Dick",
        "conformsTo": "https://readium.org/webpub-manifest/profiles/audiobook"
      },
      "links": [{"rel": "self", "href": "manifest.json", "type": "application/audiobook+json"}],
      "readingOrder": [{"href": "chapter1.mp3", "type": "audio/mpeg"}]
    }"#;
    let data = zip_archive(&[("manifest.json", manifest), ("chapter1.mp3", b"ID3\x04")]);
    let container = ZipContainer::from_bytes("moby", data).unwrap();

    let format = DefaultFormatSniffer::new()
        .resolve_container(&FormatHints::new(), &container)
        .await
        .unwrap()
        .unwrap();
    assert!(format.conforms_to_all(&[Specification::Zip, Specification::Rpf]));
    assert_eq!(format.media_type(), media_types::READIUM_AUDIOBOOK);
    assert_eq!(format.file_extension(), "audiobook");
}

#[tokio::test]
async fn test_exploded_epub() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mimetype"), "application/epub+zip").unwrap();
    std::fs::create_dir(dir.path().join("META-INF")).unwrap();
    std::fs::write(dir.path().join("META-INF/container.xml"), CONTAINER_XML).unwrap();

    let container = DirectoryContainer::open(dir.path()).await.unwrap();
    let format = DefaultFormatSniffer::new()
        .resolve_container(&FormatHints::new(), &container)
        .await
        .unwrap()
        .unwrap();
    assert!(format.conforms_to(Specification::Epub));
    assert!(!format.conforms_to(Specification::Zip));
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blob = Blob::from_path(dir.path().join("missing.epub"));
    let err = DefaultFormatSniffer::new()
        .resolve_blob(&FormatHints::new(), &blob)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Leading bytes steering generated content towards interesting detectors.
const PREFIXES: &[&[u8]] = &[
    b"",
    b"PK\x03\x04",
    b"%PDF-",
    b"{\"id\": 1, ",
    b"<html xmlns=\"http://www.w3.org/1999/xhtml\">",
    b"<!doctype html>",
    b"ID3",
    b"\x89PNG\r\n\x1a\n",
    b"plain text ",
];

fn content() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::sample::select(PREFIXES),
        prop::collection::vec(any::<u8>(), 0..128),
    )
        .prop_map(|(prefix, rest)| [prefix, rest.as_slice()].concat())
}

fn hints() -> impl Strategy<Value = FormatHints> {
    prop::sample::select(vec!["", "zip", "json", "xml", "epub", "pdf", "txt", "cbz"])
        .prop_map(|ext| FormatHints::new().with_file_extension(ext))
}

proptest! {
    #[test]
    fn prop_resolution_is_deterministic(data in content(), hints in hints()) {
        let sniffer = DefaultFormatSniffer::new();
        let (first, second) = runtime().block_on(async {
            let first = sniffer
                .resolve_blob(&hints, &Blob::from_bytes("a", data.clone()))
                .await
                .unwrap();
            let second = sniffer
                .resolve_blob(&hints, &Blob::from_bytes("a", data.clone()))
                .await
                .unwrap();
            (first, second)
        });
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_refinement_is_monotonic_and_idempotent(data in content(), hints in hints()) {
        let sniffer = DefaultFormatSniffer::new();
        let initial = sniffer.resolve(&hints).unwrap_or_else(Format::empty);
        let (resolved, again) = runtime().block_on(async {
            let resolved = sniffer
                .refine(initial.clone(), Some(&Blob::from_bytes("a", data.clone())), None)
                .await
                .unwrap();
            let again = sniffer
                .refine(resolved.clone(), Some(&Blob::from_bytes("a", data.clone())), None)
                .await
                .unwrap();
            (resolved, again)
        });
        prop_assert!(resolved.conforms_to_all(initial.specifications()));
        prop_assert_eq!(again, resolved);
    }
}
