//! Lazy, memoizing access to the content of an asset.
//!
//! A [`Blob`] wraps any [`ByteSource`] and adds decoded views (text, XML
//! tree, JSON value, publication manifest). Each view is computed at most
//! once per blob, so several sniffers asking for the same parse within one
//! resolution share the work.
//!
//! Decoded views distinguish two outcomes:
//!
//! - `Err(_)`: the underlying source could not be read. Resolution stops.
//! - `Ok(None)`: the content is not of that shape (or is larger than
//!   [`SniffOptions::max_parse_length`]). This is ordinary negative evidence.

pub mod source;
pub mod xml;

use std::fmt;
use std::ops::Range;
use std::path::Path;

use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::trace;

use crate::common::{Error, Result};
use crate::common::bom::{decode_text, decode_utf8_prefix};
use crate::config::SniffOptions;
use crate::manifest::Manifest;

pub use source::{ByteSource, FileSource, MemorySource};
pub use xml::{XmlAttribute, XmlDocument, XmlElement, XmlParseError};

/// A memoizing view over the bytes of one asset or archive entry.
///
/// # Examples
///
/// ```rust
/// use longan::Blob;
///
/// # #[tokio::main]
/// # async fn main() -> longan::Result<()> {
/// let blob = Blob::from_bytes("catalog.json", r#"{"id": 1}"#);
/// assert!(blob.read_as_json().await?.is_some());
/// assert!(blob.read_as_xml().await?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct Blob {
    source: Box<dyn ByteSource>,
    options: SniffOptions,
    length: OnceCell<u64>,
    content: OnceCell<Option<Bytes>>,
    text: OnceCell<Option<String>>,
    xml: OnceCell<Option<XmlDocument>>,
    json: OnceCell<Option<serde_json::Value>>,
    manifest: OnceCell<Option<Manifest>>,
}

impl Blob {
    /// Wrap a byte source with default options.
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::with_options(source, SniffOptions::default())
    }

    pub fn with_options(source: impl ByteSource + 'static, options: SniffOptions) -> Self {
        Self::from_boxed(Box::new(source), options)
    }

    pub(crate) fn from_boxed(source: Box<dyn ByteSource>, options: SniffOptions) -> Self {
        Self {
            source,
            options,
            length: OnceCell::new(),
            content: OnceCell::new(),
            text: OnceCell::new(),
            xml: OnceCell::new(),
            json: OnceCell::new(),
            manifest: OnceCell::new(),
        }
    }

    /// A blob over in-memory content.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(MemorySource::new(name, data))
    }

    /// A blob over a local file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Name of the underlying resource.
    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn options(&self) -> &SniffOptions {
        &self.options
    }

    /// Total length of the content.
    pub async fn length(&self) -> Result<u64> {
        self.length
            .get_or_try_init(|| self.source.length())
            .await
            .copied()
    }

    /// Read a byte range, clamped to the content length. `None` reads
    /// everything.
    pub async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes> {
        self.source.read(range).await
    }

    /// Read at most `len` leading bytes.
    pub async fn read_prefix(&self, len: u64) -> Result<Bytes> {
        self.read(Some(0..len)).await
    }

    /// The leading [`SniffOptions::text_sniff_length`] bytes decoded as
    /// UTF-8, or `None` if they are not text.
    pub async fn read_text_prefix(&self) -> Result<Option<String>> {
        let prefix = self
            .read_prefix(self.options.text_sniff_length as u64)
            .await?;
        Ok(decode_utf8_prefix(&prefix).map(str::to_string))
    }

    /// Whole content, unless it exceeds the parse limit.
    async fn content(&self) -> Result<Option<&Bytes>> {
        let content = self
            .content
            .get_or_try_init(|| async {
                let length = self.length().await?;
                if length > self.options.max_parse_length {
                    trace!(
                        blob = self.name(),
                        length,
                        limit = self.options.max_parse_length,
                        "content too large to parse"
                    );
                    return Ok(None);
                }
                self.read(None).await.map(Some)
            })
            .await?;
        Ok(content.as_ref())
    }

    /// The whole content decoded as text, honouring a UTF-8 or UTF-16 BOM.
    pub async fn read_as_text(&self) -> Result<Option<&str>> {
        let text = self
            .text
            .get_or_try_init(|| async {
                let Some(content) = self.content().await? else {
                    return Ok(None);
                };
                let text = decode_text(content);
                if text.is_none() {
                    trace!(blob = self.name(), "content is not text");
                }
                Ok::<_, Error>(text)
            })
            .await?;
        Ok(text.as_deref())
    }

    /// The whole content parsed as a namespace-aware XML tree.
    pub async fn read_as_xml(&self) -> Result<Option<&XmlDocument>> {
        let document = self
            .xml
            .get_or_try_init(|| async {
                // Parse the decoded text so UTF-16 documents are supported.
                let parsed = match self.read_as_text().await? {
                    Some(text) => XmlDocument::parse(text.as_bytes()),
                    None => match self.content().await? {
                        Some(content) => XmlDocument::parse(content),
                        None => return Ok(None),
                    },
                };
                Ok::<_, Error>(parsed
                    .inspect_err(|e| trace!(blob = self.name(), error = %e, "content is not XML"))
                    .ok())
            })
            .await?;
        Ok(document.as_ref())
    }

    /// The whole content parsed as a JSON object or array.
    ///
    /// Scalar JSON documents are not considered structured data.
    pub async fn read_as_json(&self) -> Result<Option<&serde_json::Value>> {
        let value = self
            .json
            .get_or_try_init(|| async {
                let Some(text) = self.read_as_text().await? else {
                    return Ok(None);
                };
                match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(value) if value.is_object() || value.is_array() => Ok::<_, Error>(Some(value)),
                    Ok(_) => {
                        trace!(blob = self.name(), "JSON content is a scalar");
                        Ok(None)
                    },
                    Err(e) => {
                        trace!(blob = self.name(), error = %e, "content is not JSON");
                        Ok(None)
                    },
                }
            })
            .await?;
        Ok(value.as_ref())
    }

    /// The JSON content deserialized as a publication manifest.
    pub async fn read_as_manifest(&self) -> Result<Option<&Manifest>> {
        let manifest = self
            .manifest
            .get_or_try_init(|| async {
                let Some(value) = self.read_as_json().await? else {
                    return Ok(None);
                };
                Ok::<_, Error>(Manifest::from_value(value)
                    .inspect_err(|e| trace!(blob = self.name(), error = %e, "content is not a manifest"))
                    .ok())
            })
            .await?;
        Ok(manifest.as_ref())
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("name", &self.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts full reads to check memoization.
    struct CountingSource {
        data: Bytes,
        full_reads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ByteSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn length(&self) -> Result<u64> {
            Ok(self.data.len() as u64)
        }

        async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes> {
            if range.is_none() {
                self.full_reads.fetch_add(1, Ordering::SeqCst);
            }
            Ok(source::slice_bytes(&self.data, range))
        }
    }

    #[tokio::test]
    async fn test_views_are_memoized() {
        let full_reads = Arc::new(AtomicUsize::new(0));
        let blob = Blob::new(CountingSource {
            data: Bytes::from_static(br#"{"id": "x", "issued": "now"}"#),
            full_reads: full_reads.clone(),
        });

        assert!(blob.read_as_json().await.unwrap().is_some());
        assert!(blob.read_as_json().await.unwrap().is_some());
        assert!(blob.read_as_xml().await.unwrap().is_none());
        assert!(blob.read_as_manifest().await.unwrap().is_none());
        assert_eq!(full_reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_json_view_rejects_scalars() {
        assert!(Blob::from_bytes("n", "42").read_as_json().await.unwrap().is_none());
        assert!(Blob::from_bytes("a", "[1, 2]").read_as_json().await.unwrap().is_some());
        assert!(Blob::from_bytes("b", "{oops").read_as_json().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_utf16_xml() {
        let mut data = vec![0xFF, 0xFE];
        for unit in "<root/>".encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        let blob = Blob::from_bytes("utf16.xml", data);
        assert_eq!(blob.read_as_text().await.unwrap(), Some("<root/>"));
        let doc = blob.read_as_xml().await.unwrap().unwrap();
        assert_eq!(doc.root().local_name(), "root");
    }

    #[tokio::test]
    async fn test_parse_limit() {
        let blob = Blob::with_options(
            MemorySource::new("big", &b"{\"a\": 1}"[..]),
            SniffOptions::new().with_max_parse_length(4),
        );
        assert!(blob.read_as_text().await.unwrap().is_none());
        assert!(blob.read_as_json().await.unwrap().is_none());
        // Raw reads are not limited.
        assert_eq!(blob.read(None).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_text_prefix() {
        let blob = Blob::with_options(
            MemorySource::new("t", "héllo world, this is long enough".as_bytes().to_vec()),
            SniffOptions::new().with_text_sniff_length(16),
        );
        let prefix = blob.read_text_prefix().await.unwrap().unwrap();
        assert!(prefix.starts_with("héllo"));
        assert!(prefix.len() <= 16);

        let binary = Blob::from_bytes("b", vec![0xFF, 0x00, 0x81]);
        assert!(binary.read_text_prefix().await.unwrap().is_none());
    }
}
