//! Every built-in detector, in priority order.

use async_trait::async_trait;

use super::{
    AudioFormatSniffer, AudiobookFormatSniffer, BitmapFormatSniffer, ComicFormatSniffer,
    CompositeFormatSniffer, EpubFormatSniffer, FormatSniffer, HtmlFormatSniffer,
    JsonFormatSniffer, LanguageFormatSniffer, LcpLicenseFormatSniffer, LpfFormatSniffer,
    OpdsFormatSniffer, PdfFormatSniffer, RarFormatSniffer, Resolution, RpfFormatSniffer,
    RwpmFormatSniffer, XmlFormatSniffer, ZipFormatSniffer,
};
use crate::blob::Blob;
use crate::common::Result;
use crate::container::Container;
use crate::format::{Format, FormatHints};

/// Built-in detectors in resolution order.
///
/// Cheap structured-data checks come first, then the archive signatures,
/// then the package detectors layered on ZIP and RAR. Signature-only
/// formats follow, and plain text is the very last guess.
fn builtin_sniffers() -> Vec<Box<dyn FormatSniffer>> {
    vec![
        Box::new(JsonFormatSniffer),
        Box::new(OpdsFormatSniffer),
        Box::new(RwpmFormatSniffer),
        Box::new(LcpLicenseFormatSniffer),
        Box::new(XmlFormatSniffer),
        Box::new(HtmlFormatSniffer),
        Box::new(ZipFormatSniffer),
        Box::new(RarFormatSniffer),
        Box::new(RpfFormatSniffer),
        Box::new(EpubFormatSniffer),
        Box::new(LpfFormatSniffer),
        Box::new(AudiobookFormatSniffer),
        Box::new(ComicFormatSniffer),
        Box::new(PdfFormatSniffer),
        Box::new(AudioFormatSniffer),
        Box::new(BitmapFormatSniffer),
        Box::new(LanguageFormatSniffer),
    ]
}

/// Resolves every format known to this crate.
///
/// # Examples
///
/// ```rust
/// use longan::{Blob, DefaultFormatSniffer, FormatHints, Specification};
///
/// # #[tokio::main]
/// # async fn main() -> longan::Result<()> {
/// let sniffer = DefaultFormatSniffer::new();
///
/// let blob = Blob::from_bytes("document", &b"%PDF-1.7\n"[..]);
/// let format = sniffer.resolve_blob(&FormatHints::new(), &blob).await?;
/// assert!(format.is_some_and(|f| f.conforms_to(Specification::Pdf)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DefaultFormatSniffer {
    inner: CompositeFormatSniffer,
}

impl DefaultFormatSniffer {
    pub fn new() -> Self {
        Self {
            inner: CompositeFormatSniffer::new(builtin_sniffers()),
        }
    }

    /// Run `sniffers` before the built-in ones.
    pub fn with_additional_sniffers(sniffers: Vec<Box<dyn FormatSniffer>>) -> Self {
        let mut all = sniffers;
        all.extend(builtin_sniffers());
        Self {
            inner: CompositeFormatSniffer::new(all),
        }
    }

    /// The underlying composite.
    pub fn composite(&self) -> &CompositeFormatSniffer {
        &self.inner
    }

    /// See [`CompositeFormatSniffer::resolve`].
    pub fn resolve(&self, hints: &FormatHints) -> Option<Format> {
        self.inner.resolve(hints)
    }

    pub async fn resolve_blob(&self, hints: &FormatHints, blob: &Blob) -> Result<Option<Format>> {
        self.inner.resolve_blob(hints, blob).await
    }

    pub async fn resolve_container(
        &self,
        hints: &FormatHints,
        container: &dyn Container,
    ) -> Result<Option<Format>> {
        self.inner.resolve_container(hints, container).await
    }

    pub async fn resolve_container_with_encryption(
        &self,
        hints: &FormatHints,
        container: &dyn Container,
    ) -> Result<Option<Resolution>> {
        self.inner
            .resolve_container_with_encryption(hints, container)
            .await
    }

    pub async fn resolve_asset(
        &self,
        hints: &FormatHints,
        blob: Option<&Blob>,
        container: Option<&dyn Container>,
    ) -> Result<Option<Format>> {
        self.inner.resolve_asset(hints, blob, container).await
    }

    pub async fn refine(
        &self,
        format: Format,
        blob: Option<&Blob>,
        container: Option<&dyn Container>,
    ) -> Result<Format> {
        self.inner.refine(format, blob, container).await
    }
}

impl Default for DefaultFormatSniffer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormatSniffer for DefaultFormatSniffer {
    fn name(&self) -> &'static str {
        "default"
    }

    fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
        self.inner.sniff_hints(hints)
    }

    async fn sniff_blob(&self, blob: &Blob, format: &Format) -> Result<Option<Format>> {
        self.inner.sniff_blob(blob, format).await
    }

    async fn sniff_container(
        &self,
        container: &dyn Container,
        format: &Format,
    ) -> Result<Option<Format>> {
        self.inner.sniff_container(container, format).await
    }
}
