//! Format detectors and the resolvers composing them.
//!
//! Every detector implements [`FormatSniffer`]. Each of its three checks is
//! optional and abstains by default:
//!
//! - [`FormatSniffer::sniff_hints`] looks at the [`FormatHints`] only. It is
//!   synchronous and never reads content.
//! - [`FormatSniffer::sniff_blob`] may read bytes or parse the content of a
//!   [`Blob`].
//! - [`FormatSniffer::sniff_container`] may list and open the entries of a
//!   [`Container`].
//!
//! Content and container checks receive the format established so far and
//! must only return a format that refines it. A detector whose signature is
//! absent returns `Ok(None)`; `Err(_)` is reserved for read failures of the
//! accessor itself.
//!
//! [`CompositeFormatSniffer`] runs an ordered list of detectors until no
//! detector refines the format any further, and [`DefaultFormatSniffer`]
//! does so with every built-in detector.

mod archive;
mod audio;
mod audiobook;
mod bitmap;
mod comic;
mod composite;
mod default;
mod epub;
mod html;
mod json;
mod language;
mod lcp;
mod lpf;
mod opds;
mod pdf;
mod rpf;
mod rwpm;
mod xml;

use async_trait::async_trait;

use crate::blob::Blob;
use crate::common::Result;
use crate::container::Container;
use crate::format::{Format, FormatHints};

pub use archive::{RarFormatSniffer, ZipFormatSniffer};
pub use audio::AudioFormatSniffer;
pub use audiobook::AudiobookFormatSniffer;
pub use bitmap::BitmapFormatSniffer;
pub use comic::ComicFormatSniffer;
pub use composite::{CompositeFormatSniffer, Resolution};
pub use default::DefaultFormatSniffer;
pub use epub::EpubFormatSniffer;
pub use html::HtmlFormatSniffer;
pub use json::JsonFormatSniffer;
pub use language::LanguageFormatSniffer;
pub use lcp::LcpLicenseFormatSniffer;
pub use lpf::LpfFormatSniffer;
pub use opds::OpdsFormatSniffer;
pub use pdf::PdfFormatSniffer;
pub use rpf::RpfFormatSniffer;
pub use rwpm::RwpmFormatSniffer;
pub use xml::XmlFormatSniffer;

/// A stateless format detector.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use longan::{Format, FormatHints, FormatSniffer, Specification};
///
/// /// Recognizes Markdown files by extension.
/// struct MarkdownSniffer;
///
/// #[async_trait]
/// impl FormatSniffer for MarkdownSniffer {
///     fn name(&self) -> &'static str {
///         "markdown"
///     }
///
///     fn sniff_hints(&self, hints: &FormatHints) -> Option<Format> {
///         hints
///             .has_file_extension(&["md", "markdown"])
///             .then(|| Format::new(&[Specification::Text], "text/markdown", "md"))
///     }
/// }
/// ```
#[async_trait]
pub trait FormatSniffer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Resolve a format from the hints alone.
    fn sniff_hints(&self, _hints: &FormatHints) -> Option<Format> {
        None
    }

    /// Refine `format` from the content of `blob`.
    async fn sniff_blob(&self, _blob: &Blob, _format: &Format) -> Result<Option<Format>> {
        Ok(None)
    }

    /// Refine `format` from the entries of `container`.
    async fn sniff_container(
        &self,
        _container: &dyn Container,
        _format: &Format,
    ) -> Result<Option<Format>> {
        Ok(None)
    }
}

/// Returns `true` if the hints carry one of the extensions or media types.
pub(crate) fn hints_match(hints: &FormatHints, extensions: &[&str], media_types: &[&str]) -> bool {
    hints.has_file_extension(extensions) || hints.has_media_type(media_types)
}

/// Returns `true` if `bytes` starts with one of the signatures.
pub(crate) fn starts_with_any(bytes: &[u8], signatures: &[&[u8]]) -> bool {
    signatures.iter().any(|signature| bytes.starts_with(signature))
}
