//! Conformance tags a format can carry.

use std::fmt;

/// A structural layer an asset conforms to.
///
/// A [`Format`](super::Format) is described by the set of specifications it
/// satisfies, from the outer container (e.g. [`Specification::Zip`]) to the
/// most specific classification (e.g. [`Specification::Epub`], then
/// [`Specification::Lcp`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Specification {
    // Archives
    Zip,
    Rar,

    // Syntax
    Json,
    Xml,
    Html,

    // Publication manifests and catalogs
    Opds1Catalog,
    Opds1Entry,
    Opds2Catalog,
    Opds2Publication,
    OpdsAuthentication,
    Rwpm,
    LcpLicense,

    // Publication packages and documents
    Epub,
    Rpf,
    Lpf,
    Pdf,
    InformalAudiobook,
    InformalComic,

    // Protection schemes
    Lcp,
    Adept,

    // Languages
    Css,
    JavaScript,
    Text,

    // Audio
    Aac,
    Aiff,
    Flac,
    Mp3,
    Mp4,
    Ogg,
    Opus,
    Wav,
    Webm,

    // Bitmaps
    Avif,
    Bmp,
    Gif,
    Jpeg,
    Jxl,
    Png,
    Tiff,
    Webp,
}

impl Specification {
    /// Every known specification.
    ///
    /// Its length bounds the number of refinements a single resolution can
    /// perform, since each accepted refinement adds at least one.
    pub const ALL: &'static [Specification] = &[
        Specification::Zip,
        Specification::Rar,
        Specification::Json,
        Specification::Xml,
        Specification::Html,
        Specification::Opds1Catalog,
        Specification::Opds1Entry,
        Specification::Opds2Catalog,
        Specification::Opds2Publication,
        Specification::OpdsAuthentication,
        Specification::Rwpm,
        Specification::LcpLicense,
        Specification::Epub,
        Specification::Rpf,
        Specification::Lpf,
        Specification::Pdf,
        Specification::InformalAudiobook,
        Specification::InformalComic,
        Specification::Lcp,
        Specification::Adept,
        Specification::Css,
        Specification::JavaScript,
        Specification::Text,
        Specification::Aac,
        Specification::Aiff,
        Specification::Flac,
        Specification::Mp3,
        Specification::Mp4,
        Specification::Ogg,
        Specification::Opus,
        Specification::Wav,
        Specification::Webm,
        Specification::Avif,
        Specification::Bmp,
        Specification::Gif,
        Specification::Jpeg,
        Specification::Jxl,
        Specification::Png,
        Specification::Tiff,
        Specification::Webp,
    ];

    /// Stable identifier of the specification.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Specification::Zip => "zip",
            Specification::Rar => "rar",
            Specification::Json => "json",
            Specification::Xml => "xml",
            Specification::Html => "html",
            Specification::Opds1Catalog => "opds1-catalog",
            Specification::Opds1Entry => "opds1-entry",
            Specification::Opds2Catalog => "opds2-catalog",
            Specification::Opds2Publication => "opds2-publication",
            Specification::OpdsAuthentication => "opds-authentication",
            Specification::Rwpm => "rwpm",
            Specification::LcpLicense => "lcp-license",
            Specification::Epub => "epub",
            Specification::Rpf => "rpf",
            Specification::Lpf => "lpf",
            Specification::Pdf => "pdf",
            Specification::InformalAudiobook => "informal-audiobook",
            Specification::InformalComic => "informal-comic",
            Specification::Lcp => "lcp",
            Specification::Adept => "adept",
            Specification::Css => "css",
            Specification::JavaScript => "javascript",
            Specification::Text => "text",
            Specification::Aac => "aac",
            Specification::Aiff => "aiff",
            Specification::Flac => "flac",
            Specification::Mp3 => "mp3",
            Specification::Mp4 => "mp4",
            Specification::Ogg => "ogg",
            Specification::Opus => "opus",
            Specification::Wav => "wav",
            Specification::Webm => "webm",
            Specification::Avif => "avif",
            Specification::Bmp => "bmp",
            Specification::Gif => "gif",
            Specification::Jpeg => "jpeg",
            Specification::Jxl => "jxl",
            Specification::Png => "png",
            Specification::Tiff => "tiff",
            Specification::Webp => "webp",
        }
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
