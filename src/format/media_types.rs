//! Canonical media types and file extensions of the built-in formats.

pub const ZIP: &str = "application/zip";
pub const RAR: &str = "application/vnd.rar";
pub const JSON: &str = "application/json";
pub const XML: &str = "application/xml";
pub const HTML: &str = "text/html";
pub const XHTML: &str = "application/xhtml+xml";

pub const OPDS1_CATALOG: &str = "application/atom+xml;profile=opds-catalog";
pub const OPDS1_ENTRY: &str = "application/atom+xml;type=entry;profile=opds-catalog";
pub const OPDS2_CATALOG: &str = "application/opds+json";
pub const OPDS2_PUBLICATION: &str = "application/opds-publication+json";
pub const OPDS_AUTHENTICATION: &str = "application/opds-authentication+json";
pub const OPDS_AUTHENTICATION_V1: &str = "application/vnd.opds.authentication.v1.0+json";

pub const READIUM_WEBPUB_MANIFEST: &str = "application/webpub+json";
pub const READIUM_AUDIOBOOK_MANIFEST: &str = "application/audiobook+json";
pub const DIVINA_MANIFEST: &str = "application/divina+json";
pub const LCP_LICENSE: &str = "application/vnd.readium.lcp.license.v1.0+json";

pub const EPUB: &str = "application/epub+zip";
pub const READIUM_WEBPUB: &str = "application/webpub+zip";
pub const READIUM_AUDIOBOOK: &str = "application/audiobook+zip";
pub const DIVINA: &str = "application/divina+zip";
pub const LCP_PROTECTED_AUDIOBOOK: &str = "application/audiobook+lcp";
pub const LCP_PROTECTED_PDF: &str = "application/pdf+lcp";
pub const LPF: &str = "application/lpf+zip";
pub const PDF: &str = "application/pdf";
pub const ZAB: &str = "application/x.readium.zab+zip";
pub const CBZ: &str = "application/vnd.comicbook+zip";
pub const CBR: &str = "application/vnd.comicbook-rar";

pub const CSS: &str = "text/css";
pub const JAVASCRIPT: &str = "text/javascript";
pub const TEXT: &str = "text/plain";

pub const AAC: &str = "audio/aac";
pub const AIFF: &str = "audio/aiff";
pub const FLAC: &str = "audio/flac";
pub const MP3: &str = "audio/mpeg";
pub const MP4: &str = "audio/mp4";
pub const OGG: &str = "audio/ogg";
pub const OPUS: &str = "audio/opus";
pub const WAV: &str = "audio/wav";
pub const WEBM: &str = "audio/webm";

pub const AVIF: &str = "image/avif";
pub const BMP: &str = "image/bmp";
pub const GIF: &str = "image/gif";
pub const JPEG: &str = "image/jpeg";
pub const JXL: &str = "image/jxl";
pub const PNG: &str = "image/png";
pub const TIFF: &str = "image/tiff";
pub const WEBP: &str = "image/webp";

/// Media type of content nothing has been established about.
pub const OCTET_STREAM: &str = "application/octet-stream";
