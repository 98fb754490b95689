//! Longan - Progressive format resolution for publication assets
//!
//! This library identifies the precise format of an e-book, archive, image,
//! document or publication manifest from progressively more expensive
//! evidence: declared hints (file extension, media type), then the bytes
//! and parsed content of the asset, then the entries of archive-like assets.
//!
//! # Features
//!
//! - **Hint resolution**: Instant, synchronous resolution from file
//!   extensions and declared media types
//! - **Content sniffing**: Magic numbers, XML and JSON structure, manifest
//!   and license shapes
//! - **Container sniffing**: EPUB, Readium packages, W3C LPF, comic and
//!   audiobook archives, with LCP and Adept DRM detection
//! - **Minimal reads**: Signature checks read a few bytes, and every parsed
//!   view is computed at most once per asset
//! - **Extensible**: Custom detectors implement [`FormatSniffer`] and run
//!   before the built-in ones
//!
//! # Example - Resolving from hints
//!
//! ```rust
//! use longan::{DefaultFormatSniffer, FormatHints, Specification, media_types};
//!
//! let sniffer = DefaultFormatSniffer::new();
//! let format = sniffer
//!     .resolve(&FormatHints::new().with_file_extension("epub"))
//!     .unwrap();
//!
//! assert!(format.conforms_to(Specification::Epub));
//! assert_eq!(format.media_type(), media_types::EPUB);
//! ```
//!
//! # Example - Resolving a file
//!
//! ```no_run
//! use longan::{DefaultFormatSniffer, FormatHints, ZipContainer};
//!
//! # #[tokio::main]
//! # async fn main() -> longan::Result<()> {
//! let sniffer = DefaultFormatSniffer::new();
//! let hints = FormatHints::from_path("book.epub");
//!
//! let container = ZipContainer::open("book.epub").await?;
//! if let Some(format) = sniffer.resolve_container(&hints, &container).await? {
//!     println!("{} ({})", format.media_type(), format.file_extension());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Resolving in-memory content
//!
//! ```rust
//! use longan::{Blob, DefaultFormatSniffer, FormatHints, Specification};
//!
//! # #[tokio::main]
//! # async fn main() -> longan::Result<()> {
//! let license = r#"{"id": "1", "issued": "2024-01-01", "provider": "p", "encryption": {}}"#;
//! let blob = Blob::from_bytes("license", license);
//!
//! let format = DefaultFormatSniffer::new()
//!     .resolve_blob(&FormatHints::new(), &blob)
//!     .await?
//!     .unwrap();
//! assert!(format.conforms_to(Specification::LcpLicense));
//! assert_eq!(format.file_extension(), "lcpl");
//! # Ok(())
//! # }
//! ```

/// Error types, media types and text decoding shared by every module
pub mod common;

/// The resolved format value and the hints it is resolved from
pub mod format;

/// Sniffing options
pub mod config;

/// Memoizing content accessor
///
/// A [`Blob`] reads byte ranges from a [`blob::ByteSource`] and caches its
/// decoded text, XML and JSON views.
pub mod blob;

/// Archive-like assets: ZIP files, exploded directories and in-memory packages
pub mod container;

/// Readium Web Publication Manifest subset used by the detectors
pub mod manifest;

/// `META-INF/encryption.xml` of EPUB-family packages
pub mod encryption;

/// Format detectors and resolvers
pub mod sniffer;

// Re-export commonly used types for convenience
pub use blob::Blob;
pub use common::{Error, ErrorContext, MediaType, Result};
pub use config::SniffOptions;
pub use container::{Container, DirectoryContainer, MemoryContainer};
pub use format::{Format, FormatHints, Specification, media_types};
pub use sniffer::{CompositeFormatSniffer, DefaultFormatSniffer, FormatSniffer, Resolution};

#[cfg(feature = "zip")]
pub use container::ZipContainer;
