//! Format values and the hints they are first resolved from.
//!
//! A [`Format`] is what resolution produces: the set of [`Specification`]s
//! an asset conforms to plus the canonical media type and file extension of
//! the most specific one. [`FormatHints`] carry the free evidence (file
//! extensions and declared media types) consulted before any byte is read.

// Submodule declarations
pub mod hints;
pub mod media_types;
pub mod specification;
pub mod types;

// Re-exports
pub use hints::FormatHints;
pub use specification::Specification;
pub use types::Format;
