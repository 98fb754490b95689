//! Common types and utilities shared across sniffers and accessors.

// Submodule declarations
pub mod bom;
pub mod error;
pub mod mediatype;

// Re-exports for convenience
pub use error::{Error, ErrorContext, Result};
pub use mediatype::MediaType;
