//! Unified error types for Longan.
//!
//! Access failures (missing resource, permission denied, I/O faults, broken
//! archives) are the only errors surfaced by resolution.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use conversions::ErrorContext;
pub use types::{Error, Result};
