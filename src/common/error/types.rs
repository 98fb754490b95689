//! Unified error type for format resolution.
//!
//! Only access failures are errors. A blob that does not parse, a missing
//! manifest key or an archive whose entries fall outside a detector's allowed
//! extensions are all reported by the detector as "no match", never here.
use std::ops::Range;
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The resource behind an accessor does not exist.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// The resource exists but cannot be read with the current permissions.
    #[error("Access denied: {resource}")]
    AccessDenied { resource: String },

    /// Underlying I/O fault while reading a resource.
    #[error("IO error while reading {resource}{}: {source}", fmt_range(.range))]
    Io {
        resource: String,
        range: Option<Range<u64>>,
        #[source]
        source: std::io::Error,
    },

    /// The archive backing a container is unreadable.
    #[error("Archive error in {resource}: {message}")]
    Archive { resource: String, message: String },

    /// A blocking read task was cancelled or panicked.
    #[error("Read task failed: {0}")]
    Task(String),

    /// The refinement loop ran longer than the number of known specifications
    /// allows, which means a sniffer produced a non-monotonic result.
    #[error("Format refinement did not reach a fixed point after {passes} passes")]
    RefinementLimit { passes: usize },
}

fn fmt_range(range: &Option<Range<u64>>) -> String {
    match range {
        Some(range) => format!(" [{}..{}]", range.start, range.end),
        None => String::new(),
    }
}

impl Error {
    /// Returns the name of the resource the failure relates to, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Error::NotFound { resource }
            | Error::AccessDenied { resource }
            | Error::Io { resource, .. }
            | Error::Archive { resource, .. } => Some(resource),
            Error::Task(_) | Error::RefinementLimit { .. } => None,
        }
    }
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
