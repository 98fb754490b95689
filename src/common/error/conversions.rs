//! Error conversion implementations.
//!
//! This module maps errors raised by the I/O and archive layers onto the
//! unified [`Error`] type, keeping the resource and byte range that failed.

use std::ops::Range;

use super::types::{Error, Result};

/// Extension trait for attaching the failing resource to an I/O error.
pub trait ErrorContext<T> {
    /// Converts the error, recording which resource was being read.
    fn with_resource(self, resource: &str) -> Result<T>;

    /// Converts the error, recording the resource and the requested range.
    fn with_range(self, resource: &str, range: Range<u64>) -> Result<T>;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_resource(self, resource: &str) -> Result<T> {
        self.map_err(|err| Error::from_io(err, resource, None))
    }

    fn with_range(self, resource: &str, range: Range<u64>) -> Result<T> {
        self.map_err(|err| Error::from_io(err, resource, Some(range)))
    }
}

impl Error {
    /// Classifies an I/O error into the access-failure variants.
    pub fn from_io(err: std::io::Error, resource: &str, range: Option<Range<u64>>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                resource: resource.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Error::AccessDenied {
                resource: resource.to_string(),
            },
            _ => Error::Io {
                resource: resource.to_string(),
                range,
                source: err,
            },
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

#[cfg(feature = "zip")]
impl Error {
    /// Converts a ZIP reader failure, unwrapping the I/O errors it carries.
    pub(crate) fn from_zip(err: zip::result::ZipError, resource: &str) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::from_io(e, resource, None),
            zip::result::ZipError::FileNotFound => Error::NotFound {
                resource: resource.to_string(),
            },
            other => Error::Archive {
                resource: resource.to_string(),
                message: other.to_string(),
            },
        }
    }
}
