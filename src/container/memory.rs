//! In-memory container.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;

use super::Container;
use crate::blob::{Blob, MemorySource};
use crate::config::SniffOptions;
use crate::format::Specification;

/// A container whose entries are held in memory.
///
/// Useful for tests and for packages already extracted by the caller.
///
/// # Examples
///
/// ```rust
/// use longan::{Container, MemoryContainer, Specification};
///
/// let container = MemoryContainer::new("book")
///     .with_archive(Specification::Zip)
///     .with_entry("mimetype", "application/epub+zip");
///
/// assert!(container.contains("mimetype"));
/// assert_eq!(container.archive(), Some(Specification::Zip));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    name: String,
    archive: Option<Specification>,
    data: BTreeMap<String, Bytes>,
    entries: BTreeSet<String>,
    options: SniffOptions,
}

impl MemoryContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare the archive specification the container reports.
    pub fn with_archive(mut self, archive: Specification) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Add or replace an entry. Directory paths (ending in `/`) are ignored.
    pub fn with_entry(mut self, path: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let path = path.into();
        if !path.ends_with('/') {
            self.entries.insert(path.clone());
            self.data.insert(path, data.into());
        }
        self
    }

    pub fn with_options(mut self, options: SniffOptions) -> Self {
        self.options = options;
        self
    }
}

impl Container for MemoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    fn archive(&self) -> Option<Specification> {
        self.archive
    }

    fn open(&self, path: &str) -> Option<Blob> {
        let data = self.data.get(path)?.clone();
        let source = MemorySource::new(format!("{}/{}", self.name, path), data);
        Some(Blob::with_options(source, self.options))
    }
}
