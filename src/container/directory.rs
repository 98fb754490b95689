//! Exploded packages on the local file system.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Container;
use crate::blob::{Blob, FileSource};
use crate::common::{ErrorContext, Result};
use crate::config::SniffOptions;

/// A directory tree treated as a container.
///
/// The tree is listed once when the container is opened; entries are read
/// from disk on demand.
#[derive(Debug, Clone)]
pub struct DirectoryContainer {
    root: PathBuf,
    name: String,
    entries: BTreeSet<String>,
    options: SniffOptions,
}

impl DirectoryContainer {
    /// List the files below `root`.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let name = root.display().to_string();
        let walk_root = root.clone();
        let walk_name = name.clone();
        let entries =
            tokio::task::spawn_blocking(move || list_files(&walk_root, &walk_name)).await??;
        debug!(container = %name, entries = entries.len(), "listed directory");

        Ok(Self {
            root,
            name,
            entries,
            options: SniffOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SniffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn list_files(root: &Path, name: &str) -> Result<BTreeSet<String>> {
    let mut entries = BTreeSet::new();
    let mut pending = vec![(root.to_path_buf(), String::new())];

    while let Some((dir, prefix)) = pending.pop() {
        for entry in std::fs::read_dir(&dir).with_resource(name)? {
            let entry = entry.with_resource(name)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let relative = format!("{}{}", prefix, file_name);
            let file_type = entry.file_type().with_resource(name)?;
            if file_type.is_dir() {
                pending.push((entry.path(), format!("{}/", relative)));
            } else {
                entries.insert(relative);
            }
        }
    }

    Ok(entries)
}

impl Container for DirectoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    fn open(&self, path: &str) -> Option<Blob> {
        if !self.entries.contains(path) {
            return None;
        }
        let file = path
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment));
        Some(Blob::with_options(FileSource::new(file), self.options))
    }
}
