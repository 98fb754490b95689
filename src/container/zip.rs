//! ZIP-backed containers.

use std::collections::BTreeSet;
use std::io::{Cursor, Read, Seek};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;
use zip::ZipArchive;

use super::Container;
use crate::blob::source::{ByteSource, clamp_range, slice_bytes};
use crate::blob::Blob;
use crate::common::{Error, ErrorContext, Result};
use crate::config::SniffOptions;
use crate::format::Specification;

type SharedArchive<R> = Arc<Mutex<ZipArchive<R>>>;

/// A ZIP archive opened as a container.
///
/// The central directory is read once; entries are decompressed on demand
/// in blocking tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::{Container, ZipContainer};
///
/// # #[tokio::main]
/// # async fn main() -> longan::Result<()> {
/// let container = ZipContainer::open("book.epub").await?;
/// for entry in container.entries() {
///     println!("{entry}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ZipContainer<R = Cursor<Bytes>> {
    name: String,
    archive: SharedArchive<R>,
    entries: BTreeSet<String>,
    options: SniffOptions,
}

impl<R: Read + Seek + Send + 'static> ZipContainer<R> {
    /// Read the central directory of an archive.
    ///
    /// This performs blocking reads on `reader`.
    pub fn from_reader(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let archive = ZipArchive::new(reader).map_err(|e| Error::from_zip(e, &name))?;
        let entries: BTreeSet<String> = archive
            .file_names()
            .filter(|path| !path.ends_with('/'))
            .map(str::to_string)
            .collect();
        debug!(container = %name, entries = entries.len(), "opened ZIP archive");

        Ok(Self {
            name,
            archive: Arc::new(Mutex::new(archive)),
            entries,
            options: SniffOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SniffOptions) -> Self {
        self.options = options;
        self
    }
}

impl ZipContainer<Cursor<Bytes>> {
    /// Open an archive held in memory.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Result<Self> {
        Self::from_reader(name, Cursor::new(data.into()))
    }
}

impl ZipContainer<std::fs::File> {
    /// Open an archive on the local file system.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&path).with_resource(&name)?;
            Self::from_reader(name, file)
        })
        .await?
    }
}

impl<R: Read + Seek + Send + 'static> Container for ZipContainer<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    fn archive(&self) -> Option<Specification> {
        Some(Specification::Zip)
    }

    fn open(&self, path: &str) -> Option<Blob> {
        if !self.entries.contains(path) {
            return None;
        }
        let source = ZipEntrySource {
            archive: self.archive.clone(),
            path: path.to_string(),
            name: format!("{}/{}", self.name, path),
            data: OnceCell::new(),
        };
        Some(Blob::with_options(source, self.options))
    }
}

/// One entry of a shared archive.
struct ZipEntrySource<R> {
    archive: SharedArchive<R>,
    path: String,
    name: String,
    /// Fully decompressed content, once something needed all of it.
    data: OnceCell<Bytes>,
}

impl<R: Read + Seek + Send + 'static> ZipEntrySource<R> {
    /// Run `f` on the entry reader in a blocking task. `f` also receives
    /// the uncompressed size and the entry name.
    async fn with_entry<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Read, u64, &str) -> Result<T> + Send + 'static,
    {
        let archive = self.archive.clone();
        let path = self.path.clone();
        let name = self.name.clone();
        tokio::task::spawn_blocking(move || {
            let mut archive = archive.lock();
            let mut file = archive
                .by_name(&path)
                .map_err(|e| Error::from_zip(e, &name))?;
            let size = file.size();
            f(&mut file, size, &name)
        })
        .await?
    }

    async fn load(&self) -> Result<&Bytes> {
        self.data
            .get_or_try_init(|| {
                self.with_entry(|file, size, name| {
                    let mut buf = Vec::with_capacity(size as usize);
                    file.read_to_end(&mut buf).with_resource(name)?;
                    Ok(Bytes::from(buf))
                })
            })
            .await
    }
}

#[async_trait]
impl<R: Read + Seek + Send + 'static> ByteSource for ZipEntrySource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn length(&self) -> Result<u64> {
        if let Some(data) = self.data.get() {
            return Ok(data.len() as u64);
        }
        self.with_entry(|_, size, _| Ok(size)).await
    }

    async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes> {
        if let Some(data) = self.data.get() {
            return Ok(slice_bytes(data, range));
        }
        match range {
            None => self.load().await.cloned(),
            // Signature checks only need a prefix, avoid inflating the rest.
            Some(range) => {
                self.with_entry(move |file, size, name| {
                    let clamped = clamp_range(Some(range.clone()), size);
                    let mut buf = Vec::with_capacity(clamped.end as usize);
                    file.take(clamped.end)
                        .read_to_end(&mut buf)
                        .with_range(name, range)?;
                    let start = (clamped.start as usize).min(buf.len());
                    Ok(Bytes::from(buf).slice(start..))
                })
                .await
            },
        }
    }
}
