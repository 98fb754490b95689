//! Random-access byte sources behind a [`Blob`](super::Blob).

use std::io::SeekFrom;
use std::ops::Range;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::common::{ErrorContext, Result};

/// Something whose bytes can be read by range.
///
/// Implementations clamp requested ranges to the available content: a range
/// past the end yields fewer bytes, never an error.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Name of the resource, used in error messages and logs.
    fn name(&self) -> &str;

    /// Total length of the content in bytes.
    async fn length(&self) -> Result<u64>;

    /// Read `range`, or the whole content when `range` is `None`.
    async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes>;
}

/// Clamp `range` to `len` bytes, returning the in-bounds part.
pub(crate) fn clamp_range(range: Option<Range<u64>>, len: u64) -> Range<u64> {
    match range {
        Some(range) => {
            let start = range.start.min(len);
            let end = range.end.clamp(start, len);
            start..end
        },
        None => 0..len,
    }
}

/// Slice an in-memory buffer by a clamped range.
pub(crate) fn slice_bytes(data: &Bytes, range: Option<Range<u64>>) -> Bytes {
    let range = clamp_range(range, data.len() as u64);
    data.slice(range.start as usize..range.end as usize)
}

/// Content held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Bytes,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn length(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes> {
        Ok(slice_bytes(&self.data, range))
    }
}

/// A file on the local file system, opened for every read.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn length(&self) -> Result<u64> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .with_resource(&self.name)?;
        Ok(metadata.len())
    }

    async fn read(&self, range: Option<Range<u64>>) -> Result<Bytes> {
        let Some(range) = range else {
            let data = tokio::fs::read(&self.path).await.with_resource(&self.name)?;
            return Ok(Bytes::from(data));
        };

        let mut file = tokio::fs::File::open(&self.path)
            .await
            .with_range(&self.name, range.clone())?;
        let len = file
            .metadata()
            .await
            .with_range(&self.name, range.clone())?
            .len();
        let clamped = clamp_range(Some(range.clone()), len);
        if clamped.is_empty() {
            return Ok(Bytes::new());
        }

        file.seek(SeekFrom::Start(clamped.start))
            .await
            .with_range(&self.name, range.clone())?;
        let mut buf = Vec::with_capacity((clamped.end - clamped.start) as usize);
        file.take(clamped.end - clamped.start)
            .read_to_end(&mut buf)
            .await
            .with_range(&self.name, range)?;
        Ok(Bytes::from(buf))
    }
}
