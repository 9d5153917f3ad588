//! Access to the encoded buffer.
//!
//! The viewer only ever needs a contiguous, read-only byte range. On the
//! device that range is memory-mapped external data; on a host it is a file
//! read once into a shared [`Bytes`] handle.

use crate::error::ViewerError;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::info;

/// Provider of the encoded image bytes.
pub trait StorageProvider {
    /// Cheap handle to the whole buffer.
    fn data(&self) -> Bytes;

    /// Buffer length in bytes.
    fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Encoded image loaded from a file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    data: Bytes,
}

impl FileStorage {
    /// Read `path` into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref().to_path_buf();
        let data = Bytes::from(std::fs::read(&path)?);
        info!("Loaded {} bytes from {}", data.len(), path.display());
        Ok(Self { path, data })
    }

    /// Source file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageProvider for FileStorage {
    fn data(&self) -> Bytes {
        self.data.clone()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

/// Encoded image already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Bytes,
}

impl MemoryStorage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

impl StorageProvider for MemoryStorage {
    fn data(&self) -> Bytes {
        self.data.clone()
    }
}
