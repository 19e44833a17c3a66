//! Loads the persistence module from disk and writes it back atomically.
//!
//! Writes go through a temp file in the destination directory followed by a
//! rename, so a crash mid-write never leaves a half-patched module behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::buffer::SourceBuffer;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid utf-8", path.display())]
    NotUtf8 { path: PathBuf },
}

/// Handle to the module file at a fixed path.
#[derive(Debug, Clone)]
pub struct ModuleStore {
    path: PathBuf,
}

impl ModuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the module into a buffer, byte for byte.
    pub fn load(&self) -> Result<SourceBuffer, StoreError> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| StoreError::NotUtf8 {
            path: self.path.clone(),
        })?;
        Ok(SourceBuffer::new(text))
    }

    /// Writes the buffer back via temp file and rename.
    pub fn persist(&self, buffer: &SourceBuffer) -> Result<(), StoreError> {
        atomic_write(&self.path, buffer.as_str()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
