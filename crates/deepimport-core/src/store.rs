//! File content stores.
//!
//! The converter reads each file once through [`FileStore::get`] and writes the
//! converted content back once through [`FileStore::set`].

use crate::error::{Error, Result};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file's path and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub content: String,
}

impl FileEntry {
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Keyed access to file content.
pub trait FileStore {
    /// Read the entry stored under `path`.
    fn get(&self, path: &str) -> Result<FileEntry>;

    /// Store `entry` under `path`.
    fn set(&mut self, path: &str, entry: FileEntry) -> Result<()>;
}

/// In-memory store, typically filled by an earlier build step.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: HashMap<String, FileEntry>,
}

impl MemoryFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        self.files
            .insert(path.clone(), FileEntry::new(path, content));
    }

    #[must_use]
    pub fn content(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|e| e.content.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryFileStore {
    fn get(&self, path: &str) -> Result<FileEntry> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotTracked {
                path: PathBuf::from(path),
            })
    }

    fn set(&mut self, path: &str, entry: FileEntry) -> Result<()> {
        self.files.insert(path.to_string(), entry);
        Ok(())
    }
}

/// Store backed by the filesystem; keys are file paths.
#[derive(Debug, Clone, Default)]
pub struct DiskFileStore {
    dry_run: bool,
    written: Vec<PathBuf>,
}

impl DiskFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Never touch the disk on `set`.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Files whose content actually changed on disk.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FileStore for DiskFileStore {
    fn get(&self, path: &str) -> Result<FileEntry> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(FileEntry::new(path, content))
    }

    fn set(&mut self, path: &str, entry: FileEntry) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        let target = Path::new(path);
        let changed = deepimport_util::fs::write_if_changed(target, entry.content.as_bytes())
            .map_err(|source| Error::FileWrite {
                path: target.to_path_buf(),
                source,
            })?;
        if changed {
            self.written.push(target.to_path_buf());
        }
        Ok(())
    }
}
