//! File system abstraction for index directories.
//!
//! Index shards are plain directories, so the only operations this crate
//! needs are existence checks, listing children and recursive deletion.
//!
//! # Implementations
//!
//! - [`local::LocalFileSystem`]: `std::fs` backed, used in production.
//! - [`memory::MemoryFileSystem`]: in-process tree, used for tests and hosts
//!   that keep indexes off disk.

pub mod local;
pub mod memory;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use self::local::LocalFileSystem;
use self::memory::MemoryFileSystem;

/// A child entry returned by [`IndexFileSystem::list_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl FileEntry {
    /// Last path component.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Predicate accepting directories only.
    pub fn is_directory(entry: &FileEntry) -> bool {
        entry.is_dir
    }
}

/// Minimal file system interface over which index directories are managed.
pub trait IndexFileSystem: Send + Sync + fmt::Debug {
    /// Check whether a file or directory exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// List the immediate children of `path` accepted by `predicate`.
    ///
    /// A missing `path` yields an empty list.
    fn list_entries(
        &self,
        path: &Path,
        predicate: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>>;

    /// Delete `path` and everything below it. Deleting a missing path succeeds.
    fn delete_recursive(&self, path: &Path) -> Result<()>;

    /// List the immediate subdirectories of `path`.
    fn list_directories(&self, path: &Path) -> Result<Vec<FileEntry>> {
        self.list_entries(path, &FileEntry::is_directory)
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Local disk through `std::fs`.
    #[default]
    Local,
    /// In-memory directory tree.
    Memory,
}

/// Creates file system instances from a [`StorageConfig`].
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: StorageConfig) -> Arc<dyn IndexFileSystem> {
        match config {
            StorageConfig::Local => Arc::new(LocalFileSystem::new()),
            StorageConfig::Memory => Arc::new(MemoryFileSystem::new()),
        }
    }
}
