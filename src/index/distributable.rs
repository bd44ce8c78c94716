//! Shard discovery and distributable work units.
//!
//! Every parallel write task of a segment produces one shard directory:
//!
//! ```text
//! <table_path>/<segment_id>/<index_name>/<shard_name>/...
//! ```
//!
//! Query planning first runs a coarse index pass that yields the names of
//! shards which may contain matches. [`ShardLocator`] finds the physical
//! shards of a segment across all text indexes of the table, and
//! [`build_distributables`] keeps those named by the coarse pass and turns
//! each into a [`DistributableUnit`] for remote evaluation.

use std::path::{Path, PathBuf};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::registry::IndexRegistry;
use crate::schema::TableIdentity;
use crate::segment::{SegmentId, index_path, segment_path};
use crate::storage::{FileEntry, IndexFileSystem};

/// One remote index-probe task: search a single shard of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributableUnit {
    /// Physical path of the segment.
    pub segment_path: PathBuf,
    /// Absolute path of the shard directory.
    pub shard_path: PathBuf,
}

impl DistributableUnit {
    /// Name of the shard directory.
    pub fn shard_name(&self) -> Option<&str> {
        self.shard_path.file_name().and_then(|n| n.to_str())
    }
}

/// A physical index shard found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexShard {
    pub index_name: String,
    pub shard_name: String,
    pub path: PathBuf,
}

/// Names of the shards that survived the coarse index pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardNameFilter {
    names: AHashSet<String>,
}

impl ShardNameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ShardNameFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Enumerates shard directories of a segment across all text indexes of a
/// table.
#[derive(Debug, Clone, Copy)]
pub struct ShardLocator<'a> {
    table: &'a TableIdentity,
    fs: &'a dyn IndexFileSystem,
    registry: &'a dyn IndexRegistry,
}

impl<'a> ShardLocator<'a> {
    pub fn new(
        table: &'a TableIdentity,
        fs: &'a dyn IndexFileSystem,
        registry: &'a dyn IndexRegistry,
    ) -> Self {
        Self {
            table,
            fs,
            registry,
        }
    }

    /// Find all shards of `segment_id`.
    ///
    /// A registry failure yields no shards. A listing failure for one index
    /// only drops that index's shards; the others are still returned.
    pub fn locate(&self, segment_id: &SegmentId) -> Vec<IndexShard> {
        let registrations = match self.registry.indexes_for(self.table) {
            Ok(registrations) => registrations,
            Err(e) => {
                log::error!(
                    "failed to look up indexes of table {}: {e}",
                    self.table.table_name
                );
                return Vec::new();
            }
        };

        let mut shards = Vec::new();
        for registration in registrations.iter().filter(|r| r.is_text()) {
            let dir = index_path(self.table, segment_id, &registration.index_name);
            match self.list_shard_dirs(&dir) {
                Ok(entries) => shards.extend(entries.into_iter().map(|entry| IndexShard {
                    index_name: registration.index_name.clone(),
                    shard_name: entry.name().to_string(),
                    path: entry.path,
                })),
                Err(e) => {
                    log::warn!(
                        "skipping shards of index {} in segment {segment_id}: failed to list {}: {e}",
                        registration.index_name,
                        dir.display()
                    );
                }
            }
        }
        shards
    }

    fn list_shard_dirs(&self, dir: &Path) -> Result<Vec<FileEntry>> {
        self.fs.list_entries(dir, &FileEntry::is_directory)
    }
}

/// Keep the shards named in `filter` and describe each as a distributable
/// unit of `segment_id`. Output order is unspecified.
pub fn build_distributables(
    table: &TableIdentity,
    segment_id: &SegmentId,
    shards: Vec<IndexShard>,
    filter: &ShardNameFilter,
) -> Vec<DistributableUnit> {
    if filter.is_empty() {
        return Vec::new();
    }
    let segment_path = segment_path(table, segment_id);
    shards
        .into_iter()
        .filter(|shard| filter.contains(&shard.shard_name))
        .map(|shard| DistributableUnit {
            segment_path: segment_path.clone(),
            shard_path: shard.path,
        })
        .collect()
}
