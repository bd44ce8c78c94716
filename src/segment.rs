//! Segments and the on-disk layout of per-segment index data.
//!
//! Layout: `<table_path>/<segment_id>/<index_name>/<shard_name>/...`
//!
//! Segments are written and compacted by the host. This crate only reads
//! their ids, either from a [`Segment`] handed in by the caller or from a
//! [`SegmentStatusProvider`] listing the segments that are currently valid.

use std::fmt;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextMapError};
use crate::schema::TableIdentity;

/// Identifier of a segment within a table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(String);

impl SegmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentId {
    fn from(id: &str) -> Self {
        SegmentId::new(id)
    }
}

impl From<String> for SegmentId {
    fn from(id: String) -> Self {
        SegmentId(id)
    }
}

/// A unit of written table data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
}

impl Segment {
    pub fn new(id: impl Into<SegmentId>) -> Self {
        Self { id: id.into() }
    }

    /// Physical directory of this segment.
    pub fn path(&self, table: &TableIdentity) -> PathBuf {
        segment_path(table, &self.id)
    }
}

/// `<table_path>/<segment_id>`
pub fn segment_path(table: &TableIdentity, segment_id: &SegmentId) -> PathBuf {
    table.table_path.join(segment_id.as_str())
}

/// `<table_path>/<segment_id>/<index_name>`
pub fn index_path(table: &TableIdentity, segment_id: &SegmentId, index_name: &str) -> PathBuf {
    segment_path(table, segment_id).join(index_name)
}

/// Reports which segments of a table are currently valid.
///
/// Segments that were compacted away or marked for deletion are not valid
/// and are never listed.
pub trait SegmentStatusProvider: Send + Sync + fmt::Debug {
    /// Implementations may fail with an I/O error or
    /// [`TextMapError::Interrupted`] when the status lookup blocks.
    fn valid_segments(&self, table: &TableIdentity) -> Result<Vec<SegmentId>>;
}

/// Segment status backed by an in-memory list.
///
/// Useful for embedding hosts that already track segments themselves and
/// for tests.
#[derive(Debug, Default)]
pub struct StaticSegmentStatus {
    table_name: Option<String>,
    valid: RwLock<Vec<SegmentId>>,
}

impl StaticSegmentStatus {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SegmentId>,
    {
        Self {
            table_name: None,
            valid: RwLock::new(segments.into_iter().map(Into::into).collect()),
        }
    }

    /// Restrict the listing to one table; other tables have no valid segments.
    pub fn for_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn add_segment(&self, id: impl Into<SegmentId>) {
        let id = id.into();
        let mut valid = self.valid.write();
        if !valid.contains(&id) {
            valid.push(id);
        }
    }

    /// Mark a segment invalid, e.g. after it was compacted into another one.
    pub fn invalidate(&self, id: &SegmentId) -> bool {
        let mut valid = self.valid.write();
        let before = valid.len();
        valid.retain(|s| s != id);
        valid.len() != before
    }
}

impl SegmentStatusProvider for StaticSegmentStatus {
    fn valid_segments(&self, table: &TableIdentity) -> Result<Vec<SegmentId>> {
        if let Some(name) = &self.table_name
            && name != &table.table_name
        {
            return Err(TextMapError::invalid_argument(format!(
                "no segment status for table {}",
                table.table_name
            )));
        }
        Ok(self.valid.read().clone())
    }
}
