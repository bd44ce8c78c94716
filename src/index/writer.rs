//! Per-segment writer bindings.
//!
//! The full-text engine that actually builds index files is external; it is
//! reached through [`IndexWriterFactory`]. This module binds one opened
//! engine writer to a segment and an output directory, and feeds it only the
//! indexed columns of each row.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analysis::AnalyzerConfig;
use crate::data::{FieldValue, Row};
use crate::error::{Result, TextMapError};
use crate::schema::TableIdentity;
use crate::segment::Segment;

/// Writer handle of the external full-text engine.
pub trait IndexWriter: Send + fmt::Debug {
    /// Add one row worth of `(column, text)` pairs.
    fn add_document(&mut self, fields: &[(&str, &str)]) -> Result<()>;

    /// Make buffered documents durable.
    fn flush(&mut self) -> Result<()>;

    /// Flush and release the writer.
    fn close(&mut self) -> Result<()>;
}

/// Opens writers of the external full-text engine.
pub trait IndexWriterFactory: Send + Sync + fmt::Debug {
    fn open(
        &self,
        output_dir: &Path,
        columns: &[String],
        analyzer: AnalyzerConfig,
    ) -> Result<Box<dyn IndexWriter>>;
}

/// Statistics about one writer binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Rows handed to the engine.
    pub rows_added: u64,
    /// Rows skipped because no indexed column had a value.
    pub rows_skipped: u64,
}

/// A writer bound to one segment and one output directory.
///
/// Each write task gets its own binding; bindings share nothing mutable and
/// are not meant to be shared across threads.
#[derive(Debug)]
pub struct TextIndexWriter {
    table: TableIdentity,
    index_name: String,
    segment: Segment,
    output_dir: PathBuf,
    columns: Arc<[String]>,
    inner: Box<dyn IndexWriter>,
    stats: WriterStats,
    closed: bool,
}

impl TextIndexWriter {
    pub(crate) fn new(
        table: TableIdentity,
        index_name: String,
        segment: Segment,
        output_dir: PathBuf,
        columns: Arc<[String]>,
        inner: Box<dyn IndexWriter>,
    ) -> Self {
        Self {
            table,
            index_name,
            segment,
            output_dir,
            columns,
            inner,
            stats: WriterStats::default(),
            closed: false,
        }
    }

    pub fn table(&self) -> &TableIdentity {
        &self.table
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// Index the text of the indexed columns of `row`.
    ///
    /// Columns missing from the row are skipped. An indexed column holding a
    /// non-string value is rejected, since only string columns pass
    /// validation.
    pub fn add_row(&mut self, row: &Row) -> Result<()> {
        self.check_open()?;

        let mut fields: Vec<(&str, &str)> = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter() {
            let Some(value) = row.get(column) else {
                continue;
            };
            match value {
                FieldValue::String(text) => fields.push((column.as_str(), text.as_str())),
                FieldValue::Boolean(_)
                | FieldValue::Int(_)
                | FieldValue::Long(_)
                | FieldValue::Double(_)
                | FieldValue::Record(_) => {
                    return Err(TextMapError::invalid_argument(format!(
                        "column {column} of index {} expects string values, got {}",
                        self.index_name,
                        value.type_name()
                    )));
                }
            }
        }

        if fields.is_empty() {
            self.stats.rows_skipped += 1;
            return Ok(());
        }

        self.inner.add_document(&fields)?;
        self.stats.rows_added += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.check_open()?;
        self.inner.flush()
    }

    /// Close the underlying engine writer. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        log::debug!(
            "closing text index writer {} for segment {} ({} rows)",
            self.index_name,
            self.segment.id,
            self.stats.rows_added
        );
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(TextMapError::invalid_argument(format!(
                "text index writer for {} is closed",
                self.output_dir.display()
            )));
        }
        Ok(())
    }
}
