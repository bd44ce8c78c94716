//! Lifecycle manager of one text index on one table.
//!
//! The manager is created by [`TextIndexManagerBuilder::initialize`], which
//! validates the index definition against the table schema. After that its
//! state never changes, so a single manager can serve concurrent writers
//! and query planners without locking:
//!
//! - write time: [`TextIndexManager::create_writer`] binds an engine writer
//!   to a segment's output directory, once per write task
//! - query planning: [`TextIndexManager::list_distributables`] turns the
//!   shards surviving a coarse index pass into remote probe tasks
//! - drop: [`TextIndexManager::drop_index_data`] removes the index
//!   directory from every valid segment, best effort
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use textmap::index::IndexSchema;
//! use textmap::index::manager::TextIndexManager;
//! use textmap::index::registry::InMemoryIndexRegistry;
//! use textmap::schema::{TableIdentity, TableSchema};
//! use textmap::segment::StaticSegmentStatus;
//! use textmap::storage::memory::MemoryFileSystem;
//! # use textmap::analysis::AnalyzerConfig;
//! # use textmap::index::writer::{IndexWriter, IndexWriterFactory};
//! # #[derive(Debug)]
//! # struct NoopFactory;
//! # impl IndexWriterFactory for NoopFactory {
//! #     fn open(&self, _: &std::path::Path, _: &[String], _: AnalyzerConfig)
//! #         -> textmap::Result<Box<dyn IndexWriter>> { unimplemented!() }
//! # }
//!
//! let table = TableIdentity::new("orders", "/warehouse/orders");
//! let schema = TableSchema::builder("orders").add_string_column("comment").build();
//!
//! let manager = TextIndexManager::builder()
//!     .file_system(Arc::new(MemoryFileSystem::new()))
//!     .schema(Arc::new(schema))
//!     .segment_status(Arc::new(StaticSegmentStatus::new(["0"])))
//!     .registry(Arc::new(InMemoryIndexRegistry::new()))
//!     .writer_factory(Arc::new(NoopFactory))
//!     .initialize(
//!         table,
//!         &IndexSchema::new("idx1").with_property("text_columns", "comment"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(manager.meta().indexed_columns, vec!["comment".to_string()]);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analysis::AnalyzerConfig;
use crate::error::{Result, TextMapError};
use crate::index::config::TextIndexConfig;
use crate::index::distributable::{
    DistributableUnit, ShardLocator, ShardNameFilter, build_distributables,
};
use crate::index::registry::IndexRegistry;
use crate::index::validator::validate_indexed_columns;
use crate::index::writer::{IndexWriterFactory, TextIndexWriter};
use crate::index::{IndexMeta, IndexSchema};
use crate::schema::{SchemaLookup, TableIdentity};
use crate::segment::{Segment, SegmentId, SegmentStatusProvider, index_path};
use crate::storage::{IndexFileSystem, StorageFactory};

/// Outcome of [`TextIndexManager::drop_index_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropReport {
    /// Segments whose index directory was deleted.
    pub removed: Vec<SegmentId>,
    /// Segments that had no directory for this index.
    pub absent: Vec<SegmentId>,
    /// Segments whose directory could not be checked or deleted.
    pub failed: Vec<SegmentId>,
    /// Set when the valid segments could not be listed at all.
    pub status_error: Option<String>,
}

impl DropReport {
    /// True if nothing went wrong.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.status_error.is_none()
    }
}

/// Builder collecting the collaborators of a [`TextIndexManager`].
#[derive(Debug, Default)]
pub struct TextIndexManagerBuilder {
    config: TextIndexConfig,
    fs: Option<Arc<dyn IndexFileSystem>>,
    schema: Option<Arc<dyn SchemaLookup>>,
    segment_status: Option<Arc<dyn SegmentStatusProvider>>,
    registry: Option<Arc<dyn IndexRegistry>>,
    writer_factory: Option<Arc<dyn IndexWriterFactory>>,
}

impl TextIndexManagerBuilder {
    pub fn config(mut self, config: TextIndexConfig) -> Self {
        self.config = config;
        self
    }

    /// File system holding the segments. Defaults to the one selected by
    /// the configured [`StorageConfig`](crate::storage::StorageConfig).
    pub fn file_system(mut self, fs: Arc<dyn IndexFileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn schema(mut self, schema: Arc<dyn SchemaLookup>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn segment_status(mut self, status: Arc<dyn SegmentStatusProvider>) -> Self {
        self.segment_status = Some(status);
        self
    }

    pub fn registry(mut self, registry: Arc<dyn IndexRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn writer_factory(mut self, factory: Arc<dyn IndexWriterFactory>) -> Self {
        self.writer_factory = Some(factory);
        self
    }

    /// Validate `definition` against the table and create the manager.
    ///
    /// Definition problems are returned as [`TextMapError::Definition`]
    /// carrying the validator's error unchanged.
    pub fn initialize(
        self,
        table: TableIdentity,
        definition: &IndexSchema,
    ) -> Result<TextIndexManager> {
        let schema = required(self.schema, "schema lookup")?;
        let segment_status = required(self.segment_status, "segment status provider")?;
        let registry = required(self.registry, "index registry")?;
        let writer_factory = required(self.writer_factory, "index writer factory")?;
        if definition.index_name.trim().is_empty() {
            return Err(TextMapError::invalid_argument("index name must not be blank"));
        }

        let columns = validate_indexed_columns(
            &self.config.property_key,
            &definition.properties,
            &table,
            schema.as_ref(),
        )?;

        let fs = self
            .fs
            .unwrap_or_else(|| StorageFactory::create(self.config.storage.clone()));

        log::info!(
            "initialized text index {} on table {} with columns {:?}",
            definition.index_name,
            table.table_name,
            columns
        );

        let meta = IndexMeta::new(definition.index_name.clone(), columns);
        let columns: Arc<[String]> = Arc::from(meta.indexed_columns.clone());

        Ok(TextIndexManager {
            table,
            meta,
            columns,
            analyzer: self.config.analyzer,
            config: self.config,
            fs,
            segment_status,
            registry,
            writer_factory,
        })
    }
}

fn required<T: ?Sized>(value: Option<Arc<T>>, what: &str) -> Result<Arc<T>> {
    value.ok_or_else(|| TextMapError::invalid_argument(format!("{what} is required")))
}

/// Manages the data of one text index on one table.
#[derive(Debug)]
pub struct TextIndexManager {
    table: TableIdentity,
    meta: IndexMeta,
    columns: Arc<[String]>,
    analyzer: AnalyzerConfig,
    config: TextIndexConfig,
    fs: Arc<dyn IndexFileSystem>,
    segment_status: Arc<dyn SegmentStatusProvider>,
    registry: Arc<dyn IndexRegistry>,
    writer_factory: Arc<dyn IndexWriterFactory>,
}

impl TextIndexManager {
    pub fn builder() -> TextIndexManagerBuilder {
        TextIndexManagerBuilder::default()
    }

    pub fn table(&self) -> &TableIdentity {
        &self.table
    }

    pub fn index_name(&self) -> &str {
        &self.meta.index_name
    }

    /// Validated index description.
    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn indexed_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn analyzer(&self) -> AnalyzerConfig {
        self.analyzer
    }

    pub fn config(&self) -> &TextIndexConfig {
        &self.config
    }

    /// Directory of this index under `segment`.
    pub fn index_dir(&self, segment: &Segment) -> PathBuf {
        index_path(&self.table, &segment.id, &self.meta.index_name)
    }

    /// Open a writer for one write task of `segment`.
    ///
    /// Failures of the engine are returned unchanged.
    pub fn create_writer(
        &self,
        segment: &Segment,
        output_dir: impl AsRef<Path>,
    ) -> Result<TextIndexWriter> {
        let output_dir = output_dir.as_ref();
        log::info!("text index data write to {}", output_dir.display());

        let inner = self
            .writer_factory
            .open(output_dir, &self.columns, self.analyzer)?;

        Ok(TextIndexWriter::new(
            self.table.clone(),
            self.meta.index_name.clone(),
            segment.clone(),
            output_dir.to_path_buf(),
            Arc::clone(&self.columns),
            inner,
        ))
    }

    /// Remote probe tasks for the shards of `segment` named in `filter`.
    ///
    /// Shards of every text index on the table are considered. The order of
    /// the result is unspecified.
    pub fn list_distributables(
        &self,
        segment: &Segment,
        filter: &ShardNameFilter,
    ) -> Vec<DistributableUnit> {
        if filter.is_empty() {
            return Vec::new();
        }
        let locator = ShardLocator::new(&self.table, self.fs.as_ref(), self.registry.as_ref());
        let shards = locator.locate(&segment.id);
        let units = build_distributables(&self.table, &segment.id, shards, filter);
        log::debug!(
            "segment {} of table {}: {} distributable shards",
            segment.id,
            self.table.table_name,
            units.len()
        );
        units
    }

    /// Delete this index's directory from every valid segment.
    ///
    /// Cleanup is best effort: failures are logged and reported, and never
    /// stop the remaining segments from being cleaned.
    pub fn drop_index_data(&self) -> DropReport {
        let mut report = DropReport::default();

        let segments = match self.segment_status.valid_segments(&self.table) {
            Ok(segments) => segments,
            Err(e) => {
                log::error!(
                    "failed to delete text index {} directory: cannot list valid segments of table {}: {e}",
                    self.meta.index_name,
                    self.table.table_name
                );
                report.status_error = Some(e.to_string());
                return report;
            }
        };

        for segment_id in segments {
            let dir = index_path(&self.table, &segment_id, &self.meta.index_name);
            match self.delete_index_dir(&dir) {
                Ok(true) => report.removed.push(segment_id),
                Ok(false) => report.absent.push(segment_id),
                Err(e) => {
                    log::warn!(
                        "failed to delete text index directory {}: {e}",
                        dir.display()
                    );
                    report.failed.push(segment_id);
                }
            }
        }

        log::info!(
            "dropped text index {} data: {} removed, {} absent, {} failed",
            self.meta.index_name,
            report.removed.len(),
            report.absent.len(),
            report.failed.len()
        );
        report
    }

    fn delete_index_dir(&self, dir: &Path) -> Result<bool> {
        if !self.fs.exists(dir)? {
            return Ok(false);
        }
        self.fs.delete_recursive(dir)?;
        Ok(true)
    }

    /// No-op: this index keeps no per-segment state in memory.
    pub fn clear(&self, _segment: &Segment) {}

    /// No-op: this index keeps no per-segment state in memory.
    pub fn clear_all(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefinitionError;
    use crate::index::IndexRegistration;
    use crate::index::registry::InMemoryIndexRegistry;
    use crate::index::writer::IndexWriter;
    use crate::schema::{Column, DataType, TableSchema};
    use crate::segment::StaticSegmentStatus;
    use crate::storage::StorageConfig;
    use crate::storage::memory::MemoryFileSystem;

    #[derive(Debug)]
    struct NullWriter;

    impl IndexWriter for NullWriter {
        fn add_document(&mut self, _fields: &[(&str, &str)]) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct NullFactory;

    impl IndexWriterFactory for NullFactory {
        fn open(
            &self,
            _output_dir: &Path,
            _columns: &[String],
            _analyzer: AnalyzerConfig,
        ) -> Result<Box<dyn IndexWriter>> {
            Ok(Box::new(NullWriter))
        }
    }

    #[derive(Debug)]
    struct FailingFactory;

    impl IndexWriterFactory for FailingFactory {
        fn open(
            &self,
            output_dir: &Path,
            _columns: &[String],
            _analyzer: AnalyzerConfig,
        ) -> Result<Box<dyn IndexWriter>> {
            Err(TextMapError::storage(format!(
                "cannot open {}",
                output_dir.display()
            )))
        }
    }

    fn table() -> TableIdentity {
        TableIdentity::new("orders", "/warehouse/orders")
    }

    fn builder(fs: Arc<MemoryFileSystem>) -> TextIndexManagerBuilder {
        let schema = TableSchema::builder("orders")
            .add_string_column("comment")
            .add_column(Column::new("amount", DataType::Int))
            .build();
        let registry = InMemoryIndexRegistry::new();
        registry
            .register(&table(), IndexRegistration::text("idx1"))
            .unwrap();
        TextIndexManager::builder()
            .file_system(fs)
            .schema(Arc::new(schema))
            .segment_status(Arc::new(StaticSegmentStatus::new(["0", "1"])))
            .registry(Arc::new(registry))
            .writer_factory(Arc::new(NullFactory))
    }

    fn definition(columns: &str) -> IndexSchema {
        IndexSchema::new("idx1").with_property("text_columns", columns)
    }

    #[test]
    fn test_initialize_sets_meta() {
        let manager = builder(Arc::new(MemoryFileSystem::new()))
            .initialize(table(), &definition("Comment"))
            .unwrap();
        assert_eq!(manager.index_name(), "idx1");
        assert_eq!(manager.indexed_columns(), &["comment".to_string()]);
        assert_eq!(manager.analyzer(), AnalyzerConfig::Standard);
        assert_eq!(
            manager.index_dir(&Segment::new("3")),
            PathBuf::from("/warehouse/orders/3/idx1")
        );
    }

    #[test]
    fn test_initialize_surfaces_definition_error() {
        let err = builder(Arc::new(MemoryFileSystem::new()))
            .initialize(table(), &definition("amount"))
            .unwrap_err();
        assert!(matches!(
            err.as_definition(),
            Some(DefinitionError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_initialize_requires_collaborators() {
        let err = TextIndexManager::builder()
            .initialize(table(), &definition("comment"))
            .unwrap_err();
        assert!(matches!(err, TextMapError::InvalidArgument(_)));

        let err = builder(Arc::new(MemoryFileSystem::new()))
            .initialize(table(), &IndexSchema::new(" ").with_property("text_columns", "comment"))
            .unwrap_err();
        assert!(matches!(err, TextMapError::InvalidArgument(_)));
    }

    #[test]
    fn test_default_file_system_from_config() {
        let manager = TextIndexManager::builder()
            .config(TextIndexConfig::builder().storage(StorageConfig::Memory).build())
            .schema(Arc::new(TableSchema::builder("orders").add_string_column("comment").build()))
            .segment_status(Arc::new(StaticSegmentStatus::new(["0"])))
            .registry(Arc::new(InMemoryIndexRegistry::new()))
            .writer_factory(Arc::new(NullFactory))
            .initialize(table(), &definition("comment"))
            .unwrap();
        let report = manager.drop_index_data();
        assert_eq!(report.absent, vec![SegmentId::new("0")]);
    }

    #[test]
    fn test_create_writer_binds_segment() {
        let manager = builder(Arc::new(MemoryFileSystem::new()))
            .initialize(table(), &definition("comment"))
            .unwrap();
        let segment = Segment::new("0");
        let writer = manager
            .create_writer(&segment, "/warehouse/orders/0/idx1/task_1")
            .unwrap();
        assert_eq!(writer.segment(), &segment);
        assert_eq!(writer.index_name(), "idx1");
        assert_eq!(writer.columns(), &["comment".to_string()]);
        assert_eq!(
            writer.output_dir(),
            Path::new("/warehouse/orders/0/idx1/task_1")
        );
    }

    #[test]
    fn test_create_writer_propagates_failure() {
        let manager = builder(Arc::new(MemoryFileSystem::new()))
            .writer_factory(Arc::new(FailingFactory))
            .initialize(table(), &definition("comment"))
            .unwrap();
        let err = manager
            .create_writer(&Segment::new("0"), "/warehouse/orders/0/idx1/task_1")
            .unwrap_err();
        assert!(matches!(err, TextMapError::Storage(_)));
    }

    #[test]
    fn test_list_distributables_respects_filter() {
        let fs = Arc::new(MemoryFileSystem::new());
        for shard in ["s1", "s2", "s3"] {
            fs.create_dir_all(format!("/warehouse/orders/0/idx1/{shard}"))
                .unwrap();
        }
        let manager = builder(fs)
            .initialize(table(), &definition("comment"))
            .unwrap();
        let segment = Segment::new("0");

        let filter: ShardNameFilter = ["s2", "missing"].into_iter().collect();
        let units = manager.list_distributables(&segment, &filter);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].shard_name(), Some("s2"));
        assert_eq!(units[0].segment_path, PathBuf::from("/warehouse/orders/0"));

        assert!(
            manager
                .list_distributables(&segment, &ShardNameFilter::new())
                .is_empty()
        );
    }

    #[test]
    fn test_drop_removes_index_dirs() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.create_dir_all("/warehouse/orders/0/idx1/s1").unwrap();
        fs.create_dir_all("/warehouse/orders/0/data").unwrap();
        let manager = builder(fs.clone())
            .initialize(table(), &definition("comment"))
            .unwrap();

        let report = manager.drop_index_data();
        assert_eq!(report.removed, vec![SegmentId::new("0")]);
        assert_eq!(report.absent, vec![SegmentId::new("1")]);
        assert!(report.is_clean());
        assert!(!fs.exists(Path::new("/warehouse/orders/0/idx1")).unwrap());
        assert!(fs.exists(Path::new("/warehouse/orders/0/data")).unwrap());
    }

    #[test]
    fn test_clear_hooks_are_noops() {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.create_dir_all("/warehouse/orders/0/idx1/s1").unwrap();
        let manager = builder(fs.clone())
            .initialize(table(), &definition("comment"))
            .unwrap();
        manager.clear(&Segment::new("0"));
        manager.clear_all();
        assert!(fs.exists(Path::new("/warehouse/orders/0/idx1/s1")).unwrap());
    }
}
