//! # textmap
//!
//! Lifecycle management for full-text index shards attached to the segments
//! of a partitioned columnar table.
//!
//! ## Features
//!
//! - Validation of text index definitions against the table schema
//! - Per-segment writer bindings for an external full-text engine
//! - Shard discovery across co-resident indexes, filtered by a coarse pass,
//!   producing distributable probe tasks
//! - Best-effort removal of index data when an index is dropped
//! - Pluggable storage backends (local disk, in-memory)

pub mod analysis;
mod data;
mod error;
pub mod index;
pub mod schema;
pub mod segment;
pub mod storage;

// Re-exports for the public API
pub use analysis::AnalyzerConfig;
pub use data::{FieldValue, Row};
pub use error::{DefinitionError, Result, TextMapError};
pub use index::config::TextIndexConfig;
pub use index::distributable::{DistributableUnit, ShardNameFilter};
pub use index::manager::{DropReport, TextIndexManager, TextIndexManagerBuilder};
pub use index::writer::{IndexWriter, IndexWriterFactory, TextIndexWriter};
pub use index::{ExpressionKind, IndexMeta, IndexRegistration, IndexSchema};
pub use schema::{Column, DataType, Encoding, SchemaLookup, TableIdentity, TableSchema};
pub use segment::{Segment, SegmentId, SegmentStatusProvider};
pub use storage::{IndexFileSystem, StorageConfig, StorageFactory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
