//! Full-text index definitions and lifecycle.
//!
//! # Module Structure
//!
//! - `validator`: checks the column list of an index definition
//! - `registry`: lookup of all indexes registered on a table
//! - `writer`: per-segment writer bindings
//! - `distributable`: shard discovery and distributable work units
//! - `manager`: the lifecycle manager tying the above together
//! - `config`: manager configuration

pub mod config;
pub mod distributable;
pub mod manager;
pub mod registry;
pub mod validator;
pub mod writer;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Definition property listing the columns to index.
pub const TEXT_COLUMNS: &str = "text_columns";

/// Provider name under which text indexes are registered.
pub const TEXT_INDEX_PROVIDER: &str = "text";

/// Predicate kinds an index can accelerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    /// `TEXT_MATCH(column, query)` style full-text predicates.
    TextMatch,
}

/// An index as declared by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Index name; also the directory name under each segment.
    pub index_name: String,
    /// Raw definition properties, e.g. `text_columns = "name, comment"`.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl IndexSchema {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Validated description of a text index.
///
/// Created once when the index is initialized and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub index_name: String,
    /// Normalized column names in declaration order. Never empty.
    pub indexed_columns: Vec<String>,
    pub optimized_operations: Vec<ExpressionKind>,
}

impl IndexMeta {
    pub fn new(index_name: impl Into<String>, indexed_columns: Vec<String>) -> Self {
        Self {
            index_name: index_name.into(),
            indexed_columns,
            optimized_operations: vec![ExpressionKind::TextMatch],
        }
    }

    pub fn supports(&self, kind: ExpressionKind) -> bool {
        self.optimized_operations.contains(&kind)
    }

    /// Indexed column names are already lowercased.
    pub fn is_indexed(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        self.indexed_columns.iter().any(|c| *c == column)
    }
}

/// An index registered on a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRegistration {
    pub index_name: String,
    /// Index implementation, e.g. [`TEXT_INDEX_PROVIDER`].
    pub provider: String,
}

impl IndexRegistration {
    pub fn new(index_name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            provider: provider.into(),
        }
    }

    /// Registration of a full-text index.
    pub fn text(index_name: impl Into<String>) -> Self {
        Self::new(index_name, TEXT_INDEX_PROVIDER)
    }

    pub fn is_text(&self) -> bool {
        self.provider == TEXT_INDEX_PROVIDER
    }
}
