//! Lookup of the indexes registered on a table.
//!
//! A table may host several text indexes side by side, each in its own
//! directory under every segment. Shard discovery has to look at all of
//! them, so the lifecycle manager is handed an [`IndexRegistry`] instead of
//! reaching for process-wide state.

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::error::{Result, TextMapError};
use crate::index::IndexRegistration;
use crate::schema::TableIdentity;

/// Resolves the index registrations of a table.
pub trait IndexRegistry: Send + Sync + fmt::Debug {
    fn indexes_for(&self, table: &TableIdentity) -> Result<Vec<IndexRegistration>>;
}

/// Registry kept in memory, keyed by table identity.
#[derive(Debug, Default)]
pub struct InMemoryIndexRegistry {
    tables: RwLock<HashMap<TableIdentity, Vec<IndexRegistration>>>,
}

impl InMemoryIndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an index on a table. Index names are unique per table.
    pub fn register(&self, table: &TableIdentity, registration: IndexRegistration) -> Result<()> {
        let mut tables = self.tables.write();
        let indexes = tables.entry(table.clone()).or_default();
        if indexes
            .iter()
            .any(|r| r.index_name == registration.index_name)
        {
            return Err(TextMapError::invalid_argument(format!(
                "index {} already exists on table {}",
                registration.index_name, table.table_name
            )));
        }
        indexes.push(registration);
        Ok(())
    }

    /// Remove an index registration. Returns false if it was not registered.
    pub fn unregister(&self, table: &TableIdentity, index_name: &str) -> bool {
        let mut tables = self.tables.write();
        let Some(indexes) = tables.get_mut(table) else {
            return false;
        };
        let before = indexes.len();
        indexes.retain(|r| r.index_name != index_name);
        let removed = indexes.len() != before;
        if indexes.is_empty() {
            tables.remove(table);
        }
        removed
    }

    pub fn index_count(&self, table: &TableIdentity) -> usize {
        self.tables
            .read()
            .get(table)
            .map_or(0, Vec::len)
    }
}

impl IndexRegistry for InMemoryIndexRegistry {
    fn indexes_for(&self, table: &TableIdentity) -> Result<Vec<IndexRegistration>> {
        Ok(self
            .tables
            .read()
            .get(table)
            .cloned()
            .unwrap_or_default())
    }
}
