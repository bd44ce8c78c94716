use serde::{Deserialize, Serialize};

use crate::analysis::AnalyzerConfig;
use crate::index::TEXT_COLUMNS;
use crate::storage::StorageConfig;

/// Configuration for a text index manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextIndexConfig {
    /// Definition property holding the comma separated column list.
    #[serde(default = "default_property_key")]
    pub property_key: String,
    /// Analyzer handed to every writer of the index.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// File system used when none is injected explicitly.
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_property_key() -> String {
    TEXT_COLUMNS.to_string()
}

impl TextIndexConfig {
    pub fn new() -> Self {
        Self {
            property_key: default_property_key(),
            analyzer: AnalyzerConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    pub fn builder() -> TextIndexConfigBuilder {
        TextIndexConfigBuilder::default()
    }
}

impl Default for TextIndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct TextIndexConfigBuilder {
    property_key: Option<String>,
    analyzer: AnalyzerConfig,
    storage: StorageConfig,
}

impl TextIndexConfigBuilder {
    pub fn property_key(mut self, key: impl Into<String>) -> Self {
        self.property_key = Some(key.into());
        self
    }

    pub fn analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    pub fn build(self) -> TextIndexConfig {
        TextIndexConfig {
            property_key: self.property_key.unwrap_or_else(default_property_key),
            analyzer: self.analyzer,
            storage: self.storage,
        }
    }
}
