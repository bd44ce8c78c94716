//! Text analysis settings handed to the external index writer.
//!
//! Tokenization itself happens inside the full-text engine. This crate only
//! carries the analyzer choice along with the index definition, so that
//! every writer of an index analyzes text the same way.

use serde::{Deserialize, Serialize};

/// Analyzer used when indexing text columns.
///
/// Only the standard analyzer is available for now; further variants are
/// where per-index analyzer settings will be added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerConfig {
    /// Unicode word segmentation followed by lowercasing.
    #[default]
    Standard,
}

impl AnalyzerConfig {
    /// Name understood by the external full-text engine.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerConfig::Standard => "standard",
        }
    }
}
