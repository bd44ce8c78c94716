//! Table identity and the column catalog used to validate index definitions.
//!
//! The catalog itself belongs to the host; this crate only needs to resolve a
//! column name to its logical type and encodings. [`SchemaLookup`] is that
//! seam, and [`TableSchema`] is a small in-process catalog implementing it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identifies a table and the root directory holding its segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableIdentity {
    /// Table name, as known to the catalog.
    pub table_name: String,
    /// Root path under which segment directories live.
    pub table_path: PathBuf,
}

impl TableIdentity {
    pub fn new(table_name: impl Into<String>, table_path: impl Into<PathBuf>) -> Self {
        Self {
            table_name: table_name.into(),
            table_path: table_path.into(),
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.table_name, self.table_path.display())
    }
}

/// Logical data type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Short,
    Int,
    Long,
    Double,
    Decimal,
    Date,
    Timestamp,
    String,
    Varchar,
    Binary,
    Array,
    Struct,
}

impl DataType {
    /// Whether values of this type are plain strings.
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::String)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "BOOLEAN",
            DataType::Short => "SHORT",
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::String => "STRING",
            DataType::Varchar => "VARCHAR",
            DataType::Binary => "BINARY",
            DataType::Array => "ARRAY",
            DataType::Struct => "STRUCT",
        };
        f.write_str(name)
    }
}

/// Encoding annotations a column may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Values are replaced by surrogate dictionary codes.
    Dictionary,
    /// Values are stored directly.
    DirectDictionary,
    /// Values are part of an inverted (sorted) dimension index.
    Inverted,
    /// Run-length encoded.
    Rle,
}

/// Catalog description of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub encodings: Vec<Encoding>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            encodings: Vec::new(),
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        if !self.encodings.contains(&encoding) {
            self.encodings.push(encoding);
        }
        self
    }

    /// Returns true if the column stores dictionary codes rather than values.
    pub fn is_dictionary_encoded(&self) -> bool {
        self.encodings.contains(&Encoding::Dictionary)
    }
}

/// Resolves a column of a table by name.
pub trait SchemaLookup: Send + Sync + fmt::Debug {
    /// Returns `None` if the table has no column with this name.
    fn resolve(&self, table: &TableIdentity, column_name: &str) -> Option<Column>;
}

/// Column catalog for a single table.
///
/// Column names are matched case-insensitively. The column keeps the name it
/// was declared with, which is what resolution returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "TableSchemaBuilder")]
pub struct TableSchema {
    table_name: String,
    columns: Vec<Column>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl TableSchema {
    pub fn builder(table_name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|&idx| self.columns.get(idx))
    }
}

impl SchemaLookup for TableSchema {
    fn resolve(&self, table: &TableIdentity, column_name: &str) -> Option<Column> {
        if self.table_name.to_lowercase() != table.table_name.to_lowercase() {
            return None;
        }
        self.column(column_name).cloned()
    }
}

#[derive(Debug, Deserialize)]
pub struct TableSchemaBuilder {
    table_name: String,
    columns: Vec<Column>,
}

impl TableSchemaBuilder {
    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn add_string_column(self, name: impl Into<String>) -> Self {
        self.add_column(Column::new(name, DataType::String))
    }

    pub fn build(self) -> TableSchema {
        let mut by_name = HashMap::with_capacity(self.columns.len());
        for (idx, column) in self.columns.iter().enumerate() {
            // First declaration wins if the catalog repeats a name.
            by_name.entry(column.name.to_lowercase()).or_insert(idx);
        }
        TableSchema {
            table_name: self.table_name,
            columns: self.columns,
            by_name,
        }
    }
}

impl From<TableSchemaBuilder> for TableSchema {
    fn from(builder: TableSchemaBuilder) -> Self {
        builder.build()
    }
}
