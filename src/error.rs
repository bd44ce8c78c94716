//! Error types for textmap.
//!
//! Two layers are distinguished:
//! - [`DefinitionError`] describes why an index definition was rejected.
//!   It is raised while an index is being created and its message is meant
//!   for the user who issued the create statement.
//! - [`TextMapError`] is the crate-wide error returned by every fallible
//!   operation. Definition errors are carried through it unchanged.

use std::io;

use thiserror::Error;

use crate::schema::DataType;

/// Reasons an index definition can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The column list property is absent or blank.
    #[error("text index requires a proper {0} property")]
    MissingProperty(String),

    /// The column list contains an empty entry.
    #[error("{0} contains illegal argument")]
    IllegalArgument(String),

    /// The same column appears more than once.
    #[error("{property} has duplicate columns: {column}")]
    DuplicateColumn { property: String, column: String },

    /// The column does not exist in the table.
    #[error("{property}: {column} does not exist in table {table}")]
    ColumnNotFound {
        property: String,
        column: String,
        table: String,
    },

    /// Only string columns can be text indexed.
    #[error("{property} only supports string columns, unsupported column: {column}, data type: {data_type}")]
    UnsupportedType {
        property: String,
        column: String,
        data_type: DataType,
    },

    /// Dictionary-encoded columns store surrogate codes instead of text.
    #[error("{property} cannot contain dictionary encoded column {column}")]
    UnsupportedEncoding { property: String, column: String },
}

/// The main error type for textmap operations.
#[derive(Debug, Error)]
pub enum TextMapError {
    /// The index definition failed validation.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// I/O errors from the local file system.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-level failures not backed by an `io::Error`.
    #[error("storage error: {0}")]
    Storage(String),

    /// A blocking collaborator call was interrupted.
    #[error("operation interrupted: {0}")]
    Interrupted(String),

    /// An argument passed to an operation is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TextMapError {
    /// Create a new storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        TextMapError::Storage(msg.into())
    }

    /// Create a new interrupted error.
    pub fn interrupted(msg: impl Into<String>) -> Self {
        TextMapError::Interrupted(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        TextMapError::InvalidArgument(msg.into())
    }

    /// Returns the definition error if index creation was rejected.
    pub fn as_definition(&self) -> Option<&DefinitionError> {
        match self {
            TextMapError::Definition(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for textmap operations.
pub type Result<T> = std::result::Result<T, TextMapError>;
