use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single field value of a row handed to an index writer.
///
/// Records coming from row-oriented formats carry their own type tags; they
/// are converted into this enum once, and everything downstream matches on
/// it instead of inspecting types at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    /// Nested record with its own named fields.
    Record(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Returns the text value if this is a String variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value widened to i64 for Int and Long variants.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(i64::from(*i)),
            FieldValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Returns the float value if this is a Double variant.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Boolean variant.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested fields if this is a Record variant.
    pub fn as_record(&self) -> Option<&[(String, FieldValue)]> {
        match self {
            FieldValue::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Short name of the variant, used in log and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Int(_) => "int",
            FieldValue::Long(_) => "long",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Record(_) => "record",
        }
    }
}

// --- Conversions ---

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Long(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Double(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// A row of named field values.
///
/// Field names are stored lowercased so they line up with the normalized
/// indexed column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub fields: HashMap<String, FieldValue>,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field to the row.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields
            .insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Get a field value; `name` is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(&name.to_lowercase())
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
