//! Validation of the indexed column list.
//!
//! Rules, checked in order (first failure wins):
//! 1. the column list property is present and not blank
//! 2. no entry is empty after trimming
//! 3. no column is listed twice (after lowercasing)
//! 4. every column exists in the table
//! 5. every column is a string column
//! 6. no column is dictionary encoded

use std::collections::HashMap;

use crate::error::DefinitionError;
use crate::schema::{SchemaLookup, TableIdentity};

/// Validate the column list stored under `property_key` and return the
/// normalized column names in declaration order.
pub fn validate_indexed_columns(
    property_key: &str,
    properties: &HashMap<String, String>,
    table: &TableIdentity,
    schema: &dyn SchemaLookup,
) -> Result<Vec<String>, DefinitionError> {
    let raw = match properties.get(property_key) {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err(DefinitionError::MissingProperty(property_key.to_string())),
    };

    let columns: Vec<String> = raw.split(',').map(|c| c.trim().to_lowercase()).collect();

    for (i, column) in columns.iter().enumerate() {
        if column.is_empty() {
            return Err(DefinitionError::IllegalArgument(property_key.to_string()));
        }
        if columns[i + 1..].contains(column) {
            return Err(DefinitionError::DuplicateColumn {
                property: property_key.to_string(),
                column: column.clone(),
            });
        }
    }

    for column in &columns {
        let resolved = schema
            .resolve(table, column)
            .ok_or_else(|| DefinitionError::ColumnNotFound {
                property: property_key.to_string(),
                column: column.clone(),
                table: table.table_name.clone(),
            })?;

        if !resolved.data_type.is_string() {
            return Err(DefinitionError::UnsupportedType {
                property: property_key.to_string(),
                column: column.clone(),
                data_type: resolved.data_type,
            });
        }
        if resolved.is_dictionary_encoded() {
            return Err(DefinitionError::UnsupportedEncoding {
                property: property_key.to_string(),
                column: column.clone(),
            });
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TEXT_COLUMNS;
    use crate::schema::{Column, DataType, Encoding, TableSchema};

    fn table() -> TableIdentity {
        TableIdentity::new("orders", "/warehouse/orders")
    }

    fn schema() -> TableSchema {
        TableSchema::builder("orders")
            .add_string_column("name")
            .add_string_column("comment")
            .add_column(Column::new("amount", DataType::Int))
            .add_column(Column::new("city", DataType::String).with_encoding(Encoding::Dictionary))
            .build()
    }

    fn validate(value: Option<&str>) -> Result<Vec<String>, DefinitionError> {
        let mut properties = HashMap::new();
        if let Some(value) = value {
            properties.insert(TEXT_COLUMNS.to_string(), value.to_string());
        }
        validate_indexed_columns(TEXT_COLUMNS, &properties, &table(), &schema())
    }

    #[test]
    fn test_valid_columns_keep_order() {
        assert_eq!(
            validate(Some(" Comment ,NAME")).unwrap(),
            vec!["comment".to_string(), "name".to_string()]
        );
        assert_eq!(validate(Some("name")).unwrap(), vec!["name".to_string()]);
    }

    #[test]
    fn test_missing_or_blank_property() {
        assert_eq!(
            validate(None),
            Err(DefinitionError::MissingProperty(TEXT_COLUMNS.to_string()))
        );
        assert_eq!(
            validate(Some("   ")),
            Err(DefinitionError::MissingProperty(TEXT_COLUMNS.to_string()))
        );
    }

    #[test]
    fn test_empty_token() {
        for value in ["name,", ",name", "name, ,comment"] {
            assert_eq!(
                validate(Some(value)),
                Err(DefinitionError::IllegalArgument(TEXT_COLUMNS.to_string())),
                "{value}"
            );
        }
    }

    #[test]
    fn test_duplicate_after_normalization() {
        assert_eq!(
            validate(Some(" Comment , comment")),
            Err(DefinitionError::DuplicateColumn {
                property: TEXT_COLUMNS.to_string(),
                column: "comment".to_string(),
            })
        );
    }

    #[test]
    fn test_token_checks_run_per_position() {
        assert_eq!(
            validate(Some("name,name,")),
            Err(DefinitionError::DuplicateColumn {
                property: TEXT_COLUMNS.to_string(),
                column: "name".to_string(),
            })
        );
        assert_eq!(
            validate(Some(",name,name")),
            Err(DefinitionError::IllegalArgument(TEXT_COLUMNS.to_string()))
        );
    }

    #[test]
    fn test_unknown_column() {
        let err = validate(Some("name,missing")).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::ColumnNotFound { ref column, .. } if column == "missing"
        ));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_non_string_column() {
        let err = validate(Some("amount")).unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UnsupportedType {
                property: TEXT_COLUMNS.to_string(),
                column: "amount".to_string(),
                data_type: DataType::Int,
            }
        );
    }

    #[test]
    fn test_dictionary_column() {
        assert_eq!(
            validate(Some("name,city")),
            Err(DefinitionError::UnsupportedEncoding {
                property: TEXT_COLUMNS.to_string(),
                column: "city".to_string(),
            })
        );
    }

    #[test]
    fn test_columns_checked_in_declaration_order() {
        let err = validate(Some("amount,missing")).unwrap_err();
        assert!(matches!(err, DefinitionError::UnsupportedType { .. }));
        let err = validate(Some("missing,amount")).unwrap_err();
        assert!(matches!(err, DefinitionError::ColumnNotFound { .. }));
    }
}
