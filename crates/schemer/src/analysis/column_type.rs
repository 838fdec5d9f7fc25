//! Retyping string columns to their inferred types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::{Column, ColumnData, ColumnType, Database};
use crate::error::{Result, SchemerError};
use crate::validate::TypeValidator;

/// Recorded target types, per table and column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTypeAnalysis {
    /// table -> column -> target type
    pub types: BTreeMap<String, BTreeMap<String, ColumnType>>,
}

impl ColumnTypeAnalysis {
    /// Drop rows that fail the target type per the configured policy,
    /// then replace each column with a parsed one of the same name and
    /// position.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        for (table_name, columns) in &self.types {
            let table =
                database
                    .get_mut(table_name)
                    .ok_or_else(|| SchemerError::MissingTable {
                        table: table_name.clone(),
                    })?;
            for (column_name, target) in columns {
                let validator = {
                    let column =
                        table
                            .column(column_name)
                            .ok_or_else(|| SchemerError::MissingColumn {
                                table: table_name.clone(),
                                column: column_name.clone(),
                            })?;
                    let source =
                        column
                            .as_str()
                            .ok_or_else(|| SchemerError::ColumnTypeMismatch {
                                table: table_name.clone(),
                                column: column_name.clone(),
                            })?;
                    TypeValidator::new(source, target.clone())
                };
                config.type_policy.apply(table, &validator);

                let parsed = {
                    let source = table
                        .column(column_name)
                        .and_then(|c| c.as_str())
                        .ok_or_else(|| SchemerError::MissingColumn {
                            table: table_name.clone(),
                            column: column_name.clone(),
                        })?;
                    parse_string_column(source, target, table_name)?
                };
                if let Some(parsed) = parsed {
                    table.replace_column(parsed);
                }
            }
        }
        Ok(())
    }
}

/// Parse a string column into a column of the target type, preserving
/// row ids. Returns `None` for a string target (nothing to convert).
///
/// Callers run the type policy first; a remaining unparsable cell means
/// the model is corrupt and is reported as fatal.
pub(crate) fn parse_string_column(
    source: &Column<String>,
    target: &ColumnType,
    table_name: &str,
) -> Result<Option<ColumnData>> {
    match target {
        ColumnType::String { .. } => Ok(None),
        ColumnType::Integer => {
            let mut parsed = Column::new(source.name());
            for (id, value) in source.iter() {
                let value =
                    value
                        .parse::<i64>()
                        .map_err(|_| SchemerError::ColumnTypeMismatch {
                            table: table_name.to_string(),
                            column: source.name().to_string(),
                        })?;
                parsed.insert(id, value);
            }
            Ok(Some(ColumnData::Int(parsed)))
        }
        ColumnType::Double => {
            let mut parsed = Column::new(source.name());
            for (id, value) in source.iter() {
                let value =
                    value
                        .parse::<f64>()
                        .map_err(|_| SchemerError::ColumnTypeMismatch {
                            table: table_name.to_string(),
                            column: source.name().to_string(),
                        })?;
                parsed.insert(id, value);
            }
            Ok(Some(ColumnData::Real(parsed)))
        }
    }
}
