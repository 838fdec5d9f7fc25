//! Attaching foreign-key (reference) constraints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::{Constraint, Database};
use crate::error::{Result, SchemerError};
use crate::validate::ReferenceValidator;

/// The key side of a recorded reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTarget {
    pub table: String,
    pub column: String,
}

/// Recorded references: referencing table -> referencing column -> the
/// referenced table and column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConstraintAnalysis {
    pub references: BTreeMap<String, BTreeMap<String, ReferenceTarget>>,
}

impl ReferenceConstraintAnalysis {
    /// Resolve dangling rows per the configured policy, then attach the
    /// Reference constraint.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        for (table_name, columns) in &self.references {
            for (column_name, target) in columns {
                let validator = {
                    let referencing_table =
                        database
                            .get(table_name)
                            .ok_or_else(|| SchemerError::MissingTable {
                                table: table_name.clone(),
                            })?;
                    let referencing = referencing_table.column(column_name).ok_or_else(|| {
                        SchemerError::MissingColumn {
                            table: table_name.clone(),
                            column: column_name.clone(),
                        }
                    })?;
                    let referenced_table =
                        database
                            .get(&target.table)
                            .ok_or_else(|| SchemerError::MissingTable {
                                table: target.table.clone(),
                            })?;
                    let referenced = referenced_table.column(&target.column).ok_or_else(|| {
                        SchemerError::MissingColumn {
                            table: target.table.clone(),
                            column: target.column.clone(),
                        }
                    })?;
                    ReferenceValidator::new(referencing, referenced)
                };
                let table =
                    database
                        .get_mut(table_name)
                        .ok_or_else(|| SchemerError::MissingTable {
                            table: table_name.clone(),
                        })?;
                config.reference_policy.apply(table, &validator);
                table.add_constraint(Constraint::Reference {
                    referencing_column: column_name.clone(),
                    referenced_table: target.table.clone(),
                    referenced_column: target.column.clone(),
                });
            }
        }
        Ok(())
    }
}
