//! Attaching unique (primary-key) constraints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::{Constraint, Database};
use crate::error::{Result, SchemerError};
use crate::validate::UniqueValidator;

/// Recorded unique columns, at most one per table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueConstraintAnalysis {
    /// table -> column
    pub uniques: BTreeMap<String, String>,
}

impl UniqueConstraintAnalysis {
    /// Resolve duplicate rows per the configured policy, then attach the
    /// Unique constraint.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        for (table_name, column_name) in &self.uniques {
            let table =
                database
                    .get_mut(table_name)
                    .ok_or_else(|| SchemerError::MissingTable {
                        table: table_name.clone(),
                    })?;
            let validator = {
                let column =
                    table
                        .column(column_name)
                        .ok_or_else(|| SchemerError::MissingColumn {
                            table: table_name.clone(),
                            column: column_name.clone(),
                        })?;
                UniqueValidator::new(column)
            };
            config.unique_policy.apply(table, &validator);
            table.add_constraint(Constraint::Unique {
                column: column_name.clone(),
            });
        }
        Ok(())
    }
}
