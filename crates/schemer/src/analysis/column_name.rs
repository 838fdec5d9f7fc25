//! Column renames derived from detected header rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::Database;
use crate::error::{Result, SchemerError};

/// Recorded column renames, per table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnNameAnalysis {
    /// table -> source column name -> new column name
    pub renames: BTreeMap<String, BTreeMap<String, String>>,
}

impl ColumnNameAnalysis {
    pub fn transform(&self, database: &mut Database) -> Result<()> {
        for (table_name, renames) in &self.renames {
            let table =
                database
                    .get_mut(table_name)
                    .ok_or_else(|| SchemerError::MissingTable {
                        table: table_name.clone(),
                    })?;
            table.rename_columns(renames)?;
        }
        Ok(())
    }
}
