//! Merging structurally duplicate tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::{Database, Table};
use crate::error::{Result, SchemerError};
use crate::validate::SharedColumns;

/// Recorded merge groups: the merged table's name and the tables it
/// absorbs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarTablesAnalysis {
    /// new table name -> source table names
    pub merges: BTreeMap<String, Vec<String>>,
}

impl SimilarTablesAnalysis {
    /// Union the rows of each group's source tables, restricted to their
    /// shared columns, then replace the sources with the merged table.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        if !config.merge_similar_tables {
            return Ok(());
        }
        for (new_name, sources) in &self.merges {
            self.merge_group(database, config, new_name, sources)?;
        }
        Ok(())
    }

    fn merge_group(
        &self,
        database: &mut Database,
        config: &InferenceConfig,
        new_name: &str,
        sources: &[String],
    ) -> Result<()> {
        let missing = |source: &String| SchemerError::MissingTable {
            table: source.clone(),
        };
        let shared = {
            let mut group = Vec::with_capacity(sources.len());
            for source in sources {
                group.push(database.get(source).ok_or_else(|| missing(source))?);
            }
            SharedColumns::new(group)
        };
        for source in sources {
            let table = database.get_mut(source).ok_or_else(|| missing(source))?;
            config.similar_tables_policy.apply(table, &shared);
        }

        let mut merged = Table::new(new_name);
        for source in sources {
            let table = database.get(source).ok_or_else(|| missing(source))?;
            for (column_name, column) in table.columns() {
                if !merged.contains_column(column_name) {
                    merged.add_column(column.empty_like(column_name));
                }
                if let Some(target) = merged.column_mut(column_name) {
                    for (_, value) in column.entries() {
                        target.push_value(value).ok_or_else(|| {
                            SchemerError::ColumnTypeMismatch {
                                table: new_name.to_string(),
                                column: column_name.to_string(),
                            }
                        })?;
                    }
                }
            }
            for path in table.sources().to_vec() {
                merged.add_source(path);
            }
        }

        for source in sources {
            database.remove(source);
        }
        database.insert(merged)
    }
}
