//! Tables: ordered column collections with constraints and provenance.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemerError};

use super::column::ColumnData;

/// A constraint attached to a table.
///
/// Reference constraints hold table/column names as non-owning
/// back-references; they are resolved against the database on use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum Constraint {
    Unique {
        column: String,
    },
    Reference {
        referencing_column: String,
        referenced_table: String,
        referenced_column: String,
    },
}

/// A table: columns in insertion order (which determines output order),
/// constraints, and source provenance.
///
/// All columns share one row-id domain; rows are only ever removed
/// through [`Table::remove_rows`], which deletes an id from every column
/// in lock-step.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: IndexMap<String, ColumnData>,
    constraints: Vec<Constraint>,
    sources: Vec<PathBuf>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            constraints: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnData> {
        self.columns.get_mut(name)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnData)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|n| n.as_str())
    }

    pub fn first_column(&self) -> Option<&ColumnData> {
        self.columns.values().next()
    }

    /// Add a column. Returns false if the name is already taken.
    pub fn add_column(&mut self, column: ColumnData) -> bool {
        if self.columns.contains_key(column.name()) {
            return false;
        }
        self.columns.insert(column.name().to_string(), column);
        true
    }

    /// Replace an existing column, keeping its position. Returns false if
    /// there is no column under that name.
    pub fn replace_column(&mut self, column: ColumnData) -> bool {
        if !self.columns.contains_key(column.name()) {
            return false;
        }
        self.columns.insert(column.name().to_string(), column);
        true
    }

    pub fn remove_column(&mut self, name: &str) -> Option<ColumnData> {
        self.columns.shift_remove(name)
    }

    /// Rename columns in place, preserving column order.
    ///
    /// Every source name must exist and no new name may collide, or the
    /// table is left untouched and an error is returned.
    pub fn rename_columns(&mut self, renames: &BTreeMap<String, String>) -> Result<()> {
        for source in renames.keys() {
            if !self.columns.contains_key(source) {
                return Err(SchemerError::MissingColumn {
                    table: self.name.clone(),
                    column: source.clone(),
                });
            }
        }
        let mut seen = std::collections::HashSet::with_capacity(self.columns.len());
        for name in self.columns.keys() {
            let new_name = renames.get(name).unwrap_or(name);
            if !seen.insert(new_name.as_str()) {
                return Err(SchemerError::DuplicateColumn {
                    table: self.name.clone(),
                    column: new_name.clone(),
                });
            }
        }
        let mut rebuilt = IndexMap::with_capacity(self.columns.len());
        for (name, mut column) in self.columns.drain(..) {
            let new_name = renames.get(&name).cloned().unwrap_or(name);
            column.set_name(new_name.clone());
            rebuilt.insert(new_name, column);
        }
        self.columns = rebuilt;
        Ok(())
    }

    /// Remove row ids from every column of the table.
    pub fn remove_rows(&mut self, ids: &[u64]) {
        for column in self.columns.values_mut() {
            for id in ids {
                column.remove(*id);
            }
        }
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The column named by the first Unique constraint, if any.
    ///
    /// A table is assumed to carry at most one effective Unique
    /// constraint; the first one found is authoritative.
    pub fn unique_column_name(&self) -> Option<&str> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Unique { column } => Some(column.as_str()),
            Constraint::Reference { .. } => None,
        })
    }

    /// The column named by the first Unique constraint, resolved.
    pub fn unique_column(&self) -> Option<&ColumnData> {
        self.unique_column_name().and_then(|n| self.column(n))
    }

    pub fn add_source(&mut self, source: impl AsRef<Path>) {
        self.sources.push(source.as_ref().to_path_buf());
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::column::Column;

    fn string_column(name: &str, values: &[&str]) -> ColumnData {
        let mut col = Column::new(name);
        for v in values {
            col.push(v.to_string());
        }
        ColumnData::Str(col)
    }

    #[test]
    fn test_column_order_preserved() {
        let mut table = Table::new("t");
        table.add_column(string_column("b", &[]));
        table.add_column(string_column("a", &[]));
        table.add_column(string_column("c", &[]));

        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_add_column_rejects_duplicate_name() {
        let mut table = Table::new("t");
        assert!(table.add_column(string_column("x", &[])));
        assert!(!table.add_column(string_column("x", &[])));
    }

    #[test]
    fn test_rename_columns_keeps_order() {
        let mut table = Table::new("t");
        table.add_column(string_column("column_1", &[]));
        table.add_column(string_column("column_2", &[]));

        let renames: BTreeMap<String, String> = [
            ("column_1".to_string(), "id".to_string()),
            ("column_2".to_string(), "name".to_string()),
        ]
        .into();
        table.rename_columns(&renames).unwrap();

        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(table.column("id").unwrap().name(), "id");
    }

    #[test]
    fn test_rename_columns_missing_source_fails() {
        let mut table = Table::new("t");
        table.add_column(string_column("x", &[]));

        let renames: BTreeMap<String, String> =
            [("missing".to_string(), "y".to_string())].into();
        assert!(table.rename_columns(&renames).is_err());
        assert!(table.contains_column("x"));
    }

    #[test]
    fn test_remove_rows_spans_all_columns() {
        let mut table = Table::new("t");
        table.add_column(string_column("a", &["1", "2", "3"]));
        table.add_column(string_column("b", &["x", "y", "z"]));

        table.remove_rows(&[1]);
        assert_eq!(table.column("a").unwrap().len(), 2);
        assert_eq!(table.column("b").unwrap().len(), 2);
        assert!(table.column("b").unwrap().value(1).is_none());
    }

    #[test]
    fn test_unique_column_first_constraint_wins() {
        let mut table = Table::new("t");
        table.add_column(string_column("a", &[]));
        table.add_column(string_column("b", &[]));
        table.add_constraint(Constraint::Unique {
            column: "a".to_string(),
        });
        table.add_constraint(Constraint::Unique {
            column: "b".to_string(),
        });

        assert_eq!(table.unique_column_name(), Some("a"));
    }
}
