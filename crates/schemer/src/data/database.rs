//! The database: a named, ordered collection of tables.

use indexmap::IndexMap;

use crate::error::{Result, SchemerError};

use super::table::Table;

/// An in-memory relational database under construction.
///
/// Table names are unique; iteration order is insertion order, which
/// keeps every inference pass deterministic.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    tables: IndexMap<String, Table>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.tables.contains_key(table_name)
    }

    pub fn get(&self, table_name: &str) -> Option<&Table> {
        self.tables.get(table_name)
    }

    pub fn get_mut(&mut self, table_name: &str) -> Option<&mut Table> {
        self.tables.get_mut(table_name)
    }

    /// Insert a table under its own name. Fails if the name is taken.
    pub fn insert(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(SchemerError::DuplicateTable {
                table: table.name().to_string(),
            });
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    pub fn remove(&mut self, table_name: &str) -> Option<Table> {
        self.tables.shift_remove(table_name)
    }

    /// Rename a table: remove and reinsert under the new key.
    pub fn rename_table(&mut self, from: &str, to: &str) -> Result<()> {
        if self.tables.contains_key(to) {
            return Err(SchemerError::DuplicateTable {
                table: to.to_string(),
            });
        }
        let mut table = self
            .remove(from)
            .ok_or_else(|| SchemerError::MissingTable {
                table: from.to_string(),
            })?;
        table.set_name(to);
        self.tables.insert(to.to_string(), table);
        Ok(())
    }

    /// Tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|n| n.as_str())
    }
}
