//! Per-row validators backing constraints and type checks.
//!
//! Each validator snapshots the data it needs at construction, so a
//! policy can mutate the table afterwards without the validator holding
//! a live borrow.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::data::{Column, ColumnData, ColumnType, Table, Value};

/// A predicate over a single row id, constructed against a fixed context.
pub trait RowValidator {
    fn is_valid(&self, id: u64) -> bool;
}

/// Valid iff the row's cell parses as the target type.
///
/// String targets accept everything; integer and double targets require
/// the cell to parse as `i64` / `f64` respectively.
pub struct TypeValidator {
    cells: BTreeMap<u64, String>,
    target: ColumnType,
}

impl TypeValidator {
    pub fn new(column: &Column<String>, target: ColumnType) -> Self {
        Self {
            cells: column.iter().map(|(id, v)| (id, v.clone())).collect(),
            target,
        }
    }
}

impl RowValidator for TypeValidator {
    fn is_valid(&self, id: u64) -> bool {
        let Some(cell) = self.cells.get(&id) else {
            return false;
        };
        match self.target {
            ColumnType::String { .. } => true,
            ColumnType::Integer => cell.parse::<i64>().is_ok(),
            ColumnType::Double => cell.parse::<f64>().is_ok(),
        }
    }
}

/// Valid iff the row's value occurs exactly once in the column.
///
/// Precomputes a value-to-occurrence-count table; every copy of a
/// duplicated value is invalid, including the first.
pub struct UniqueValidator {
    cells: BTreeMap<u64, Value>,
    counts: HashMap<Value, usize>,
}

impl UniqueValidator {
    pub fn new(column: &ColumnData) -> Self {
        let cells: BTreeMap<u64, Value> = column.entries().into_iter().collect();
        let mut counts: HashMap<Value, usize> = HashMap::new();
        for value in cells.values() {
            *counts.entry(value.clone()).or_insert(0) += 1;
        }
        Self { cells, counts }
    }

    /// Number of rows the validator accepts.
    pub fn valid_count(&self) -> usize {
        self.cells
            .keys()
            .filter(|id| self.is_valid(**id))
            .count()
    }
}

impl RowValidator for UniqueValidator {
    fn is_valid(&self, id: u64) -> bool {
        self.cells
            .get(&id)
            .map(|v| self.counts.get(v) == Some(&1))
            .unwrap_or(false)
    }
}

/// Valid iff the referencing row's value is present in the referenced
/// column's value set.
pub struct ReferenceValidator {
    cells: BTreeMap<u64, Value>,
    referenced: HashSet<Value>,
}

impl ReferenceValidator {
    pub fn new(referencing: &ColumnData, referenced: &ColumnData) -> Self {
        Self {
            cells: referencing.entries().into_iter().collect(),
            referenced: referenced.entries().into_iter().map(|(_, v)| v).collect(),
        }
    }

    /// Number of referencing rows whose value is a member.
    pub fn valid_count(&self) -> usize {
        self.cells
            .keys()
            .filter(|id| self.is_valid(**id))
            .count()
    }
}

impl RowValidator for ReferenceValidator {
    fn is_valid(&self, id: u64) -> bool {
        self.cells
            .get(&id)
            .map(|v| self.referenced.contains(v))
            .unwrap_or(false)
    }
}

/// Same semantics as [`ReferenceValidator`], constructed against the
/// exploded single-valued column built from a multi-valued source.
pub struct MultiValueReferenceValidator(ReferenceValidator);

impl MultiValueReferenceValidator {
    pub fn new(referencing: &ColumnData, referenced: &ColumnData) -> Self {
        Self(ReferenceValidator::new(referencing, referenced))
    }

    pub fn valid_count(&self) -> usize {
        self.0.valid_count()
    }
}

impl RowValidator for MultiValueReferenceValidator {
    fn is_valid(&self, id: u64) -> bool {
        self.0.is_valid(id)
    }
}

/// The set of column names common to every table of a candidate group.
///
/// Backs the table-scoped Remove policy used when merging similar
/// tables.
pub struct SharedColumns {
    names: HashSet<String>,
}

impl SharedColumns {
    pub fn new<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Self {
        let mut iter = tables.into_iter();
        let mut names: HashSet<String> = match iter.next() {
            Some(first) => first.column_names().map(String::from).collect(),
            None => HashSet::new(),
        };
        for table in iter {
            let other: HashSet<&str> = table.column_names().collect();
            names.retain(|n| other.contains(n.as_str()));
        }
        Self { names }
    }

    pub fn contains(&self, column_name: &str) -> bool {
        self.names.contains(column_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_column(name: &str, values: &[&str]) -> ColumnData {
        let mut col = Column::new(name);
        for v in values {
            col.push(v.to_string());
        }
        ColumnData::Str(col)
    }

    #[test]
    fn test_type_validator_integer() {
        let mut col = Column::<String>::new("x");
        col.push("1".to_string());
        col.push("notanumber".to_string());
        col.push("-7".to_string());

        let v = TypeValidator::new(&col, ColumnType::Integer);
        assert!(v.is_valid(0));
        assert!(!v.is_valid(1));
        assert!(v.is_valid(2));
    }

    #[test]
    fn test_type_validator_string_accepts_everything() {
        let mut col = Column::<String>::new("x");
        col.push("anything".to_string());

        let v = TypeValidator::new(&col, ColumnType::String { max_length: 8 });
        assert!(v.is_valid(0));
    }

    #[test]
    fn test_unique_validator_rejects_every_copy() {
        let col = string_column("x", &["a", "a", "b"]);
        let v = UniqueValidator::new(&col);

        assert!(!v.is_valid(0));
        assert!(!v.is_valid(1));
        assert!(v.is_valid(2));
        assert_eq!(v.valid_count(), 1);
    }

    #[test]
    fn test_reference_validator_membership() {
        let referencing = string_column("fk", &["a", "b", "z"]);
        let referenced = string_column("pk", &["a", "b", "c"]);
        let v = ReferenceValidator::new(&referencing, &referenced);

        assert!(v.is_valid(0));
        assert!(v.is_valid(1));
        assert!(!v.is_valid(2));
        assert_eq!(v.valid_count(), 2);
    }

    #[test]
    fn test_shared_columns_intersection() {
        let mut t1 = Table::new("a");
        t1.add_column(string_column("x", &[]));
        t1.add_column(string_column("y", &[]));
        let mut t2 = Table::new("b");
        t2.add_column(string_column("y", &[]));
        t2.add_column(string_column("z", &[]));

        let shared = SharedColumns::new([&t1, &t2]);
        assert!(shared.contains("y"));
        assert!(!shared.contains("x"));
        assert!(!shared.contains("z"));
        assert_eq!(shared.len(), 1);
    }
}
