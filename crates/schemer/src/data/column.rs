//! Columns: ordered-by-id cell storage and the cell type tags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Type tag for a column.
///
/// `max_length` is only meaningful for strings and tracks the longest
/// live value of the column it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Double,
    String { max_length: usize },
}

impl ColumnType {
    /// Whether two tags name the same cell type, ignoring string lengths.
    pub fn same_kind(&self, other: &ColumnType) -> bool {
        matches!(
            (self, other),
            (ColumnType::Integer, ColumnType::Integer)
                | (ColumnType::Double, ColumnType::Double)
                | (ColumnType::String { .. }, ColumnType::String { .. })
        )
    }

    /// SQL type name, as emitted into DDL.
    pub fn sql_name(&self) -> String {
        match self {
            ColumnType::Integer => "integer".to_string(),
            ColumnType::Double => "double precision".to_string(),
            ColumnType::String { max_length } => format!("character varying({})", max_length),
        }
    }
}

/// An owned cell value.
///
/// Equality and hashing treat reals by bit pattern, so NaN equals itself
/// and the occurrence-count and membership tables the validators build
/// behave deterministically.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Real(f64),
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::Int(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            Value::Real(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Value::Str(v) => {
                2u8.hash(state);
                v.hash(state);
            }
        }
    }
}

/// A single typed column: an ordered mapping from row id to cell value.
///
/// Row ids are handed out by a monotone counter and are never reused
/// after deletion.
#[derive(Debug, Clone)]
pub struct Column<T> {
    name: String,
    data: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Column<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.data.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.data.get(&id)
    }

    /// Insert under a fresh id and return it.
    pub fn push(&mut self, value: T) -> u64 {
        let id = self.next_id;
        self.data.insert(id, value);
        self.next_id += 1;
        id
    }

    /// Insert under an explicit id. Returns false if the id is taken.
    pub fn insert(&mut self, id: u64, value: T) -> bool {
        if self.data.contains_key(&id) {
            return false;
        }
        self.data.insert(id, value);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        true
    }

    /// Replace the value of an existing id. Returns false if absent.
    pub fn set(&mut self, id: u64, value: T) -> bool {
        match self.data.get_mut(&id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Remove an id. The id is not handed out again.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.data.remove(&id)
    }

    /// Row ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.keys().copied()
    }

    /// (id, value) pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.data.iter().map(|(id, v)| (*id, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.values()
    }

    pub fn first_id(&self) -> Option<u64> {
        self.data.keys().next().copied()
    }
}

/// A column of any of the three supported cell types.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Str(Column<String>),
    Int(Column<i64>),
    Real(Column<f64>),
}

impl ColumnData {
    pub fn name(&self) -> &str {
        match self {
            ColumnData::Str(c) => c.name(),
            ColumnData::Int(c) => c.name(),
            ColumnData::Real(c) => c.name(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            ColumnData::Str(c) => c.set_name(name),
            ColumnData::Int(c) => c.set_name(name),
            ColumnData::Real(c) => c.set_name(name),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Str(c) => c.len(),
            ColumnData::Int(c) => c.len(),
            ColumnData::Real(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<u64> {
        match self {
            ColumnData::Str(c) => c.ids().collect(),
            ColumnData::Int(c) => c.ids().collect(),
            ColumnData::Real(c) => c.ids().collect(),
        }
    }

    pub fn value(&self, id: u64) -> Option<Value> {
        match self {
            ColumnData::Str(c) => c.get(id).map(|v| Value::Str(v.clone())),
            ColumnData::Int(c) => c.get(id).map(|v| Value::Int(*v)),
            ColumnData::Real(c) => c.get(id).map(|v| Value::Real(*v)),
        }
    }

    /// (id, value) pairs in ascending id order.
    pub fn entries(&self) -> Vec<(u64, Value)> {
        match self {
            ColumnData::Str(c) => c.iter().map(|(id, v)| (id, Value::Str(v.clone()))).collect(),
            ColumnData::Int(c) => c.iter().map(|(id, v)| (id, Value::Int(*v))).collect(),
            ColumnData::Real(c) => c.iter().map(|(id, v)| (id, Value::Real(*v))).collect(),
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        match self {
            ColumnData::Str(c) => c.remove(id).is_some(),
            ColumnData::Int(c) => c.remove(id).is_some(),
            ColumnData::Real(c) => c.remove(id).is_some(),
        }
    }

    /// The column's type tag. For strings the max length is derived from
    /// the longest live value.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Str(c) => ColumnType::String {
                max_length: c.values().map(|v| v.len()).max().unwrap_or(0),
            },
            ColumnData::Int(_) => ColumnType::Integer,
            ColumnData::Real(_) => ColumnType::Double,
        }
    }

    pub fn as_str(&self) -> Option<&Column<String>> {
        match self {
            ColumnData::Str(c) => Some(c),
            _ => None,
        }
    }

    /// A fresh empty column of the same cell type.
    pub fn empty_like(&self, name: impl Into<String>) -> ColumnData {
        match self {
            ColumnData::Str(_) => ColumnData::Str(Column::new(name)),
            ColumnData::Int(_) => ColumnData::Int(Column::new(name)),
            ColumnData::Real(_) => ColumnData::Real(Column::new(name)),
        }
    }

    /// Push a value, which must match the column's cell type.
    pub fn push_value(&mut self, value: Value) -> Option<u64> {
        match (self, value) {
            (ColumnData::Str(c), Value::Str(v)) => Some(c.push(v)),
            (ColumnData::Int(c), Value::Int(v)) => Some(c.push(v)),
            (ColumnData::Real(c), Value::Real(v)) => Some(c.push(v)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_sequential_ids() {
        let mut col = Column::new("x");
        assert_eq!(col.push("a".to_string()), 0);
        assert_eq!(col.push("b".to_string()), 1);
        assert_eq!(col.push("c".to_string()), 2);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut col = Column::new("x");
        col.push("a".to_string());
        let id = col.push("b".to_string());
        col.push("c".to_string());

        col.remove(id);
        assert_eq!(col.len(), 2);

        // The freed id must not be handed out again.
        let fresh = col.push("d".to_string());
        assert_eq!(fresh, 3);
    }

    #[test]
    fn test_set_updates_existing_rows_only() {
        let mut col = Column::new("x");
        let id = col.push("a".to_string());
        assert!(col.set(id, "b".to_string()));
        assert_eq!(col.get(id), Some(&"b".to_string()));

        assert!(!col.set(99, "c".to_string()));
        assert!(!col.contains(99));
    }

    #[test]
    fn test_insert_with_explicit_id() {
        let mut col = Column::new("x");
        assert!(col.insert(5, 42i64));
        assert!(!col.insert(5, 43));
        assert_eq!(col.get(5), Some(&42));

        // Fresh ids continue past the explicit one.
        assert_eq!(col.push(7), 6);
    }

    #[test]
    fn test_string_max_length_tracks_live_values() {
        let mut col = Column::new("x");
        col.push("ab".to_string());
        let long = col.push("abcdef".to_string());
        let data = ColumnData::Str(col);
        assert_eq!(data.column_type(), ColumnType::String { max_length: 6 });

        let mut data = data;
        data.remove(long);
        assert_eq!(data.column_type(), ColumnType::String { max_length: 2 });
    }

    #[test]
    fn test_value_equality_for_reals() {
        assert_eq!(Value::Real(f64::NAN), Value::Real(f64::NAN));
        assert_ne!(Value::Real(0.0), Value::Real(-0.0));
        assert_ne!(Value::Int(1), Value::Real(1.0));
    }

    #[test]
    fn test_same_kind_ignores_string_length() {
        assert!(ColumnType::String { max_length: 3 }
            .same_kind(&ColumnType::String { max_length: 200 }));
        assert!(!ColumnType::Integer.same_kind(&ColumnType::Double));
    }
}
