//! Header-row detection: derive column names from the first row.
//!
//! Ingested tables carry generated column names and keep their header
//! row as data. A column whose inferred type is numeric but whose first
//! cell is not names itself after that cell; a string column names
//! itself after its first cell unconditionally. Only when every column
//! of a table agrees is the table renamed, so data-only tables are left
//! alone.

use std::collections::{BTreeMap, HashSet};

use crate::analysis::{Analysis, ColumnNameAnalysis};
use crate::config::InferenceConfig;
use crate::data::{Column, ColumnType, Database};

use super::typing::infer_column_type;

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    let mut renames: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (table_name, table) in database.tables() {
        if table.is_empty() {
            continue;
        }
        let mut table_renames: BTreeMap<String, String> = BTreeMap::new();
        let mut headers: HashSet<String> = HashSet::new();
        let mut complete = true;
        for (column_name, column) in table.columns() {
            let candidate = column
                .as_str()
                .and_then(|c| header_candidate(c, config.type_threshold));
            // Two columns sharing a header value cannot both take it.
            match candidate {
                Some(header) if !headers.contains(&header) => {
                    headers.insert(header.clone());
                    table_renames.insert(column_name.to_string(), header);
                }
                _ => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            renames.insert(table_name.to_string(), table_renames);
        }
    }
    (!renames.is_empty()).then(|| Analysis::ColumnName(ColumnNameAnalysis { renames }))
}

/// The first cell, when it reads as a header rather than data.
fn header_candidate(column: &Column<String>, type_threshold: f64) -> Option<String> {
    let first_id = column.first_id()?;
    let first = column.get(first_id)?.clone();
    match infer_column_type(column, type_threshold) {
        ColumnType::Integer => (first.parse::<i64>().is_err()).then_some(first),
        ColumnType::Double => (first.parse::<f64>().is_err()).then_some(first),
        ColumnType::String { .. } => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnData, Table};

    fn string_column(name: &str, values: &[&str]) -> ColumnData {
        let mut col = Column::new(name);
        for v in values {
            col.push(v.to_string());
        }
        ColumnData::Str(col)
    }

    fn config() -> InferenceConfig {
        InferenceConfig::default()
    }

    #[test]
    fn test_detects_header_row() {
        let mut table = Table::new("table_1");
        table.add_column(string_column("column_1", &["id", "1", "2", "3"]));
        table.add_column(string_column("column_2", &["name", "ann", "bob", "cyd"]));
        let mut db = Database::new("test");
        db.insert(table).unwrap();

        let analysis = infer(&db, &config()).expect("analysis expected");
        let Analysis::ColumnName(analysis) = analysis else {
            panic!("wrong analysis kind");
        };
        let renames = &analysis.renames["table_1"];
        assert_eq!(renames["column_1"], "id");
        assert_eq!(renames["column_2"], "name");
    }

    #[test]
    fn test_numeric_first_row_means_no_header() {
        // Every cell of the numeric column parses, so there is no header
        // to find and the table is skipped.
        let mut table = Table::new("table_1");
        table.add_column(string_column("column_1", &["1", "2", "3"]));
        let mut db = Database::new("test");
        db.insert(table).unwrap();

        assert!(infer(&db, &config()).is_none());
    }

    #[test]
    fn test_partial_headers_skip_table() {
        // One column has a header, the other is pure numbers: ambiguous,
        // leave the table untouched.
        let mut table = Table::new("table_1");
        table.add_column(string_column("column_1", &["id", "1", "2"]));
        table.add_column(string_column("column_2", &["7", "8", "9"]));
        let mut db = Database::new("test");
        db.insert(table).unwrap();

        assert!(infer(&db, &config()).is_none());
    }

    #[test]
    fn test_duplicate_headers_skip_table() {
        let mut table = Table::new("table_1");
        table.add_column(string_column("column_1", &["name", "ann"]));
        table.add_column(string_column("column_2", &["name", "bob"]));
        let mut db = Database::new("test");
        db.insert(table).unwrap();

        assert!(infer(&db, &config()).is_none());
    }
}
