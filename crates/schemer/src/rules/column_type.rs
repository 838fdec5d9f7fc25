//! Inferring concrete types for string columns.

use std::collections::BTreeMap;

use crate::analysis::{Analysis, ColumnTypeAnalysis};
use crate::config::InferenceConfig;
use crate::data::{ColumnType, Database};

use super::typing::infer_column_type;

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    let mut types: BTreeMap<String, BTreeMap<String, ColumnType>> = BTreeMap::new();
    for (table_name, table) in database.tables() {
        for (column_name, column) in table.columns() {
            if let Some(source) = column.as_str() {
                types
                    .entry(table_name.to_string())
                    .or_default()
                    .insert(
                        column_name.to_string(),
                        infer_column_type(source, config.type_threshold),
                    );
            }
        }
    }
    (!types.is_empty()).then(|| Analysis::ColumnType(ColumnTypeAnalysis { types }))
}
