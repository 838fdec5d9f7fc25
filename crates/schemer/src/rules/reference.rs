//! Discovering foreign keys by value containment against unique columns.

use std::collections::BTreeMap;

use crate::analysis::{Analysis, ReferenceConstraintAnalysis, ReferenceTarget};
use crate::config::InferenceConfig;
use crate::data::{ColumnData, ColumnType, Database};
use crate::validate::ReferenceValidator;

/// The unique columns available as reference targets, sorted by table
/// name so equal match counts resolve deterministically.
pub(crate) fn unique_columns(database: &Database) -> Vec<(String, String, &ColumnData)> {
    let mut uniques: Vec<(String, String, &ColumnData)> = database
        .tables()
        .filter_map(|(table_name, table)| {
            let column_name = table.unique_column_name()?;
            let column = table.column(column_name)?;
            Some((table_name.to_string(), column_name.to_string(), column))
        })
        .collect();
    uniques.sort_by(|a, b| a.0.cmp(&b.0));
    uniques
}

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    let uniques = unique_columns(database);
    let mut references: BTreeMap<String, BTreeMap<String, ReferenceTarget>> = BTreeMap::new();

    for (table_name, table) in database.tables() {
        let own_unique = table.unique_column_name();
        for (column_name, column) in table.columns() {
            if Some(column_name) == own_unique {
                continue;
            }
            let column_type = column.column_type();
            // Long string columns belong to the multi-value rule.
            if matches!(column_type, ColumnType::String { max_length }
                if max_length >= config.multi_value_reference_length)
            {
                continue;
            }
            let size = column.len();
            if size == 0 {
                continue;
            }

            let mut best: Option<(usize, &(String, String, &ColumnData))> = None;
            for candidate in &uniques {
                if candidate.0 == table_name
                    || !candidate.2.column_type().same_kind(&column_type)
                {
                    continue;
                }
                let count = ReferenceValidator::new(column, candidate.2).valid_count();
                if (count as f64) / (size as f64) < config.reference_threshold {
                    continue;
                }
                if best.map(|(c, _)| count > c).unwrap_or(true) {
                    best = Some((count, candidate));
                }
            }
            if let Some((_, (ref_table, ref_column, _))) = best {
                references
                    .entry(table_name.to_string())
                    .or_default()
                    .insert(
                        column_name.to_string(),
                        ReferenceTarget {
                            table: ref_table.clone(),
                            column: ref_column.clone(),
                        },
                    );
            }
        }
    }
    (!references.is_empty())
        .then(|| Analysis::ReferenceConstraint(ReferenceConstraintAnalysis { references }))
}
