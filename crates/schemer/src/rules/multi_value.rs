//! Discovering many-to-many references packed into long text columns.

use std::collections::BTreeMap;

use crate::analysis::multi_value::split_parts;
use crate::analysis::{Analysis, MultiValueReferenceAnalysis, MultiValueTarget};
use crate::config::InferenceConfig;
use crate::data::{Column, ColumnData, ColumnType, Database};
use crate::validate::MultiValueReferenceValidator;

use super::reference::unique_columns;
use super::typing::infer_column_type;

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    let uniques = unique_columns(database);
    let mut multi_refs: BTreeMap<String, BTreeMap<String, MultiValueTarget>> = BTreeMap::new();

    for (table_name, table) in database.tables() {
        // The junction table repeats this table's key per split piece.
        let Some(own_unique) = table.unique_column_name() else {
            continue;
        };
        for (column_name, column) in table.columns() {
            if column_name == own_unique {
                continue;
            }
            let Some(source) = column.as_str() else {
                continue;
            };
            if !matches!(column.column_type(), ColumnType::String { max_length }
                if max_length >= config.multi_value_reference_length)
            {
                continue;
            }
            let Some(separator) = determine_separator(source, config) else {
                continue;
            };
            let exploded = exploded_column(source, column_name, &separator, config);
            let size = exploded.len();
            if size == 0 {
                continue;
            }

            let exploded_type = exploded.column_type();
            let mut best: Option<(usize, &(String, String, &ColumnData))> = None;
            for candidate in &uniques {
                if candidate.0 == table_name
                    || !candidate.2.column_type().same_kind(&exploded_type)
                {
                    continue;
                }
                let count =
                    MultiValueReferenceValidator::new(&exploded, candidate.2).valid_count();
                if (count as f64) / (size as f64) < config.multi_value_reference_threshold {
                    continue;
                }
                if best.map(|(c, _)| count > c).unwrap_or(true) {
                    best = Some((count, candidate));
                }
            }
            if let Some((_, (ref_table, ref_column, _))) = best {
                multi_refs
                    .entry(table_name.to_string())
                    .or_default()
                    .insert(
                        column_name.to_string(),
                        MultiValueTarget {
                            separator: separator.clone(),
                            referenced_table: ref_table.clone(),
                            referenced_column: ref_column.clone(),
                            junction_table: format!("{}_to_{}", table_name, ref_table),
                            id_column: "id".to_string(),
                            key_column: format!("{}_id", table_name),
                            value_column: format!("{}_id", ref_table),
                        },
                    );
            }
        }
    }
    (!multi_refs.is_empty())
        .then(|| Analysis::MultiValueReference(MultiValueReferenceAnalysis { multi_refs }))
}

/// Pick the separator with the highest yield.
///
/// A separator is rejected outright if any non-empty cell splits into
/// fewer than the configured minimum number of parts; otherwise its
/// yield is the largest split count seen. Ties keep the earliest
/// configured separator.
fn determine_separator(column: &Column<String>, config: &InferenceConfig) -> Option<String> {
    let mut best: Option<(usize, &String)> = None;
    for separator in &config.multi_value_reference_separators {
        let mut max_parts = 0usize;
        let mut rejected = false;
        for cell in column.values() {
            let parts = split_parts(cell, separator).len();
            if !cell.is_empty() && parts < config.multi_value_reference_count {
                rejected = true;
                break;
            }
            max_parts = max_parts.max(parts);
        }
        if rejected || max_parts == 0 {
            continue;
        }
        if best.map(|(y, _)| max_parts > y).unwrap_or(true) {
            best = Some((max_parts, separator));
        }
    }
    best.map(|(_, s)| s.clone())
}

/// All split pieces as one fresh column, typed by the usual inference.
/// Pieces that fail the chosen type are dropped.
fn exploded_column(
    source: &Column<String>,
    name: &str,
    separator: &str,
    config: &InferenceConfig,
) -> ColumnData {
    let mut exploded: Column<String> = Column::new(name);
    for cell in source.values() {
        for piece in split_parts(cell, separator) {
            exploded.push(piece);
        }
    }
    match infer_column_type(&exploded, config.type_threshold) {
        ColumnType::Integer => {
            let mut parsed = Column::new(name);
            for (id, v) in exploded.iter() {
                if let Ok(value) = v.parse::<i64>() {
                    parsed.insert(id, value);
                }
            }
            ColumnData::Int(parsed)
        }
        ColumnType::Double => {
            let mut parsed = Column::new(name);
            for (id, v) in exploded.iter() {
                if let Ok(value) = v.parse::<f64>() {
                    parsed.insert(id, value);
                }
            }
            ColumnData::Real(parsed)
        }
        ColumnType::String { .. } => ColumnData::Str(exploded),
    }
}
