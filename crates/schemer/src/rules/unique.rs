//! Choosing a unique (primary-key) column per table.

use std::collections::BTreeMap;

use crate::analysis::{Analysis, UniqueConstraintAnalysis};
use crate::config::InferenceConfig;
use crate::data::{ColumnData, ColumnType, Database, Table};
use crate::validate::UniqueValidator;

/// A type group's best key candidate.
struct Candidate {
    column: String,
    valid: usize,
    size: usize,
}

impl Candidate {
    fn invalid(&self) -> usize {
        self.size - self.valid
    }
}

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    let mut uniques: BTreeMap<String, String> = BTreeMap::new();
    for (table_name, table) in database.tables() {
        if let Some(column) = determine_unique(table, config) {
            uniques.insert(table_name.to_string(), column);
        }
    }
    (!uniques.is_empty()).then(|| Analysis::UniqueConstraint(UniqueConstraintAnalysis { uniques }))
}

fn determine_unique(table: &Table, config: &InferenceConfig) -> Option<String> {
    // Long string columns are free-text or multi-valued, not keys.
    let string_candidate = best_candidate(
        table.columns().filter(|(_, c)| {
            matches!(c.column_type(), ColumnType::String { max_length }
                if max_length < config.multi_value_reference_length)
        }),
        config.unique_threshold,
    );
    let integer_candidate = best_candidate(
        table
            .columns()
            .filter(|(_, c)| matches!(c, ColumnData::Int(_))),
        config.unique_threshold,
    );
    let double_candidate = best_candidate(
        table
            .columns()
            .filter(|(_, c)| matches!(c, ColumnData::Real(_))),
        config.unique_threshold,
    );

    let invalid = |c: &Option<Candidate>| c.as_ref().map(Candidate::invalid).unwrap_or(usize::MAX);

    // Cross-group choice by invalid-row count: integers win outright
    // when cleanest, strings beat doubles on a tie or better.
    if let Some(candidate) = &integer_candidate {
        if candidate.invalid() <= invalid(&string_candidate)
            && candidate.invalid() <= invalid(&double_candidate)
        {
            return Some(candidate.column.clone());
        }
    }
    if let Some(candidate) = &string_candidate {
        if candidate.invalid() <= invalid(&double_candidate) {
            return Some(candidate.column.clone());
        }
    }
    double_candidate.map(|c| c.column)
}

/// The qualifying candidate with the most single-occurrence rows; ties
/// go to the lexicographically smallest column name.
fn best_candidate<'a>(
    columns: impl Iterator<Item = (&'a str, &'a ColumnData)>,
    threshold: f64,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (name, column) in columns {
        let size = column.len();
        if size == 0 {
            continue;
        }
        let valid = UniqueValidator::new(column).valid_count();
        if (valid as f64) / (size as f64) < threshold {
            continue;
        }
        let better = match &best {
            None => true,
            Some(b) => valid > b.valid || (valid == b.valid && name < b.column.as_str()),
        };
        if better {
            best = Some(Candidate {
                column: name.to_string(),
                valid,
                size,
            });
        }
    }
    best
}
