//! Greedy clustering of structurally duplicate tables.

use std::collections::BTreeMap;

use crate::analysis::{Analysis, SimilarTablesAnalysis};
use crate::config::InferenceConfig;
use crate::data::{Database, Table};
use crate::validate::SharedColumns;

pub(crate) fn infer(database: &Database, config: &InferenceConfig) -> Option<Analysis> {
    if !config.merge_similar_tables {
        return None;
    }
    let mut unresolved: Vec<(&str, &Table)> = database.tables().collect();
    let mut merges: BTreeMap<String, Vec<String>> = BTreeMap::new();

    while !unresolved.is_empty() {
        let seed = unresolved.remove(0);
        let mut group: Vec<(&str, &Table)> = vec![seed];
        let mut rest: Vec<(&str, &Table)> = Vec::new();
        for candidate in unresolved.drain(..) {
            group.push(candidate);
            if !passes_similarity(&group, config.table_similarity_threshold) {
                group.pop();
                rest.push(candidate);
            }
        }
        unresolved = rest;

        if group.len() > 1 {
            let mut names: Vec<String> = group.iter().map(|(n, _)| n.to_string()).collect();
            names.sort();
            let new_name = names[0].clone();
            merges.insert(new_name, names);
        }
    }

    (!merges.is_empty()).then(|| Analysis::SimilarTables(SimilarTablesAnalysis { merges }))
}

/// Group-wide similarity test for the most recently added candidate: the
/// fraction of its columns shared by every group member must clear the
/// threshold.
fn passes_similarity(group: &[(&str, &Table)], threshold: f64) -> bool {
    let Some((_, candidate)) = group.last() else {
        return true;
    };
    if candidate.is_empty() {
        return false;
    }
    let shared = SharedColumns::new(group.iter().map(|(_, t)| *t));
    let shared_count = candidate
        .column_names()
        .filter(|n| shared.contains(n))
        .count();
    shared_count as f64 / candidate.len() as f64 >= threshold
}
