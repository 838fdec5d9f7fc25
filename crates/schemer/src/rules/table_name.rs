//! Deriving display names for tables from their source file names.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::analysis::{Analysis, TableNameAnalysis};
use crate::config::InferenceConfig;
use crate::data::Database;

pub(crate) fn infer(database: &Database, _config: &InferenceConfig) -> Option<Analysis> {
    let mut assigned: HashMap<String, usize> = HashMap::new();
    let mut renames: BTreeMap<String, String> = BTreeMap::new();
    for (table_name, table) in database.tables() {
        let candidate = table
            .sources()
            .iter()
            .map(|p| file_stem(p))
            .reduce(|a, b| longest_common_substring(&a, &b));
        let Some(candidate) = candidate else {
            continue;
        };
        if candidate.is_empty() {
            continue;
        }
        // Tables resolving to the same candidate get numeric suffixes;
        // the first occurrence keeps the bare name.
        let uses = assigned.entry(candidate.clone()).or_insert(0);
        *uses += 1;
        let new_name = if *uses == 1 {
            candidate
        } else {
            format!("{}_{}", candidate, uses)
        };
        if new_name != table_name {
            renames.insert(table_name.to_string(), new_name);
        }
    }
    (!renames.is_empty()).then(|| Analysis::TableName(TableNameAnalysis { renames }))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Longest common substring, biased toward words: a matching run may
/// only start on a letter, and only runs ending on a letter are
/// reported, so names never come from shared punctuation or digits.
fn longest_common_substring(a: &str, b: &str) -> String {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best: String = String::new();
    let mut best_len = 0usize;

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] && (prev[j - 1] != 0 || b[j - 1].is_alphabetic()) {
                curr[j] = prev[j - 1] + 1;
                if curr[j] > best_len && b[j - 1].is_alphabetic() {
                    best_len = curr[j];
                    best = b[j - curr[j]..j].iter().collect();
                }
            } else {
                curr[j] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Table;

    fn sourced_table(name: &str, sources: &[&str]) -> Table {
        let mut t = Table::new(name);
        for s in sources {
            t.add_source(s);
        }
        t
    }

    #[test]
    fn test_lcs_trims_to_last_letter() {
        // The raw common run is "users_202" but only runs ending on a
        // letter are reported.
        assert_eq!(longest_common_substring("users_2023", "users_2024"), "users");
    }

    #[test]
    fn test_lcs_ignores_runs_starting_on_digits() {
        // The shared "2024_" run does not start on a letter.
        assert_eq!(longest_common_substring("2024_logs", "2024_data"), "");
    }

    #[test]
    fn test_lcs_full_word() {
        assert_eq!(longest_common_substring("part", "partition"), "part");
    }

    #[test]
    fn test_infer_names_table_after_sources() {
        let mut db = Database::new("test");
        db.insert(sourced_table(
            "table_1",
            &["data/users_a.csv", "data/users_b.csv"],
        ))
        .unwrap();

        let analysis = infer(&db, &InferenceConfig::default()).expect("analysis expected");
        let Analysis::TableName(analysis) = analysis else {
            panic!("wrong analysis kind");
        };
        assert_eq!(analysis.renames["table_1"], "users");
    }

    #[test]
    fn test_infer_disambiguates_collisions() {
        let mut db = Database::new("test");
        db.insert(sourced_table("table_1", &["a/orders.csv"])).unwrap();
        db.insert(sourced_table("table_2", &["b/orders.csv"])).unwrap();

        let analysis = infer(&db, &InferenceConfig::default()).expect("analysis expected");
        let Analysis::TableName(analysis) = analysis else {
            panic!("wrong analysis kind");
        };
        assert_eq!(analysis.renames["table_1"], "orders");
        assert_eq!(analysis.renames["table_2"], "orders_2");
    }

    #[test]
    fn test_infer_skips_tables_without_sources() {
        let mut db = Database::new("test");
        db.insert(Table::new("table_1")).unwrap();
        assert!(infer(&db, &InferenceConfig::default()).is_none());
    }
}
