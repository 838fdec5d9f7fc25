//! Policies: strategies for resolving rows or columns that violate an
//! inferred constraint.
//!
//! The policy families are closed enums matched exhaustively.
//! Configuration selects a policy per rule kind by its serialized name;
//! an unrecognized name fails deserialization.

use serde::{Deserialize, Serialize};

use crate::data::Table;
use crate::validate::{RowValidator, SharedColumns};

/// Row-scoped policy: decides which rows failing a validator survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// Remove every failing row.
    Ignore,
    /// Keep the first failing row (by ascending id), remove the rest.
    /// Used for uniqueness: collapse duplicates to one survivor.
    KeepFirst,
}

impl RowPolicy {
    pub fn name(self) -> &'static str {
        match self {
            RowPolicy::Ignore => "ignore",
            RowPolicy::KeepFirst => "keep-first",
        }
    }

    /// Apply the policy: remove the selected failing rows from every
    /// column of the table, keeping row-id alignment. Returns the
    /// removed ids.
    ///
    /// Failing rows are found by walking the table's first column in
    /// ascending id order; all columns share that id domain.
    pub fn apply(self, table: &mut Table, validator: &dyn RowValidator) -> Vec<u64> {
        let failing: Vec<u64> = match table.first_column() {
            Some(column) => column
                .ids()
                .into_iter()
                .filter(|id| !validator.is_valid(*id))
                .collect(),
            None => Vec::new(),
        };
        let doomed: Vec<u64> = match self {
            RowPolicy::Ignore => failing,
            RowPolicy::KeepFirst => failing.into_iter().skip(1).collect(),
        };
        table.remove_rows(&doomed);
        doomed
    }
}

/// Table-scoped policy: decides which whole columns survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TablePolicy {
    /// Drop every column not in the shared set. Used when merging
    /// similar tables to keep only the columns common to all of them.
    Remove,
}

impl TablePolicy {
    pub fn name(self) -> &'static str {
        match self {
            TablePolicy::Remove => "remove",
        }
    }

    /// Apply the policy and return the names of the removed columns.
    pub fn apply(self, table: &mut Table, shared: &SharedColumns) -> Vec<String> {
        match self {
            TablePolicy::Remove => {
                let doomed: Vec<String> = table
                    .column_names()
                    .filter(|n| !shared.contains(n))
                    .map(String::from)
                    .collect();
                for name in &doomed {
                    table.remove_column(name);
                }
                doomed
            }
        }
    }
}
