//! Analyses: serializable, replayable records of concrete inference
//! decisions.
//!
//! Each analysis bundles the decisions one rule made and knows how to
//! apply them to a database. Applying is strict: a missing table or
//! column is fatal, and a malformed analysis is never partially applied.
//! A saved analysis record replayed against a freshly ingested database
//! reproduces the original run without re-executing any heuristic.

pub mod column_name;
pub mod column_type;
pub mod multi_value;
pub mod record;
pub mod reference;
pub mod similar_tables;
pub mod table_name;
pub mod unique;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::Database;
use crate::error::Result;
use crate::rules::RuleKind;

pub use column_name::ColumnNameAnalysis;
pub use column_type::ColumnTypeAnalysis;
pub use multi_value::{MultiValueReferenceAnalysis, MultiValueTarget};
pub use record::AnalysisRecord;
pub use reference::{ReferenceConstraintAnalysis, ReferenceTarget};
pub use similar_tables::SimilarTablesAnalysis;
pub use table_name::TableNameAnalysis;
pub use unique::UniqueConstraintAnalysis;

/// One inference rule's recorded output.
///
/// The closed set of analysis kinds, tagged for the persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "analysis", rename_all = "kebab-case")]
pub enum Analysis {
    ColumnName(ColumnNameAnalysis),
    SimilarTables(SimilarTablesAnalysis),
    TableName(TableNameAnalysis),
    ColumnType(ColumnTypeAnalysis),
    UniqueConstraint(UniqueConstraintAnalysis),
    ReferenceConstraint(ReferenceConstraintAnalysis),
    MultiValueReference(MultiValueReferenceAnalysis),
}

impl Analysis {
    /// The rule kind that produced (and replays) this analysis.
    pub fn kind(&self) -> RuleKind {
        match self {
            Analysis::ColumnName(_) => RuleKind::ColumnName,
            Analysis::SimilarTables(_) => RuleKind::SimilarTables,
            Analysis::TableName(_) => RuleKind::TableName,
            Analysis::ColumnType(_) => RuleKind::ColumnType,
            Analysis::UniqueConstraint(_) => RuleKind::UniqueConstraint,
            Analysis::ReferenceConstraint(_) => RuleKind::ReferenceConstraint,
            Analysis::MultiValueReference(_) => RuleKind::MultiValueReference,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Apply the recorded decisions to the database.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        match self {
            Analysis::ColumnName(a) => a.transform(database),
            Analysis::SimilarTables(a) => a.transform(database, config),
            Analysis::TableName(a) => a.transform(database),
            Analysis::ColumnType(a) => a.transform(database, config),
            Analysis::UniqueConstraint(a) => a.transform(database, config),
            Analysis::ReferenceConstraint(a) => a.transform(database, config),
            Analysis::MultiValueReference(a) => a.transform(database, config),
        }
    }
}
