//! Persistence for analysis records - save/load JSON files.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemerError};
use crate::rules::RuleKind;

use super::Analysis;

/// The durable record of one inference run: every analysis that fired,
/// in pipeline order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// When the record was produced.
    pub created_at: DateTime<Utc>,
    pub analyses: Vec<Analysis>,
}

impl AnalysisRecord {
    pub fn new(analyses: Vec<Analysis>) -> Self {
        Self {
            created_at: Utc::now(),
            analyses,
        }
    }

    /// Save the record as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SchemerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load and validate a record from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SchemerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let record: AnalysisRecord = serde_json::from_reader(BufReader::new(file))?;
        record.validate()?;
        Ok(record)
    }

    /// A usable record holds at least one analysis and at most one per
    /// rule kind.
    pub fn validate(&self) -> Result<()> {
        if self.analyses.is_empty() {
            return Err(SchemerError::MalformedRecord(
                "record contains no analyses".to_string(),
            ));
        }
        let mut seen: HashSet<&'static str> = HashSet::new();
        for analysis in &self.analyses {
            if !seen.insert(analysis.name()) {
                return Err(SchemerError::MalformedRecord(format!(
                    "duplicate '{}' analysis",
                    analysis.name()
                )));
            }
        }
        Ok(())
    }

    /// The recorded analysis of a given kind, if present.
    pub fn get(&self, kind: RuleKind) -> Option<&Analysis> {
        self.analyses.iter().find(|a| a.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TableNameAnalysis;

    fn table_name_analysis() -> Analysis {
        Analysis::TableName(TableNameAnalysis {
            renames: [("table_1".to_string(), "users".to_string())].into(),
        })
    }

    #[test]
    fn test_empty_record_is_malformed() {
        let record = AnalysisRecord::new(Vec::new());
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_duplicate_kind_is_malformed() {
        let record = AnalysisRecord::new(vec![table_name_analysis(), table_name_analysis()]);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyses.json");

        let record = AnalysisRecord::new(vec![table_name_analysis()]);
        record.save(&path).unwrap();

        let loaded = AnalysisRecord::load(&path).unwrap();
        assert_eq!(loaded.analyses.len(), 1);
        assert_eq!(loaded.analyses[0].name(), "table-name");
    }
}
