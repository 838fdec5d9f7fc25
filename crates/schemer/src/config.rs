//! Inference configuration: thresholds and policy selections.
//!
//! Loaded once from JSON into an immutable value that is passed
//! explicitly through the engine and every rule and policy call.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemerError};
use crate::policy::{RowPolicy, TablePolicy};

/// Configuration for a single inference run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    /// Whether the similar-tables rule runs at all.
    pub merge_similar_tables: bool,
    /// Minimum shared-column fraction for two tables to merge.
    pub table_similarity_threshold: f64,
    /// Policy applied to non-shared columns when merging.
    pub similar_tables_policy: TablePolicy,
    /// Minimum fraction of parseable cells to retype a column.
    pub type_threshold: f64,
    /// Policy applied to rows that fail the chosen type.
    pub type_policy: RowPolicy,
    /// Minimum fraction of single-occurrence values for a key candidate.
    pub unique_threshold: f64,
    /// Policy applied to duplicate rows under a Unique constraint.
    pub unique_policy: RowPolicy,
    /// Minimum fraction of matching rows for a foreign-key candidate.
    pub reference_threshold: f64,
    /// Policy applied to rows with dangling references.
    pub reference_policy: RowPolicy,
    /// Minimum string length for a column to count as multi-valued.
    pub multi_value_reference_length: usize,
    /// Minimum number of split parts for a separator to be accepted.
    pub multi_value_reference_count: usize,
    /// Separators tried, in order, when splitting multi-valued cells.
    pub multi_value_reference_separators: Vec<String>,
    /// Minimum matching fraction for an exploded foreign-key candidate.
    pub multi_value_reference_threshold: f64,
    /// Policy applied to junction rows with dangling references.
    pub multi_value_reference_policy: RowPolicy,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            merge_similar_tables: true,
            table_similarity_threshold: 0.8,
            similar_tables_policy: TablePolicy::Remove,
            type_threshold: 0.9,
            type_policy: RowPolicy::Ignore,
            unique_threshold: 0.9,
            unique_policy: RowPolicy::Ignore,
            reference_threshold: 0.9,
            reference_policy: RowPolicy::Ignore,
            multi_value_reference_length: 100,
            multi_value_reference_count: 2,
            multi_value_reference_separators: vec!["|".to_string()],
            multi_value_reference_threshold: 0.9,
            multi_value_reference_policy: RowPolicy::Ignore,
        }
    }
}

impl InferenceConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SchemerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: InferenceConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| SchemerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Check threshold ranges and per-rule policy registries.
    ///
    /// Each rule kind accepts a closed set of policies: `keep-first`
    /// only makes sense where a single survivor resolves the violation
    /// (uniqueness); the type, reference, and multi-value rules require
    /// `ignore`, and table merging requires `remove`.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("table_similarity_threshold", self.table_similarity_threshold),
            ("type_threshold", self.type_threshold),
            ("unique_threshold", self.unique_threshold),
            ("reference_threshold", self.reference_threshold),
            (
                "multi_value_reference_threshold",
                self.multi_value_reference_threshold,
            ),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(SchemerError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.type_policy != RowPolicy::Ignore {
            return Err(SchemerError::Config(format!(
                "type_policy '{}' is not supported; expected 'ignore'",
                self.type_policy.name()
            )));
        }
        if self.reference_policy != RowPolicy::Ignore {
            return Err(SchemerError::Config(format!(
                "reference_policy '{}' is not supported; expected 'ignore'",
                self.reference_policy.name()
            )));
        }
        if self.multi_value_reference_policy != RowPolicy::Ignore {
            return Err(SchemerError::Config(format!(
                "multi_value_reference_policy '{}' is not supported; expected 'ignore'",
                self.multi_value_reference_policy.name()
            )));
        }

        if self.multi_value_reference_separators.is_empty() {
            return Err(SchemerError::Config(
                "multi_value_reference_separators must not be empty".to_string(),
            ));
        }
        if self
            .multi_value_reference_separators
            .iter()
            .any(|s| s.is_empty())
        {
            return Err(SchemerError::Config(
                "multi_value_reference_separators must not contain an empty separator"
                    .to_string(),
            ));
        }
        if self.multi_value_reference_count == 0 {
            return Err(SchemerError::Config(
                "multi_value_reference_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        InferenceConfig::default().validate().unwrap();
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = InferenceConfig {
            type_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_keep_first_allowed_for_unique_only() {
        let config = InferenceConfig {
            unique_policy: RowPolicy::KeepFirst,
            ..Default::default()
        };
        config.validate().unwrap();

        let config = InferenceConfig {
            type_policy: RowPolicy::KeepFirst,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_name_fails_deserialization() {
        let json = r#"{ "unique_policy": "keep-last" }"#;
        let parsed: std::result::Result<InferenceConfig, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_separator_rejected() {
        let config = InferenceConfig {
            multi_value_reference_separators: vec![String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
