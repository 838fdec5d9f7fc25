//! The inference engine: drives the rule pipeline and owns the fired
//! analyses.

use tracing::{debug, info};

use crate::analysis::{Analysis, AnalysisRecord};
use crate::config::InferenceConfig;
use crate::data::Database;
use crate::error::Result;
use crate::rules::RuleKind;

/// Runs the fixed rule pipeline against a database and retains every
/// analysis that fired, for saving or inspection.
///
/// Rules run strictly in order: each one reads the state the previous
/// rule's analysis left behind.
pub struct Engine {
    config: InferenceConfig,
    analyses: Vec<Analysis>,
}

impl Engine {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            config,
            analyses: Vec::new(),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// The analyses fired so far, in pipeline order.
    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    /// Run every inference rule, applying each analysis as soon as it is
    /// derived.
    pub fn analyze(&mut self, database: &mut Database) -> Result<()> {
        for rule in RuleKind::PIPELINE {
            match rule.infer(database, &self.config) {
                Some(analysis) => {
                    info!(rule = rule.name(), "applying analysis");
                    analysis.transform(database, &self.config)?;
                    self.analyses.push(analysis);
                }
                None => {
                    debug!(rule = rule.name(), "nothing to do");
                }
            }
        }
        Ok(())
    }

    /// Replay a saved record, skipping all statistical inference.
    ///
    /// Analyses are applied in pipeline order regardless of their order
    /// in the record.
    pub fn replay(&mut self, record: &AnalysisRecord, database: &mut Database) -> Result<()> {
        record.validate()?;
        for rule in RuleKind::PIPELINE {
            if let Some(analysis) = record.get(rule) {
                info!(rule = rule.name(), "replaying analysis");
                analysis.transform(database, &self.config)?;
                self.analyses.push(analysis.clone());
            }
        }
        Ok(())
    }

    /// The fired analyses as a durable record.
    pub fn record(&self) -> AnalysisRecord {
        AnalysisRecord::new(self.analyses.clone())
    }
}
