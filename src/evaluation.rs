//! Re-scores the curated corpus through a persisted model.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::artifact::FeatureModelArtifact;
use crate::config::CurationConfig;
use crate::dataset::{DatasetCurator, LabeledRecord};
use crate::error::Result;
use crate::ml::metrics::ClassificationReport;

/// Evaluation output in its transport shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Fixed-width per-category table.
    pub report: String,
}

impl From<&ClassificationReport> for EvaluationResponse {
    fn from(report: &ClassificationReport) -> Self {
        Self {
            report: report.to_string(),
        }
    }
}

/// Scores hard-label predictions (probability at least 0.5) against the
/// curated labels. The artifact is only read.
#[derive(Debug, Clone)]
pub struct Evaluator {
    artifact: Arc<FeatureModelArtifact>,
    curation: CurationConfig,
}

impl Evaluator {
    pub fn new(artifact: Arc<FeatureModelArtifact>, curation: CurationConfig) -> Self {
        Self { artifact, curation }
    }

    pub fn evaluate(&self, raw_records: Vec<LabeledRecord>) -> Result<ClassificationReport> {
        let dataset = DatasetCurator::new(self.curation.clone()).curate(raw_records);
        let binarizer = self.artifact.binarizer();
        let y_true = binarizer.transform(&dataset.label_sets());
        let y_pred = self.artifact.pipeline().predict(&dataset.normalized_texts())?;

        let report = ClassificationReport::new(&y_true, &y_pred, binarizer.classes());
        info!(
            "Evaluated {} records: micro-F1 {:.4}, macro-F1 {:.4}",
            dataset.len(),
            report.micro_avg.f1,
            report.macro_avg.f1
        );
        Ok(report)
    }
}
