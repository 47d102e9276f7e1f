//! Startup wiring shared by the CLI and embedding applications.

use std::sync::Arc;

use log::info;

use crate::artifact::FeatureModelArtifact;
use crate::config::TasnifConfig;
use crate::dataset::load_records;
use crate::error::Result;
use crate::evaluation::{EvaluationResponse, Evaluator};
use crate::inference::Classifier;
use crate::training::Trainer;

/// Immutable state built once at startup.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    config: TasnifConfig,
    artifact: Arc<FeatureModelArtifact>,
}

impl ServiceContext {
    /// Load the configured artifact, training and persisting one first when
    /// the file does not exist.
    pub fn bootstrap(config: TasnifConfig) -> Result<Self> {
        config.validate()?;
        let artifact = if config.artifact_path.exists() {
            FeatureModelArtifact::load(&config.artifact_path)?
        } else {
            info!(
                "No model at {}, training from {}",
                config.artifact_path.display(),
                config.dataset_path.display()
            );
            Trainer::new(config.clone()).run()?
        };

        Ok(Self {
            config,
            artifact: Arc::new(artifact),
        })
    }

    pub fn config(&self) -> &TasnifConfig {
        &self.config
    }

    pub fn artifact(&self) -> &Arc<FeatureModelArtifact> {
        &self.artifact
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(Arc::clone(&self.artifact), self.config.policy)
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(Arc::clone(&self.artifact), self.config.curation.clone())
    }

    /// Evaluate the persisted model on the configured dataset.
    pub fn evaluate(&self) -> Result<EvaluationResponse> {
        let records = load_records(&self.config.dataset_path)?;
        let report = self.evaluator().evaluate(records)?;
        Ok(EvaluationResponse::from(&report))
    }
}
