//! Offline training: curate, normalize, binarize, grid-search, persist.

use std::time::Instant;

use chrono::Utc;
use log::info;

use crate::artifact::{ArtifactMetadata, FeatureModelArtifact};
use crate::config::TasnifConfig;
use crate::dataset::{DatasetCurator, LabeledRecord, load_records};
use crate::error::{Result, TasnifError};
use crate::ml::MLError;
use crate::ml::binarizer::{LabelBinarizer, LabelMatrix};
use crate::ml::model_selection::GridSearch;

/// Trains a [`FeatureModelArtifact`] from a labeled corpus.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TasnifConfig,
}

impl Trainer {
    pub fn new(config: TasnifConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TasnifConfig {
        &self.config
    }

    /// Fit a model on `raw_records` without persisting it.
    pub fn train(&self, raw_records: Vec<LabeledRecord>) -> Result<FeatureModelArtifact> {
        self.config.validate()?;
        let start_time = Instant::now();

        let curator = DatasetCurator::new(self.config.curation.clone());
        let dataset = curator.curate(raw_records);
        if dataset.is_empty() {
            return Err(TasnifError::training(
                "no records with a valid category left after curation",
            ));
        }

        let texts = dataset.normalized_texts();
        let mut binarizer = LabelBinarizer::new();
        let y = binarizer.fit_transform(&dataset.label_sets());
        check_targets(&binarizer, &y)?;

        let search = GridSearch::new(
            self.config.grid.clone(),
            self.config.cv_folds,
            self.config.vectorizer,
        )?;
        let result = search.fit(&texts, &y)?;

        let metadata = ArtifactMetadata {
            trained_at: Utc::now(),
            training_records: dataset.len(),
            best_params: result.best_params,
            cv_micro_f1: result.best_score,
        };
        let artifact = FeatureModelArtifact::new(result.best_pipeline, binarizer, metadata)?;

        info!(
            "Trained on {} records ({} categories, {} features) in {:?}",
            dataset.len(),
            artifact.categories().len(),
            artifact.pipeline().vectorizer().vocabulary_size(),
            start_time.elapsed()
        );
        Ok(artifact)
    }

    /// Fit a model and persist it to the configured artifact path.
    ///
    /// Nothing is written when training fails.
    pub fn train_and_save(&self, raw_records: Vec<LabeledRecord>) -> Result<FeatureModelArtifact> {
        let artifact = self.train(raw_records)?;
        artifact.save(&self.config.artifact_path)?;
        Ok(artifact)
    }

    /// Load the configured dataset, train, and persist.
    pub fn run(&self) -> Result<FeatureModelArtifact> {
        let records = load_records(&self.config.dataset_path)?;
        self.train_and_save(records)
    }
}

/// Every column needs at least one negative record to learn from.
fn check_targets(binarizer: &LabelBinarizer, y: &LabelMatrix) -> Result<()> {
    for (col, class) in binarizer.classes().iter().enumerate() {
        if y.iter().all(|row| row[col]) {
            return Err(MLError::DegenerateTarget {
                category: class.clone(),
            }
            .into());
        }
    }
    Ok(())
}
