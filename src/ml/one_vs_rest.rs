//! One binary booster per label column, trained in parallel.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ml::MLError;
use crate::ml::binarizer::LabelMatrix;
use crate::ml::gbdt::{BinaryClassifier, BoosterParams, GradientBoostedClassifier};
use crate::ml::sparse::SparseMatrix;

/// Probability at or above which a label is predicted.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneVsRestClassifier {
    estimators: Vec<GradientBoostedClassifier>,
}

impl OneVsRestClassifier {
    /// Fit one booster per column of `y`.
    ///
    /// Every booster uses the same parameters, seed included, so results do
    /// not depend on how rayon schedules the columns.
    pub fn fit(x: &SparseMatrix, y: &LabelMatrix, params: BoosterParams) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(MLError::InvalidFeatureVector {
                message: format!("{} feature rows but {} label rows", x.n_rows(), y.len()),
            }
            .into());
        }
        let n_outputs = y.first().map_or(0, Vec::len);
        if n_outputs == 0 {
            return Err(MLError::InsufficientTrainingData {
                min_samples: 1,
                actual: 0,
            }
            .into());
        }

        let targets: Vec<Vec<bool>> = (0..n_outputs)
            .map(|col| y.iter().map(|row| row[col]).collect())
            .collect();
        for (col, target) in targets.iter().enumerate() {
            if target.iter().all(|&t| t) || !target.iter().any(|&t| t) {
                warn!("Label column {col} is constant over {} rows", target.len());
            }
        }

        let columns = x.to_columns();
        let estimators = targets
            .par_iter()
            .map(|target| -> Result<GradientBoostedClassifier> {
                let mut estimator = GradientBoostedClassifier::new(params);
                estimator.fit_with_columns(x, &columns, target)?;
                Ok(estimator)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Fitted {n_outputs} boosters on {} rows x {} features ({params})",
            x.n_rows(),
            x.n_cols()
        );
        Ok(Self { estimators })
    }

    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    pub fn estimators(&self) -> &[GradientBoostedClassifier] {
        &self.estimators
    }

    /// Per-column probabilities for one row.
    pub fn predict_proba(&self, row: &[(usize, f64)]) -> Vec<f64> {
        self.estimators.iter().map(|e| e.predict_proba(row)).collect()
    }

    pub fn predict_proba_batch(&self, x: &SparseMatrix) -> Vec<Vec<f64>> {
        x.rows().par_iter().map(|row| self.predict_proba(row)).collect()
    }

    /// Multi-hot predictions at `threshold`.
    pub fn predict(&self, x: &SparseMatrix, threshold: f64) -> LabelMatrix {
        self.predict_proba_batch(x)
            .into_iter()
            .map(|probs| probs.into_iter().map(|p| p >= threshold).collect())
            .collect()
    }
}
