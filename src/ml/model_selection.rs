//! Hyperparameter grid, k-fold splitting and grid search.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::{Result, TasnifError};
use crate::ml::MLError;
use crate::ml::binarizer::LabelMatrix;
use crate::ml::gbdt::BoosterParams;
use crate::ml::metrics::micro_f1;
use crate::ml::pipeline::FeatureModelPipeline;

/// Candidate values for each searched hyperparameter.
///
/// Parameters not listed here keep their [`BoosterParams::default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<usize>,
    pub learning_rate: Vec<f64>,
    pub subsample: Vec<f64>,
    pub colsample_bytree: Vec<f64>,
}

impl Default for ParamGrid {
    /// The single point of the shipped model.
    fn default() -> Self {
        let params = BoosterParams::default();
        Self {
            n_estimators: vec![params.n_estimators],
            max_depth: vec![params.max_depth],
            learning_rate: vec![params.learning_rate],
            subsample: vec![params.subsample],
            colsample_bytree: vec![params.colsample_bytree],
        }
    }
}

impl ParamGrid {
    /// Number of parameter combinations.
    pub fn len(&self) -> usize {
        self.n_estimators.len()
            * self.max_depth.len()
            * self.learning_rate.len()
            * self.subsample.len()
            * self.colsample_bytree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cartesian product in a fixed order, the last parameter varying fastest.
    pub fn points(&self) -> Vec<BoosterParams> {
        let mut points = Vec::with_capacity(self.len());
        for &n_estimators in &self.n_estimators {
            for &max_depth in &self.max_depth {
                for &learning_rate in &self.learning_rate {
                    for &subsample in &self.subsample {
                        for &colsample_bytree in &self.colsample_bytree {
                            points.push(BoosterParams {
                                n_estimators,
                                max_depth,
                                learning_rate,
                                subsample,
                                colsample_bytree,
                                ..Default::default()
                            });
                        }
                    }
                }
            }
        }
        points
    }
}

/// Contiguous, unshuffled k-fold splitter.
///
/// The first `n % k` folds hold one extra sample.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(TasnifError::invalid_argument(format!(
                "k-fold needs at least 2 splits, got {n_splits}"
            )));
        }
        Ok(Self { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// `(train, test)` index pairs for `n_samples` samples.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if n_samples < self.n_splits {
            return Err(MLError::InsufficientTrainingData {
                min_samples: self.n_splits,
                actual: n_samples,
            }
            .into());
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let end = start + size;
            let test: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n_samples).collect();
            folds.push((train, test));
            start = end;
        }
        Ok(folds)
    }
}

/// Cross-validated score of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    pub params: BoosterParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
}

/// Outcome of a grid search: the winner refitted on all data.
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best_params: BoosterParams,
    pub best_score: f64,
    pub cv_results: Vec<CvResult>,
    pub best_pipeline: FeatureModelPipeline,
}

/// Exhaustive search over a [`ParamGrid`] scored by mean micro-F1.
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: ParamGrid,
    folds: KFold,
    vectorizer_config: VectorizerConfig,
}

impl GridSearch {
    pub fn new(
        grid: ParamGrid,
        n_splits: usize,
        vectorizer_config: VectorizerConfig,
    ) -> Result<Self> {
        if grid.is_empty() {
            return Err(TasnifError::invalid_argument("parameter grid is empty"));
        }
        Ok(Self {
            grid,
            folds: KFold::new(n_splits)?,
            vectorizer_config,
        })
    }

    /// Cross-validate every grid point, then refit the best on all samples.
    ///
    /// Ties keep the earliest point in grid order.
    pub fn fit(&self, texts: &[String], y: &LabelMatrix) -> Result<GridSearchResult> {
        if texts.len() != y.len() {
            return Err(MLError::InvalidFeatureVector {
                message: format!("{} texts but {} label rows", texts.len(), y.len()),
            }
            .into());
        }
        let folds = self.folds.split(texts.len())?;
        let points = self.grid.points();
        info!(
            "Grid search: {} candidates x {} folds on {} samples",
            points.len(),
            folds.len(),
            texts.len()
        );

        let mut cv_results = Vec::with_capacity(points.len());
        for params in points {
            let mut fold_scores = Vec::with_capacity(folds.len());
            for (train, test) in &folds {
                let train_texts = select(texts, train);
                let train_y = select(y, train);
                let pipeline = FeatureModelPipeline::fit(
                    &train_texts,
                    &train_y,
                    self.vectorizer_config,
                    params,
                )?;
                let predicted = pipeline.predict(&select(texts, test))?;
                fold_scores.push(micro_f1(&select(y, test), &predicted));
            }
            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            debug!("{params}: mean micro-F1 {mean_score:.4} over {fold_scores:?}");
            cv_results.push(CvResult {
                params,
                fold_scores,
                mean_score,
            });
        }

        let best = cv_results
            .iter()
            .fold(None::<&CvResult>, |best, candidate| match best {
                Some(b) if b.mean_score >= candidate.mean_score => Some(b),
                _ => Some(candidate),
            })
            .ok_or_else(|| TasnifError::training("grid search produced no candidates"))?;
        let best_params = best.params;
        let best_score = best.mean_score;
        info!("Best parameters: {best_params} (micro-F1 {best_score:.4})");

        let best_pipeline =
            FeatureModelPipeline::fit(texts, y, self.vectorizer_config, best_params)?;

        Ok(GridSearchResult {
            best_params,
            best_score,
            cv_results,
            best_pipeline,
        })
    }
}

fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}
