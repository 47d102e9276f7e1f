//! Gradient-boosted decision trees for binary classification.
//!
//! Each boosting round fits a regression tree to the first and second order
//! gradients of the logistic loss. Split gain and leaf weights follow the
//! second-order formulation:
//!
//! - leaf weight `w = -G / (H + λ)`
//! - gain `½ [G_L² / (H_L + λ) + G_R² / (H_R + λ) - G² / (H + λ)]`
//!
//! where `G` and `H` are gradient and hessian sums over the rows of a node.
//! A row goes left when its feature value is strictly below the threshold;
//! absent sparse entries are the value `0.0`.

use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasnifError};
use crate::ml::MLError;
use crate::ml::sparse::{ColumnIndex, SparseMatrix, feature_value};

/// Smallest loss reduction that justifies a split.
const MIN_SPLIT_GAIN: f64 = 1e-6;

/// Lower bound on per-row hessians.
const MIN_HESSIAN: f64 = 1e-16;

/// Trait for binary probabilistic classifiers.
pub trait BinaryClassifier: Send + Sync {
    /// Train on a feature matrix and one boolean target per row.
    fn fit(&mut self, x: &SparseMatrix, y: &[bool]) -> Result<()>;

    /// Probability of the positive class for one sparse row.
    fn predict_proba(&self, row: &[(usize, f64)]) -> f64;

    /// Check if the model is trained and ready for predictions.
    fn is_trained(&self) -> bool;

    /// Get training statistics.
    fn training_stats(&self) -> TrainingStats;
}

/// Booster hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterParams {
    /// Number of boosting rounds.
    pub n_estimators: usize,
    pub max_depth: usize,
    /// Shrinkage applied to every tree's output.
    pub learning_rate: f64,
    /// Fraction of rows sampled per round.
    pub subsample: f64,
    /// Fraction of features sampled per tree.
    pub colsample_bytree: f64,
    /// L2 regularization on leaf weights.
    pub reg_lambda: f64,
    /// Minimum hessian sum in a child.
    pub min_child_weight: f64,
    pub seed: u64,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 3,
            learning_rate: 0.1,
            subsample: 1.0,
            colsample_bytree: 1.0,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            seed: 42,
        }
    }
}

impl BoosterParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(TasnifError::invalid_config("n_estimators must be positive"));
        }
        if self.learning_rate <= 0.0 {
            return Err(TasnifError::invalid_config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        for (name, ratio) in [
            ("subsample", self.subsample),
            ("colsample_bytree", self.colsample_bytree),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(TasnifError::invalid_config(format!(
                    "{name} must be within (0, 1], got {ratio}"
                )));
            }
        }
        if self.reg_lambda < 0.0 || self.min_child_weight < 0.0 {
            return Err(TasnifError::invalid_config(
                "reg_lambda and min_child_weight must be non-negative",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for BoosterParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n_estimators={}, max_depth={}, learning_rate={}, subsample={}, colsample_bytree={}",
            self.n_estimators,
            self.max_depth,
            self.learning_rate,
            self.subsample,
            self.colsample_bytree
        )
    }
}

/// Training statistics and performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Training log loss after each round.
    pub training_losses: Vec<f64>,
    /// Number of boosting rounds completed.
    pub iterations: usize,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
    pub final_training_loss: f64,
}

/// Gradient-boosted tree ensemble with logistic loss.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    params: BoosterParams,
    /// Decision trees in the ensemble.
    trees: Vec<DecisionTree>,
    /// Initial margin, the logit of a 0.5 base score.
    base_margin: f64,
    training_stats: Option<TrainingStats>,
}

impl GradientBoostedClassifier {
    pub fn new(params: BoosterParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            base_margin: 0.0,
            training_stats: None,
        }
    }

    pub fn params(&self) -> &BoosterParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Train using a precomputed column view of `x`.
    ///
    /// One-vs-rest training shares a single [`ColumnIndex`] across all
    /// categories.
    pub fn fit_with_columns(
        &mut self,
        x: &SparseMatrix,
        columns: &ColumnIndex,
        y: &[bool],
    ) -> Result<()> {
        let n_rows = x.n_rows();
        if n_rows == 0 {
            return Err(MLError::InsufficientTrainingData {
                min_samples: 1,
                actual: 0,
            }
            .into());
        }
        if y.len() != n_rows || columns.n_rows() != n_rows {
            return Err(MLError::InvalidFeatureVector {
                message: format!("{} rows but {} targets", n_rows, y.len()),
            }
            .into());
        }
        self.params.validate()?;

        let start_time = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut margins = vec![self.base_margin; n_rows];
        let mut trees = Vec::with_capacity(self.params.n_estimators);
        let mut training_losses = Vec::with_capacity(self.params.n_estimators);

        for _ in 0..self.params.n_estimators {
            let (gradients, hessians) = logistic_gradients(&margins, y);
            let rows = self.sample_rows(&mut rng, n_rows);
            let features = self.sample_features(&mut rng, x.n_cols());

            let tree = DecisionTree::fit(
                columns,
                &features,
                &gradients,
                &hessians,
                &rows,
                &self.params,
            )?;

            for (i, margin) in margins.iter_mut().enumerate() {
                *margin += self.params.learning_rate * tree.predict(x.row(i));
            }
            trees.push(tree);
            training_losses.push(log_loss(&margins, y));
        }

        let final_training_loss = training_losses.last().copied().unwrap_or(0.0);
        debug!(
            "Boosted {} trees in {:?}, final log loss {final_training_loss:.5}",
            trees.len(),
            start_time.elapsed()
        );

        self.training_stats = Some(TrainingStats {
            iterations: trees.len(),
            training_losses,
            training_time_ms: start_time.elapsed().as_millis() as u64,
            final_training_loss,
        });
        self.trees = trees;

        Ok(())
    }

    /// Raw additive score before the sigmoid.
    pub fn decision_function(&self, row: &[(usize, f64)]) -> f64 {
        self.base_margin
            + self.params.learning_rate * self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
    }

    fn sample_rows(&self, rng: &mut StdRng, n_rows: usize) -> Vec<usize> {
        if self.params.subsample >= 1.0 {
            return (0..n_rows).collect();
        }
        (0..n_rows)
            .filter(|_| rng.random::<f64>() < self.params.subsample)
            .collect()
    }

    fn sample_features(&self, rng: &mut StdRng, n_cols: usize) -> Vec<usize> {
        if self.params.colsample_bytree >= 1.0 || n_cols == 0 {
            return (0..n_cols).collect();
        }
        let amount =
            ((self.params.colsample_bytree * n_cols as f64).round() as usize).clamp(1, n_cols);
        let mut features = rand::seq::index::sample(rng, n_cols, amount).into_vec();
        features.sort_unstable();
        features
    }
}

impl BinaryClassifier for GradientBoostedClassifier {
    fn fit(&mut self, x: &SparseMatrix, y: &[bool]) -> Result<()> {
        let columns = x.to_columns();
        self.fit_with_columns(x, &columns, y)
    }

    fn predict_proba(&self, row: &[(usize, f64)]) -> f64 {
        sigmoid(self.decision_function(row))
    }

    fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }

    fn training_stats(&self) -> TrainingStats {
        self.training_stats.clone().unwrap_or_default()
    }
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

fn logistic_gradients(margins: &[f64], y: &[bool]) -> (Vec<f64>, Vec<f64>) {
    margins
        .iter()
        .zip(y)
        .map(|(&margin, &label)| {
            let p = sigmoid(margin);
            let target = if label { 1.0 } else { 0.0 };
            (p - target, (p * (1.0 - p)).max(MIN_HESSIAN))
        })
        .unzip()
}

fn log_loss(margins: &[f64], y: &[bool]) -> f64 {
    const EPS: f64 = 1e-15;
    let total: f64 = margins
        .iter()
        .zip(y)
        .map(|(&margin, &label)| {
            let p = sigmoid(margin).clamp(EPS, 1.0 - EPS);
            if label { -p.ln() } else { -(1.0 - p).ln() }
        })
        .sum();
    total / margins.len() as f64
}

/// Regression tree over gradient statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<Box<TreeNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeNode {
    /// Feature index for split (-1 for leaf).
    feature_idx: i32,
    /// Rows with a value below the threshold go left.
    threshold: f64,
    /// Leaf weight (for leaf nodes).
    value: f64,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(value: f64) -> Box<Self> {
        Box::new(TreeNode {
            feature_idx: -1,
            threshold: 0.0,
            value,
            left: None,
            right: None,
        })
    }
}

struct GrowContext<'a> {
    columns: &'a ColumnIndex,
    features: &'a [usize],
    gradients: &'a [f64],
    hessians: &'a [f64],
    params: &'a BoosterParams,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl DecisionTree {
    /// Fit a tree on the gradient statistics of `rows`, splitting only on `features`.
    pub fn fit(
        columns: &ColumnIndex,
        features: &[usize],
        gradients: &[f64],
        hessians: &[f64],
        rows: &[usize],
        params: &BoosterParams,
    ) -> Result<Self> {
        if gradients.len() != columns.n_rows() || hessians.len() != columns.n_rows() {
            return Err(MLError::InvalidFeatureVector {
                message: "Gradients and training data length mismatch".to_string(),
            }
            .into());
        }

        let ctx = GrowContext {
            columns,
            features,
            gradients,
            hessians,
            params,
        };
        let mut in_node = vec![false; columns.n_rows()];
        let root = Self::build_tree(&ctx, rows, 0, &mut in_node);

        Ok(Self { root: Some(root) })
    }

    /// Leaf weight reached by `row`.
    pub fn predict(&self, row: &[(usize, f64)]) -> f64 {
        match self.root {
            Some(ref root) => Self::predict_node(root, row),
            None => 0.0,
        }
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            match (&node.left, &node.right) {
                (Some(left), Some(right)) => count(left) + count(right),
                _ => 1,
            }
        }
        self.root.as_deref().map_or(0, count)
    }

    /// Recursively grow the tree.
    ///
    /// `in_node` is all false on entry and on return.
    fn build_tree(
        ctx: &GrowContext<'_>,
        indices: &[usize],
        depth: usize,
        in_node: &mut [bool],
    ) -> Box<TreeNode> {
        let grad_sum: f64 = indices.iter().map(|&i| ctx.gradients[i]).sum();
        let hess_sum: f64 = indices.iter().map(|&i| ctx.hessians[i]).sum();
        let leaf_value = -grad_sum / (hess_sum + ctx.params.reg_lambda);

        if depth >= ctx.params.max_depth || indices.len() < 2 {
            return TreeNode::leaf(leaf_value);
        }

        for &i in indices {
            in_node[i] = true;
        }
        let split = Self::find_best_split(ctx, indices.len(), grad_sum, hess_sum, in_node);

        let Some(split) = split else {
            for &i in indices {
                in_node[i] = false;
            }
            return TreeNode::leaf(leaf_value);
        };

        let mut goes_right = vec![false; in_node.len()];
        for &(row, value) in ctx.columns.column(split.feature) {
            if in_node[row] && value >= split.threshold {
                goes_right[row] = true;
            }
        }
        for &i in indices {
            in_node[i] = false;
        }

        let (right_indices, left_indices): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| goes_right[i]);

        let left = Self::build_tree(ctx, &left_indices, depth + 1, in_node);
        let right = Self::build_tree(ctx, &right_indices, depth + 1, in_node);

        Box::new(TreeNode {
            feature_idx: split.feature as i32,
            threshold: split.threshold,
            value: leaf_value,
            left: Some(left),
            right: Some(right),
        })
    }

    /// Best split over the sampled features, scanning each column once.
    ///
    /// Rows without an entry form the zero bucket, which sorts before every
    /// stored value.
    fn find_best_split(
        ctx: &GrowContext<'_>,
        n_node: usize,
        grad_sum: f64,
        hess_sum: f64,
        in_node: &[bool],
    ) -> Option<Split> {
        let lambda = ctx.params.reg_lambda;
        let min_child_weight = ctx.params.min_child_weight;
        let parent_score = grad_sum * grad_sum / (hess_sum + lambda);
        let mut best: Option<Split> = None;

        for &feature in ctx.features {
            let column = ctx.columns.column(feature);

            let (mut nz_grad, mut nz_hess, mut nz_count) = (0.0, 0.0, 0usize);
            for &(row, _) in column {
                if in_node[row] {
                    nz_grad += ctx.gradients[row];
                    nz_hess += ctx.hessians[row];
                    nz_count += 1;
                }
            }
            if nz_count == 0 {
                continue;
            }

            let mut left_grad = grad_sum - nz_grad;
            let mut left_hess = hess_sum - nz_hess;
            let mut left_count = n_node - nz_count;
            let mut prev_value = 0.0;

            for &(row, value) in column {
                if !in_node[row] {
                    continue;
                }
                if left_count > 0 && value > prev_value {
                    let right_grad = grad_sum - left_grad;
                    let right_hess = hess_sum - left_hess;
                    if left_hess >= min_child_weight && right_hess >= min_child_weight {
                        let gain = 0.5
                            * (left_grad * left_grad / (left_hess + lambda)
                                + right_grad * right_grad / (right_hess + lambda)
                                - parent_score);
                        let best_gain = best.map_or(MIN_SPLIT_GAIN, |s| s.gain);
                        if gain > best_gain {
                            best = Some(Split {
                                feature,
                                threshold: (prev_value + value) / 2.0,
                                gain,
                            });
                        }
                    }
                }
                left_grad += ctx.gradients[row];
                left_hess += ctx.hessians[row];
                left_count += 1;
                prev_value = value;
            }
        }

        best
    }

    fn predict_node(node: &TreeNode, row: &[(usize, f64)]) -> f64 {
        if node.feature_idx < 0 {
            return node.value;
        }

        let value = feature_value(row, node.feature_idx as usize);
        let child = if value < node.threshold {
            &node.left
        } else {
            &node.right
        };
        match child {
            Some(child) => Self::predict_node(child, row),
            None => node.value,
        }
    }
}
