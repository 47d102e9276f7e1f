//! Configuration for training, persistence and the decision policy.
//!
//! Every value has a default matching the shipped model; the CLI overrides
//! the two paths and can load the whole structure from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TasnifError};
use crate::ml::model_selection::ParamGrid;
use crate::taxonomy::MINORITY_CATEGORIES;

/// Default location of the labeled corpus.
pub const DEFAULT_DATASET_PATH: &str = "data/synthetic_multilabel_data.json";

/// Default slot of the persisted model.
pub const DEFAULT_ARTIFACT_PATH: &str = "model.bin";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TasnifConfig {
    /// Labeled corpus used by training and evaluation.
    pub dataset_path: PathBuf,
    /// Where the fitted pipeline is persisted.
    pub artifact_path: PathBuf,
    /// Dataset curation settings.
    pub curation: CurationConfig,
    /// TF-IDF settings.
    pub vectorizer: VectorizerConfig,
    /// Hyperparameter grid searched during training.
    pub grid: ParamGrid,
    /// Number of cross-validation folds.
    pub cv_folds: usize,
    /// Online decision policy.
    pub policy: DecisionPolicy,
}

impl Default for TasnifConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            curation: CurationConfig::default(),
            vectorizer: VectorizerConfig::default(),
            grid: ParamGrid::default(),
            cv_folds: 3,
            policy: DecisionPolicy::default(),
        }
    }
}

impl TasnifConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TasnifConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cv_folds < 2 {
            return Err(TasnifError::invalid_config(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.vectorizer.max_features == 0 {
            return Err(TasnifError::invalid_config("max_features must be positive"));
        }
        let (min_n, max_n) = self.vectorizer.ngram_range;
        if min_n == 0 || max_n < min_n {
            return Err(TasnifError::invalid_config(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }
        if self.grid.is_empty() {
            return Err(TasnifError::invalid_config("parameter grid is empty"));
        }
        if !(0.0..=1.0).contains(&self.policy.threshold) {
            return Err(TasnifError::invalid_config(format!(
                "threshold must be within [0, 1], got {}",
                self.policy.threshold
            )));
        }
        Ok(())
    }
}

/// Dataset curation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Target number of records for each minority category.
    pub min_count: usize,
    /// Categories upsampled when under-represented, in processing order.
    pub minority_categories: Vec<String>,
    /// Seed of the resampling RNG.
    pub seed: u64,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            min_count: 200,
            minority_categories: MINORITY_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            seed: 42,
        }
    }
}

/// TF-IDF vectorizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Vocabulary cap.
    pub max_features: usize,
    /// Inclusive word n-gram range.
    pub ngram_range: (usize, usize),
    /// Replace raw term counts with `1 + ln(tf)`.
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 3000,
            ngram_range: (1, 2),
            sublinear_tf: true,
        }
    }
}

/// Decision policy applied to per-category probabilities at inference time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// A category is assigned when its probability is at least this value.
    pub threshold: f64,
    /// Inputs with at most this many whitespace-delimited tokens are short.
    pub short_max_tokens: usize,
    /// Inputs with at most this many characters are short.
    pub short_max_chars: usize,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.20,
            short_max_tokens: 3,
            short_max_chars: 10,
        }
    }
}

impl DecisionPolicy {
    /// Whether `raw_text` triggers the single-category override.
    pub fn is_short(&self, raw_text: &str) -> bool {
        raw_text.split_whitespace().count() <= self.short_max_tokens
            || raw_text.chars().count() <= self.short_max_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TasnifConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(config.artifact_path, PathBuf::from(DEFAULT_ARTIFACT_PATH));
        assert_eq!(config.curation.min_count, 200);
        assert_eq!(config.curation.minority_categories, vec!["Delay", "Positive Feedback"]);
        assert_eq!(config.vectorizer.max_features, 3000);
        assert_eq!(config.vectorizer.ngram_range, (1, 2));
        assert!(config.vectorizer.sublinear_tf);
        assert_eq!(config.cv_folds, 3);
        assert_eq!(config.policy.threshold, 0.20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_text_rule() {
        let policy = DecisionPolicy::default();
        assert!(policy.is_short(""));
        assert!(policy.is_short("very late parcel"));
        assert!(policy.is_short("جيد"));
        // four tokens but only ten characters
        assert!(policy.is_short("a b c defg"));
        assert!(!policy.is_short("the parcel arrived late"));
        // eleven characters, two tokens
        assert!(policy.is_short("hello world"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TasnifConfig =
            serde_json::from_str(r#"{"artifact_path": "/tmp/m.bin", "cv_folds": 5}"#).unwrap();
        assert_eq!(config.artifact_path, PathBuf::from("/tmp/m.bin"));
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.curation.min_count, 200);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = TasnifConfig {
            cv_folds: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = TasnifConfig::default();
        config.vectorizer.ngram_range = (2, 1);
        assert!(config.validate().is_err());

        let mut config = TasnifConfig::default();
        config.policy.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
