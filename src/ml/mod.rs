//! Learning components of the feedback classifier.
//!
//! - [`tfidf::TfIdfVectorizer`] turns normalized text into sparse features
//! - [`binarizer::LabelBinarizer`] maps category sets to multi-hot rows
//! - [`gbdt::GradientBoostedClassifier`] is a binary gradient-boosted tree ensemble
//! - [`one_vs_rest::OneVsRestClassifier`] fits one ensemble per category
//! - [`pipeline::FeatureModelPipeline`] chains vectorizer and classifier
//! - [`model_selection`] holds the parameter grid, k-fold splitter and grid search
//! - [`metrics`] computes precision, recall and F1

pub mod binarizer;
pub mod gbdt;
pub mod metrics;
pub mod model_selection;
pub mod one_vs_rest;
pub mod pipeline;
pub mod sparse;
pub mod tfidf;

/// Machine learning error types.
#[derive(Debug, thiserror::Error)]
pub enum MLError {
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    #[error("Invalid feature vector: {message}")]
    InvalidFeatureVector { message: String },

    #[error("Training data insufficient: need at least {min_samples} samples, got {actual}")]
    InsufficientTrainingData { min_samples: usize, actual: usize },

    #[error("Degenerate target for '{category}': every sample has the same label")]
    DegenerateTarget { category: String },

    #[error("Feature extraction failed: {message}")]
    FeatureExtractionError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = MLError::InsufficientTrainingData {
            min_samples: 3,
            actual: 1,
        };
        assert_eq!(
            error.to_string(),
            "Training data insufficient: need at least 3 samples, got 1"
        );

        let error = MLError::DegenerateTarget {
            category: "Payment".to_string(),
        };
        assert!(error.to_string().contains("Payment"));
    }
}
