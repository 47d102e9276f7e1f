//! Online classification of a single message.
//!
//! The decision policy turns per-category probabilities into a label set:
//!
//! 1. every category whose probability is at least the threshold is kept;
//! 2. short inputs (few tokens or few characters) keep only the single most
//!    probable category, and only when it clears the threshold.
//!
//! Short-text detection looks at the raw input, before normalization. Input
//! without any term (empty, punctuation only) gets no categories.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::normalize;
use crate::artifact::FeatureModelArtifact;
use crate::config::DecisionPolicy;
use crate::language::{Language, detect_language};

/// Language tag returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayLanguage {
    Arabic,
    English,
}

impl From<Language> for DisplayLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Ar => DisplayLanguage::Arabic,
            Language::En => DisplayLanguage::English,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Assigned categories in classifier column order.
    pub categories: Vec<String>,
    pub language: DisplayLanguage,
}

/// Classifies raw messages with a shared, immutable artifact.
#[derive(Debug, Clone)]
pub struct Classifier {
    artifact: Arc<FeatureModelArtifact>,
    policy: DecisionPolicy,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    #[allow(dead_code)]
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    pub fn new(artifact: Arc<FeatureModelArtifact>, policy: DecisionPolicy) -> Self {
        Self { artifact, policy }
    }

    pub fn artifact(&self) -> &Arc<FeatureModelArtifact> {
        &self.artifact
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Classify one message. Never fails; unusable input yields no categories.
    pub fn predict(&self, raw_text: &str) -> PredictionResult {
        let language = detect_language(raw_text);
        let probabilities = self.score(&normalize(raw_text, language));
        let categories = decide(
            &self.policy,
            &probabilities,
            self.artifact.categories(),
            raw_text,
        );

        PredictionResult {
            categories,
            language: language.into(),
        }
    }

    pub fn handle(&self, request: &PredictRequest) -> PredictionResult {
        self.predict(&request.text)
    }

    /// Per-category probabilities of an already normalized text.
    ///
    /// Text the analyzer finds no term in scores zero everywhere. Terms
    /// outside the vocabulary still go through the classifier.
    pub fn score(&self, normalized: &str) -> Vec<f64> {
        let n_categories = self.artifact.categories().len();
        let pipeline = self.artifact.pipeline();
        let vectorizer = pipeline.vectorizer();

        let row = vectorizer.has_terms(normalized).and_then(|has_terms| {
            if has_terms {
                vectorizer.transform(normalized).map(Some)
            } else {
                Ok(None)
            }
        });
        match row {
            Ok(Some(row)) => pipeline.classifier().predict_proba(&row),
            Ok(None) => vec![0.0; n_categories],
            Err(e) => {
                warn!("Scoring failed, returning no categories: {e}");
                vec![0.0; n_categories]
            }
        }
    }
}

/// Apply the decision policy to `probabilities`, aligned with `categories`.
pub fn decide(
    policy: &DecisionPolicy,
    probabilities: &[f64],
    categories: &[String],
    raw_text: &str,
) -> Vec<String> {
    let scored = categories.iter().zip(probabilities);

    if policy.is_short(raw_text) {
        let mut best: Option<(&String, f64)> = None;
        for (category, &p) in scored {
            if best.is_none_or(|(_, best_p)| p > best_p) {
                best = Some((category, p));
            }
        }
        return best
            .filter(|&(_, p)| p >= policy.threshold)
            .map(|(category, _)| vec![category.clone()])
            .unwrap_or_default();
    }

    scored
        .filter(|&(_, &p)| p >= policy.threshold)
        .map(|(category, _)| category.clone())
        .collect()
}
