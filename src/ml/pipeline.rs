//! TF-IDF features followed by one-vs-rest boosting.

use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::Result;
use crate::ml::binarizer::LabelMatrix;
use crate::ml::gbdt::BoosterParams;
use crate::ml::one_vs_rest::{DEFAULT_THRESHOLD, OneVsRestClassifier};
use crate::ml::tfidf::TfIdfVectorizer;

/// A fitted vectorizer and the classifier trained on its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureModelPipeline {
    vectorizer: TfIdfVectorizer,
    classifier: OneVsRestClassifier,
}

impl FeatureModelPipeline {
    /// Fit both stages on normalized texts and their multi-hot labels.
    pub fn fit(
        texts: &[String],
        y: &LabelMatrix,
        vectorizer_config: VectorizerConfig,
        params: BoosterParams,
    ) -> Result<Self> {
        let mut vectorizer = TfIdfVectorizer::new(vectorizer_config)?;
        let x = vectorizer.fit_transform(texts)?;
        let classifier = OneVsRestClassifier::fit(&x, y, params)?;
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Per-column probabilities for one normalized text.
    pub fn predict_proba_one(&self, text: &str) -> Result<Vec<f64>> {
        let row = self.vectorizer.transform(text)?;
        Ok(self.classifier.predict_proba(&row))
    }

    pub fn predict_proba(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let x = self.vectorizer.transform_batch(texts)?;
        Ok(self.classifier.predict_proba_batch(&x))
    }

    /// Multi-hot predictions at the 0.5 threshold.
    pub fn predict(&self, texts: &[String]) -> Result<LabelMatrix> {
        let x = self.vectorizer.transform_batch(texts)?;
        Ok(self.classifier.predict(&x, DEFAULT_THRESHOLD))
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &OneVsRestClassifier {
        &self.classifier
    }

    pub fn n_outputs(&self) -> usize {
        self.classifier.n_outputs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, LabelMatrix) {
        let mut texts = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            match i % 3 {
                0 => {
                    texts.push(format!("the parcel arrived late again {i}"));
                    y.push(vec![true, false]);
                }
                1 => {
                    texts.push(format!("please refund my money {i}"));
                    y.push(vec![false, true]);
                }
                _ => {
                    texts.push(format!("late parcel and I want a refund {i}"));
                    y.push(vec![true, true]);
                }
            }
        }
        (texts, y)
    }

    #[test]
    fn test_fit_and_predict() {
        let (texts, y) = corpus();
        let params = BoosterParams {
            n_estimators: 30,
            ..Default::default()
        };
        let pipeline =
            FeatureModelPipeline::fit(&texts, &y, VectorizerConfig::default(), params).unwrap();
        assert_eq!(pipeline.n_outputs(), 2);

        let probs = pipeline.predict_proba_one("parcel late").unwrap();
        assert!(probs[0] > 0.5);
        assert!(probs[1] < 0.5);

        let predicted = pipeline.predict(&texts).unwrap();
        assert_eq!(predicted, y);
    }
}
