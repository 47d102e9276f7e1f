//! TF-IDF vectorizer for text feature extraction.
//!
//! Terms are the word n-grams produced by
//! [`feature_analyzer`](crate::analysis::analyzer::feature_analyzer). Fitting
//! keeps the `max_features` terms with the highest corpus frequency (ties
//! resolved lexicographically) and numbers them in lexicographic order.
//! Weights use the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, optional sublinear term frequency, and every
//! row is scaled to unit L2 norm.

use std::collections::HashMap;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer, feature_analyzer};
use crate::config::VectorizerConfig;
use crate::error::{Result, TasnifError};
use crate::ml::MLError;
use crate::ml::sparse::{SparseMatrix, SparseVector};

/// TF-IDF vectorizer for text feature extraction.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerState", into = "VectorizerState")]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Vocabulary: term -> column mapping.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
    analyzer: Arc<PipelineAnalyzer>,
}

/// Persisted form; the analyzer is rebuilt from the config on load.
#[derive(Serialize, Deserialize)]
struct VectorizerState {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl From<TfIdfVectorizer> for VectorizerState {
    fn from(vectorizer: TfIdfVectorizer) -> Self {
        VectorizerState {
            terms: vectorizer.terms(),
            config: vectorizer.config,
            idf: vectorizer.idf,
            n_documents: vectorizer.n_documents,
        }
    }
}

impl TryFrom<VectorizerState> for TfIdfVectorizer {
    type Error = TasnifError;

    fn try_from(state: VectorizerState) -> Result<Self> {
        if state.terms.len() != state.idf.len() {
            return Err(TasnifError::artifact(format!(
                "vocabulary has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }
        let mut vectorizer = TfIdfVectorizer::new(state.config)?;
        vectorizer.vocabulary = state
            .terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        vectorizer.idf = state.idf;
        vectorizer.n_documents = state.n_documents;
        Ok(vectorizer)
    }
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.pipeline_name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        Ok(Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            analyzer: Arc::new(feature_analyzer(config.ngram_range)?),
        })
    }

    /// Fit the vectorizer on training documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(MLError::InsufficientTrainingData {
                min_samples: 1,
                actual: 0,
            }
            .into());
        }

        let mut term_frequency: AHashMap<String, usize> = AHashMap::new();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for doc in documents {
            let terms = self.terms_of(doc)?;
            let unique_terms: AHashSet<&String> = terms.iter().collect();
            for term in unique_terms {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if term_frequency.is_empty() {
            return Err(MLError::FeatureExtractionError {
                message: "empty vocabulary; documents contain no terms".to_string(),
            }
            .into());
        }

        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = documents.len() as f64;
        self.idf = terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();
        self.n_documents = documents.len();

        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF row.
    pub fn transform(&self, document: &str) -> Result<SparseVector> {
        if !self.is_fitted() {
            return Err(MLError::ModelNotTrained {
                message: "vectorizer has no vocabulary".to_string(),
            }
            .into());
        }

        let mut counts: AHashMap<usize, usize> = AHashMap::new();
        for term in self.terms_of(document)? {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut row: SparseVector = counts
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (idx, tf * self.idf[idx])
            })
            .collect();
        row.sort_by_key(|&(idx, _)| idx);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut row {
                *weight /= norm;
            }
        }

        Ok(row)
    }

    /// Transform a batch of documents.
    pub fn transform_batch(&self, documents: &[String]) -> Result<SparseMatrix> {
        let mut matrix = SparseMatrix::new(self.vocabulary_size());
        for doc in documents {
            matrix.push_row(self.transform(doc)?);
        }
        Ok(matrix)
    }

    pub fn fit_transform(&mut self, documents: &[String]) -> Result<SparseMatrix> {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    /// Whether the analyzer finds at least one term in `text`, known or not.
    pub fn has_terms(&self, text: &str) -> Result<bool> {
        Ok(self.analyzer.analyze(text)?.next().is_some())
    }

    fn terms_of(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Column of `term`, if it is in the vocabulary.
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    /// Vocabulary terms in column order.
    pub fn terms(&self) -> Vec<String> {
        let mut terms = vec![String::new(); self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            terms[idx] = term.clone();
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn fitted(texts: &[&str], config: VectorizerConfig) -> TfIdfVectorizer {
        let mut vectorizer = TfIdfVectorizer::new(config).unwrap();
        vectorizer.fit(&docs(texts)).unwrap();
        vectorizer
    }

    #[test]
    fn test_vocabulary_is_sorted_with_bigrams() {
        let vectorizer = fitted(&["late parcel", "parcel lost"], VectorizerConfig::default());
        assert_eq!(
            vectorizer.terms(),
            vec!["late", "late parcel", "lost", "parcel", "parcel lost"]
        );
        assert_eq!(vectorizer.n_documents(), 2);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = fitted(&["late parcel", "parcel lost"], VectorizerConfig::default());
        let parcel = vectorizer.column_of("parcel").unwrap();
        let late = vectorizer.column_of("late").unwrap();
        assert!((vectorizer.idf(parcel).unwrap() - 1.0).abs() < 1e-12);
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vectorizer.idf(late).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = VectorizerConfig {
            max_features: 2,
            ngram_range: (1, 1),
            sublinear_tf: true,
        };
        // "late" 3x, "parcel" 2x, "courier" and "rude" once each
        let vectorizer = fitted(&["late late parcel", "late parcel courier rude"], config);
        assert_eq!(vectorizer.terms(), vec!["late", "parcel"]);
    }

    #[test]
    fn test_max_features_ties_are_lexicographic() {
        let config = VectorizerConfig {
            max_features: 2,
            ngram_range: (1, 1),
            sublinear_tf: false,
        };
        let vectorizer = fitted(&["zeta beta alpha"], config);
        assert_eq!(vectorizer.terms(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let vectorizer = fitted(
            &["late parcel late", "courier was rude", "refund please"],
            VectorizerConfig::default(),
        );
        let row = vectorizer.transform("Late parcel, rude courier").unwrap();
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_sublinear_tf() {
        let config = VectorizerConfig {
            max_features: 10,
            ngram_range: (1, 1),
            sublinear_tf: true,
        };
        let vectorizer = fitted(&["late parcel", "parcel"], config);
        let row = vectorizer.transform("late late parcel").unwrap();
        let late = vectorizer.column_of("late").unwrap();
        let parcel = vectorizer.column_of("parcel").unwrap();
        let late_raw = (1.0 + 2f64.ln()) * vectorizer.idf(late).unwrap();
        let parcel_raw = vectorizer.idf(parcel).unwrap();
        let ratio = row[late].1 / row[parcel].1;
        assert!((ratio - late_raw / parcel_raw).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_terms_give_empty_row() {
        let vectorizer = fitted(&["late parcel"], VectorizerConfig::default());
        assert!(vectorizer.transform("xyz").unwrap().is_empty());
        assert!(vectorizer.transform("").unwrap().is_empty());
    }

    #[test]
    fn test_has_terms_ignores_vocabulary() {
        let vectorizer = fitted(&["late parcel"], VectorizerConfig::default());
        assert!(vectorizer.has_terms("completely unrelated words").unwrap());
        assert!(!vectorizer.has_terms("!!! ?").unwrap());
        assert!(!vectorizer.has_terms("").unwrap());
    }

    #[test]
    fn test_fit_errors() {
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
        assert!(vectorizer.fit(&[]).is_err());
        assert!(vectorizer.fit(&docs(&["a b", "!"])).is_err());
        assert!(vectorizer.transform("late").is_err());
    }

    #[test]
    fn test_serde_rebuilds_analyzer() {
        let vectorizer = fitted(&["late parcel", "rude courier"], VectorizerConfig::default());
        let json = serde_json::to_string(&vectorizer).unwrap();
        let restored: TfIdfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.terms(), vectorizer.terms());
        assert_eq!(
            restored.transform("late courier").unwrap(),
            vectorizer.transform("late courier").unwrap()
        );
    }
}
