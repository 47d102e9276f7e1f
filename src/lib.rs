//! # Tasnif
//!
//! Multi-label classification of customer feedback written in English or
//! Arabic.
//!
//! ## Features
//!
//! - Language detection restricted to English and Arabic
//! - Arabic normalization (diacritics, hamza, lam-alef ligatures)
//! - Corpus curation with minority-category upsampling
//! - TF-IDF word n-grams with one-vs-rest gradient-boosted trees
//! - Grid search with k-fold cross-validation
//! - Checksummed model artifact with atomic replacement
//! - Threshold and short-text decision policy
//!
//! ## Example
//!
//! ```no_run
//! use tasnif::config::TasnifConfig;
//! use tasnif::service::ServiceContext;
//!
//! let context = ServiceContext::bootstrap(TasnifConfig::default()).unwrap();
//! let result = context.classifier().predict("The courier was rude");
//! println!("{:?} ({:?})", result.categories, result.language);
//! ```

pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod inference;
pub mod language;
pub mod ml;
pub mod service;
pub mod taxonomy;
pub mod training;

pub mod prelude {
    pub use crate::config::{DecisionPolicy, TasnifConfig};
    pub use crate::error::{Result, TasnifError};
    pub use crate::inference::{Classifier, PredictionResult};
    pub use crate::language::Language;
    pub use crate::service::ServiceContext;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
