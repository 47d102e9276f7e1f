//! Core analyzer trait definition.
//!
//! Analyzers turn normalized text into the terms counted by the TF-IDF
//! vectorizer:
//!
//! ```text
//! Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```
//!
//! # Examples
//!
//! ```
//! use tasnif::analysis::analyzer::{Analyzer, feature_analyzer};
//!
//! let analyzer = feature_analyzer((1, 2)).unwrap();
//! let terms: Vec<_> = analyzer.analyze("Courier was RUDE").unwrap().map(|t| t.text).collect();
//!
//! assert_eq!(terms, vec!["courier", "was", "rude", "courier was", "was rude"]);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so a fitted vectorizer can be shared by
/// concurrent inference callers.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;
}
