//! Text analysis module for Tasnif.
//!
//! This module provides normalization, tokenization and filtering of
//! feedback messages before they are turned into TF-IDF features.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::*;
pub use normalizer::{TextNormalizer, normalize};
pub use token::*;
