//! Char filter implementations for text normalization.
//!
//! Char filters rewrite the raw string before it reaches the tokenizer. The
//! Arabic normalizer is a chain of them.
//!
//! # Available Filters
//!
//! - [`strip::StripCharFilter`] - Remove every character in a set (diacritics)
//! - [`mapping::MappingCharFilter`] - Replace substrings (hamza forms, ligatures)

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the rewritten text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod mapping;
pub mod strip;

pub use mapping::MappingCharFilter;
pub use strip::StripCharFilter;
