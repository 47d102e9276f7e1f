//! Shingle (word n-gram) filter.
//!
//! Emits, for every position, the n-grams of consecutive tokens whose size
//! lies in `min_size..=max_size`, joined with a single space. With
//! `(1, 2)` the stream `a b c` becomes `a b c`, `a b`, `b c`: all unigrams
//! first, then all bigrams.
//!
//! # Examples
//!
//! ```
//! use tasnif::analysis::token_filter::Filter;
//! use tasnif::analysis::token_filter::shingle::ShingleFilter;
//! use tasnif::analysis::token::Token;
//!
//! let filter = ShingleFilter::new(1, 2).unwrap();
//! let tokens = vec![Token::new("very", 0), Token::new("late", 1), Token::new("parcel", 2)];
//! let texts: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(texts, vec!["very", "late", "parcel", "very late", "late parcel"]);
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, TasnifError};

/// A filter producing word n-grams from adjacent tokens.
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a shingle filter for n-gram sizes `min_size..=max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 || max_size < min_size {
            return Err(TasnifError::analysis(format!(
                "Invalid shingle range ({min_size}, {max_size})"
            )));
        }
        Ok(Self { min_size, max_size })
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let tokens: Vec<Token> = tokens.collect();
        let mut shingles = Vec::new();

        for size in self.min_size..=self.max_size {
            if size > tokens.len() {
                break;
            }
            for window in tokens.windows(size) {
                let first = &window[0];
                let last = &window[size - 1];
                let text = window
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                shingles.push(Token::with_offsets(
                    text,
                    first.position,
                    first.start_offset,
                    last.end_offset,
                ));
            }
        }

        Ok(Box::new(shingles.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(filter: &ShingleFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        assert_eq!(
            texts(&filter, &["courier", "was", "rude"]),
            vec!["courier", "was", "rude", "courier was", "was rude"]
        );
    }

    #[test]
    fn test_short_streams() {
        let filter = ShingleFilter::new(1, 2).unwrap();
        assert_eq!(texts(&filter, &["late"]), vec!["late"]);
        assert!(texts(&filter, &[]).is_empty());

        let bigrams_only = ShingleFilter::new(2, 2).unwrap();
        assert!(texts(&bigrams_only, &["late"]).is_empty());
    }

    #[test]
    fn test_offsets_span_window() {
        let filter = ShingleFilter::new(2, 2).unwrap();
        let tokens = vec![
            Token::with_offsets("very", 0, 0, 4),
            Token::with_offsets("late", 1, 5, 9),
        ];
        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].start_offset, 0);
        assert_eq!(result[0].end_offset, 9);
    }

    #[test]
    fn test_invalid_range() {
        assert!(ShingleFilter::new(0, 2).is_err());
        assert!(ShingleFilter::new(3, 2).is_err());
    }
}
