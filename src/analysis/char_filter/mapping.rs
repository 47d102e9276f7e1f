use aho_corasick::{AhoCorasick, MatchKind};

use super::CharFilter;
use crate::error::{Result, TasnifError};

/// Replaces every occurrence of a set of patterns, longest match first.
pub struct MappingCharFilter {
    ac: AhoCorasick,
    replacements: Vec<String>,
    name: &'static str,
}

impl MappingCharFilter {
    pub fn new<K, V>(mapping: Vec<(K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_name(mapping, "mapping")
    }

    /// Build a filter reporting `name` from [`CharFilter::name`].
    pub fn with_name<K, V>(mapping: Vec<(K, V)>, name: &'static str) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut keys = Vec::with_capacity(mapping.len());
        let mut replacements = Vec::with_capacity(mapping.len());

        for (k, v) in mapping {
            keys.push(k.into());
            replacements.push(v.into());
        }

        let ac = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&keys)
            .map_err(|e| TasnifError::analysis(format!("Invalid mapping patterns: {e}")))?;

        Ok(Self {
            ac,
            replacements,
            name,
        })
    }
}

impl CharFilter for MappingCharFilter {
    fn filter(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut last_match_end = 0;

        for m in self.ac.find_iter(input) {
            output.push_str(&input[last_match_end..m.start()]);
            output.push_str(&self.replacements[m.pattern().as_usize()]);
            last_match_end = m.end();
        }

        output.push_str(&input[last_match_end..]);
        output
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_char_filter() {
        let filter = MappingCharFilter::new(vec![("ph", "f"), ("qu", "k")]).unwrap();
        assert_eq!(filter.filter("phone queue"), "fone keue");
        assert_eq!(filter.name(), "mapping");
    }

    #[test]
    fn test_mapping_expansion_and_deletion() {
        let filter = MappingCharFilter::new(vec![("a", "aaa"), ("foo", "")]).unwrap();
        assert_eq!(filter.filter("bab"), "baaab");
        assert_eq!(filter.filter("afoob"), "aaaab");
    }

    #[test]
    fn test_mapping_overlap_prefers_longest() {
        let filter = MappingCharFilter::new(vec![("ab", "1"), ("abc", "2")]).unwrap();
        assert_eq!(filter.filter("abc"), "2");
        assert_eq!(filter.filter("abd"), "1d");
    }

    #[test]
    fn test_mapping_multibyte() {
        let filter = MappingCharFilter::new(vec![("\u{FEFB}", "لا")]).unwrap();
        assert_eq!(filter.filter("\u{FEFB}بأس"), "لابأس");
    }
}
