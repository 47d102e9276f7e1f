use ahash::AHashSet;

use super::CharFilter;

/// Removes every character contained in a fixed set.
#[derive(Clone, Debug)]
pub struct StripCharFilter {
    chars: AHashSet<char>,
    name: &'static str,
}

impl StripCharFilter {
    pub fn new<I: IntoIterator<Item = char>>(chars: I, name: &'static str) -> Self {
        Self {
            chars: chars.into_iter().collect(),
            name,
        }
    }
}

impl CharFilter for StripCharFilter {
    fn filter(&self, input: &str) -> String {
        input.chars().filter(|c| !self.chars.contains(c)).collect()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
