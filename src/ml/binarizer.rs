//! Multi-label binarizer: category sets to multi-hot rows and back.

use std::collections::{BTreeSet, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};

/// Multi-hot label matrix, one row per sample and one column per class.
pub type LabelMatrix = Vec<Vec<bool>>;

/// Maps category names to columns.
///
/// Classes are the sorted unique labels seen by [`LabelBinarizer::fit`]; the
/// name to column mapping is explicit, so no caller relies on positional
/// coincidence with the taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelBinarizer {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for LabelBinarizer {
    fn from(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Self { classes, index }
    }
}

impl From<LabelBinarizer> for Vec<String> {
    fn from(binarizer: LabelBinarizer) -> Self {
        binarizer.classes
    }
}

impl LabelBinarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<S: AsRef<str>>(&mut self, label_sets: &[Vec<S>]) {
        let classes: BTreeSet<&str> = label_sets
            .iter()
            .flat_map(|labels| labels.iter().map(AsRef::as_ref))
            .collect();
        *self = Self::from(classes.into_iter().map(str::to_string).collect::<Vec<_>>());
    }

    /// Multi-hot rows; labels unseen during fit are ignored.
    pub fn transform<S: AsRef<str>>(&self, label_sets: &[Vec<S>]) -> LabelMatrix {
        let mut unknown = 0usize;
        let matrix = label_sets
            .iter()
            .map(|labels| {
                let mut row = vec![false; self.classes.len()];
                for label in labels {
                    match self.index.get(label.as_ref()) {
                        Some(&idx) => row[idx] = true,
                        None => unknown += 1,
                    }
                }
                row
            })
            .collect();
        if unknown > 0 {
            warn!("Ignored {unknown} labels unknown to the binarizer");
        }
        matrix
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, label_sets: &[Vec<S>]) -> LabelMatrix {
        self.fit(label_sets);
        self.transform(label_sets)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn column_of(&self, class: &str) -> Option<usize> {
        self.index.get(class).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
