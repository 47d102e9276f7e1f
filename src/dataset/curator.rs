//! Taxonomy filtering and minority-category upsampling.
//!
//! Curation runs in two passes over the raw corpus:
//!
//! 1. every record's categories are intersected with the taxonomy, and
//!    records left with no category are dropped;
//! 2. each minority category with `0 < count < min_count` records is topped
//!    up to `min_count` by sampling, with replacement, from the records that
//!    already carry it.
//!
//! Counts for step 2 are taken on the filtered corpus, before any category
//! has been upsampled. Additions are appended after the filtered records in
//! the order the minority categories are configured.

use std::collections::BTreeMap;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::normalizer::normalize;
use crate::config::CurationConfig;
use crate::dataset::LabeledRecord;
use crate::taxonomy::is_valid_category;

/// Records after filtering and rebalancing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuratedDataset {
    records: Vec<LabeledRecord>,
    filtered_len: usize,
}

impl CuratedDataset {
    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that survived filtering, before upsampling.
    pub fn filtered_len(&self) -> usize {
        self.filtered_len
    }

    /// Records appended by upsampling.
    pub fn upsampled(&self) -> &[LabeledRecord] {
        &self.records[self.filtered_len..]
    }

    /// Number of records carrying each category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            for category in &record.categories {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Texts normalized with each record's recorded language.
    pub fn normalized_texts(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| normalize(&r.text, r.language))
            .collect()
    }

    /// Category sets in record order.
    pub fn label_sets(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| r.categories.clone()).collect()
    }
}

/// Curates a raw corpus according to a [`CurationConfig`].
#[derive(Debug, Clone, Default)]
pub struct DatasetCurator {
    config: CurationConfig,
}

impl DatasetCurator {
    pub fn new(config: CurationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    pub fn curate(&self, raw_records: Vec<LabeledRecord>) -> CuratedDataset {
        let raw_len = raw_records.len();
        let filtered: Vec<LabeledRecord> = raw_records
            .into_iter()
            .filter_map(Self::filter_record)
            .collect();

        if filtered.len() < raw_len {
            warn!(
                "Dropped {} records without a valid category",
                raw_len - filtered.len()
            );
        }

        let mut additions = Vec::new();
        for category in &self.config.minority_categories {
            let carriers: Vec<&LabeledRecord> =
                filtered.iter().filter(|r| r.has_category(category)).collect();
            let count = carriers.len();

            if count == 0 || count >= self.config.min_count {
                continue;
            }

            let mut rng = StdRng::seed_from_u64(self.config.seed);
            let n_samples = self.config.min_count - count;
            additions.extend(
                (0..n_samples).map(|_| carriers[rng.random_range(0..count)].clone()),
            );
            info!("Upsampled {category} from {count} to {} records", self.config.min_count);
        }

        let filtered_len = filtered.len();
        let mut records = filtered;
        records.extend(additions);

        let dataset = CuratedDataset {
            records,
            filtered_len,
        };
        info!("Category counts after cleaning: {:?}", dataset.category_counts());
        dataset
    }

    /// Keep taxonomy categories (first occurrence only); `None` when nothing is left.
    fn filter_record(mut record: LabeledRecord) -> Option<LabeledRecord> {
        let mut kept: Vec<String> = Vec::with_capacity(record.categories.len());
        for category in record.categories.drain(..) {
            if is_valid_category(&category) && !kept.contains(&category) {
                kept.push(category);
            }
        }
        record.categories = kept;
        (!record.categories.is_empty()).then_some(record)
    }
}

/// Curate with the default configuration.
pub fn curate(raw_records: Vec<LabeledRecord>) -> CuratedDataset {
    DatasetCurator::default().curate(raw_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn record(text: &str, categories: &[&str]) -> LabeledRecord {
        LabeledRecord::new(text, Language::En, categories)
    }

    fn count_with(dataset: &CuratedDataset, category: &str) -> usize {
        dataset
            .records()
            .iter()
            .filter(|r| r.has_category(category))
            .count()
    }

    #[test]
    fn test_filters_to_taxonomy() {
        let dataset = curate(vec![
            record("a", &["Payment", "NA", "Refund"]),
            record("b", &["NA"]),
            record("c", &["Operation", "Operation"]),
        ]);
        assert_eq!(dataset.filtered_len(), 2);
        assert_eq!(dataset.records()[0].categories, vec!["Payment"]);
        assert_eq!(dataset.records()[1].categories, vec!["Operation"]);
        assert!(dataset.upsampled().is_empty());
    }

    #[test]
    fn test_upsamples_minorities_to_min_count() {
        let mut raw = vec![
            record("late one", &["Delay"]),
            record("late two", &["Delay", "Courier Behavior"]),
            record("thanks", &["Positive Feedback"]),
        ];
        raw.extend((0..10).map(|i| record(&format!("pay {i}"), &["Payment"])));

        let dataset = curate(raw);
        assert_eq!(dataset.filtered_len(), 13);
        assert_eq!(count_with(&dataset, "Delay"), 200);
        assert_eq!(count_with(&dataset, "Positive Feedback"), 200);
        assert_eq!(dataset.len(), 13 + 198 + 199);

        // additions: Delay block first, then Positive Feedback
        let upsampled = dataset.upsampled();
        assert!(upsampled[..198].iter().all(|r| r.has_category("Delay")));
        assert!(upsampled[198..].iter().all(|r| r.text == "thanks"));
    }

    #[test]
    fn test_missing_minority_is_not_fabricated() {
        let dataset = curate(vec![record("late", &["Delay"]), record("pay", &["Payment"])]);
        assert_eq!(count_with(&dataset, "Positive Feedback"), 0);
        assert_eq!(count_with(&dataset, "Delay"), 200);
    }

    #[test]
    fn test_minority_at_threshold_is_untouched() {
        let raw: Vec<_> = (0..200).map(|i| record(&format!("late {i}"), &["Delay"])).collect();
        let dataset = curate(raw);
        assert_eq!(dataset.len(), 200);
        assert!(dataset.upsampled().is_empty());
    }

    #[test]
    fn test_counts_use_filtered_set() {
        // the Delay additions also carry Positive Feedback, which is already
        // counted from the filtered set before any upsampling happens
        let raw = vec![record("late but thanks", &["Delay", "Positive Feedback"])];
        let dataset = curate(raw);
        assert_eq!(dataset.len(), 1 + 199 + 199);
        assert_eq!(count_with(&dataset, "Positive Feedback"), 399);
    }

    #[test]
    fn test_deterministic() {
        let raw: Vec<_> = (0..5)
            .map(|i| record(&format!("late {i}"), &["Delay"]))
            .collect();
        let first = curate(raw.clone());
        let second = curate(raw);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_config() {
        let curator = DatasetCurator::new(CurationConfig {
            min_count: 4,
            minority_categories: vec!["Payment".to_string()],
            seed: 7,
        });
        let dataset = curator.curate(vec![record("pay", &["Payment"]), record("late", &["Delay"])]);
        assert_eq!(count_with(&dataset, "Payment"), 4);
        assert_eq!(count_with(&dataset, "Delay"), 1);
    }

    #[test]
    fn test_normalized_texts_use_recorded_language() {
        let dataset = curate(vec![
            LabeledRecord::new("  مُتَأَخِّر ", Language::Ar, &["Operation"]),
            LabeledRecord::new(" Late ", Language::En, &["Operation"]),
        ]);
        assert_eq!(dataset.normalized_texts(), vec!["متءخر", "Late"]);
    }
}
