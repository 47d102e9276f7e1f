//! Labeled corpus records and dataset file utilities.
//!
//! The corpus is a JSON array of objects:
//!
//! ```json
//! [{"text": "Parcel arrived late", "language": "en", "categories": ["Delay"]}]
//! ```

pub mod curator;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasnifError};
use crate::language::Language;

pub use curator::{CuratedDataset, DatasetCurator, curate};

/// Label the raw corpus uses for "no applicable category".
pub const SENTINEL_LABEL: &str = "NA";

/// One labeled training message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Raw message text.
    pub text: String,
    /// Language recorded by the annotator.
    pub language: Language,
    /// Assigned categories.
    pub categories: Vec<String>,
}

impl LabeledRecord {
    pub fn new<S: Into<String>>(text: S, language: Language, categories: &[&str]) -> Self {
        Self {
            text: text.into(),
            language,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether this record carries `category`.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Load a JSON corpus.
pub fn load_records(path: &Path) -> Result<Vec<LabeledRecord>> {
    let file = File::open(path).map_err(|e| {
        TasnifError::dataset(format!("Failed to open dataset {}: {e}", path.display()))
    })?;
    let records: Vec<LabeledRecord> = serde_json::from_reader(BufReader::new(file))?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write a corpus as pretty-printed JSON, keeping non-ASCII text readable.
pub fn save_records(path: &Path, records: &[LabeledRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Remove `sentinel` from every record's categories and drop records left
/// without any category. Returns the kept records and the number removed.
pub fn strip_sentinel(records: Vec<LabeledRecord>, sentinel: &str) -> (Vec<LabeledRecord>, usize) {
    let total = records.len();
    let cleaned: Vec<LabeledRecord> = records
        .into_iter()
        .filter_map(|mut record| {
            record.categories.retain(|c| c != sentinel);
            (!record.categories.is_empty()).then_some(record)
        })
        .collect();
    let removed = total - cleaned.len();
    (cleaned, removed)
}

/// Strip the [`SENTINEL_LABEL`] from a dataset file, rewriting it in place.
/// Returns the number of records removed.
pub fn clean_file(path: &Path) -> Result<usize> {
    let records = load_records(path)?;
    let (cleaned, removed) = strip_sentinel(records, SENTINEL_LABEL);
    save_records(path, &cleaned)?;
    info!(
        "Cleaned data saved to {}. {removed} entries removed.",
        path.display()
    );
    Ok(removed)
}
