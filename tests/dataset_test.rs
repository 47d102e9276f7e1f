use std::fs;

use tasnif::dataset::{LabeledRecord, clean_file, curate, load_records, save_records};
use tasnif::error::Result;
use tasnif::language::Language;
use tempfile::TempDir;

#[test]
fn test_clean_file_rewrites_in_place() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(
        &path,
        r#"[
            {"text": "late", "language": "en", "categories": ["Delay", "NA"]},
            {"text": "nothing", "language": "en", "categories": ["NA"]},
            {"text": "شكرا", "language": "ar", "categories": ["Positive Feedback"]}
        ]"#,
    )?;

    assert_eq!(clean_file(&path)?, 1);

    let records = load_records(&path)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].categories, vec!["Delay"]);
    assert_eq!(records[1].language, Language::Ar);
    // Arabic text is written as-is, not escaped
    assert!(fs::read_to_string(&path)?.contains("شكرا"));

    // running again removes nothing
    assert_eq!(clean_file(&path)?, 0);
    Ok(())
}

#[test]
fn test_saved_corpus_curates_like_in_memory() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let records = vec![
        LabeledRecord::new("parcel late", Language::En, &["Delay"]),
        LabeledRecord::new("rude driver", Language::En, &["Courier Behavior", "NA"]),
    ];
    save_records(&path, &records)?;

    let loaded = curate(load_records(&path)?);
    let direct = curate(records);
    assert_eq!(loaded, direct);
    assert_eq!(loaded.category_counts()["Delay"], 200);
    Ok(())
}

#[test]
fn test_malformed_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, r#"[{"text": "late"}]"#).unwrap();
    assert!(load_records(&path).is_err());
}
