//! The persisted model: vectorizer, classifier and label binarizer.
//!
//! # File layout
//!
//! All integers are little-endian.
//!
//! | field       | size | content                                   |
//! |-------------|------|-------------------------------------------|
//! | magic       | 4    | `TSNF`                                    |
//! | version     | 4    | [`FORMAT_VERSION`]                        |
//! | payload_len | 8    | byte length of the payload                |
//! | payload     | n    | bincode encoding of [`FeatureModelArtifact`] |
//! | checksum    | 4    | CRC-32 of the payload                     |
//!
//! Saving writes a sibling temporary file and renames it over the target, so
//! readers observe either the previous artifact or the new one.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasnifError};
use crate::ml::binarizer::LabelBinarizer;
use crate::ml::gbdt::BoosterParams;
use crate::ml::pipeline::FeatureModelPipeline;

pub const MAGIC: &[u8; 4] = b"TSNF";

pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 8;

/// Facts about the training run that produced an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub trained_at: DateTime<Utc>,
    /// Number of curated records the final model was fitted on.
    pub training_records: usize,
    pub best_params: BoosterParams,
    /// Mean cross-validated micro-F1 of `best_params`.
    pub cv_micro_f1: f64,
}

/// Everything inference needs, persisted as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureModelArtifact {
    pipeline: FeatureModelPipeline,
    binarizer: LabelBinarizer,
    metadata: ArtifactMetadata,
}

impl FeatureModelArtifact {
    pub fn new(
        pipeline: FeatureModelPipeline,
        binarizer: LabelBinarizer,
        metadata: ArtifactMetadata,
    ) -> Result<Self> {
        let artifact = Self {
            pipeline,
            binarizer,
            metadata,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// The classifier must have exactly one output per binarizer class.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.n_outputs() != self.binarizer.len() {
            return Err(TasnifError::artifact(format!(
                "classifier has {} outputs but the binarizer has {} classes",
                self.pipeline.n_outputs(),
                self.binarizer.len()
            )));
        }
        if self.binarizer.is_empty() {
            return Err(TasnifError::artifact("artifact has no categories"));
        }
        Ok(())
    }

    pub fn pipeline(&self) -> &FeatureModelPipeline {
        &self.pipeline
    }

    pub fn binarizer(&self) -> &LabelBinarizer {
        &self.binarizer
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Category names in classifier column order.
    pub fn categories(&self) -> &[String] {
        self.binarizer.classes()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| TasnifError::artifact(format!("Failed to encode artifact: {e}")))?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + 4);
        bytes.write_all(MAGIC)?;
        bytes.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        bytes.write_u64::<LittleEndian>(payload.len() as u64)?;
        bytes.write_all(&payload)?;
        bytes.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(bytes);

        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|_| TasnifError::artifact("file is too short to be an artifact"))?;
        if &magic != MAGIC {
            return Err(TasnifError::artifact("not a model artifact (bad magic)"));
        }

        let version = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        if version != FORMAT_VERSION {
            return Err(TasnifError::artifact(format!(
                "unsupported artifact version {version}, expected {FORMAT_VERSION}"
            )));
        }

        let payload_len = reader.read_u64::<LittleEndian>().map_err(truncated)? as usize;
        let available = bytes.len().saturating_sub(HEADER_LEN);
        if payload_len.checked_add(4) != Some(available) {
            return Err(TasnifError::artifact(format!(
                "payload length {payload_len} does not match file size"
            )));
        }
        let payload = &bytes[HEADER_LEN..HEADER_LEN + payload_len];
        reader.set_position((HEADER_LEN + payload_len) as u64);

        let expected = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let actual = crc32fast::hash(payload);
        if expected != actual {
            return Err(TasnifError::artifact(format!(
                "checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
            )));
        }

        let (artifact, _): (FeatureModelArtifact, usize) =
            bincode::serde::decode_from_slice(payload, bincode::config::standard())
                .map_err(|e| TasnifError::artifact(format!("Failed to decode artifact: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Atomically replace the artifact at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let temp_path = temp_path_for(path);

        let result = (|| -> Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        info!("Saved model artifact ({} bytes) to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| {
            TasnifError::artifact(format!("Failed to read {}: {e}", path.display()))
        })?;
        let artifact = Self::from_bytes(&bytes)?;
        info!(
            "Loaded model artifact from {} (trained {}, {} categories)",
            path.display(),
            artifact.metadata.trained_at,
            artifact.binarizer.len()
        );
        Ok(artifact)
    }
}

fn truncated(_: std::io::Error) -> TasnifError {
    TasnifError::artifact("artifact is truncated")
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VectorizerConfig;
    use tempfile::TempDir;

    fn small_artifact() -> FeatureModelArtifact {
        let texts: Vec<String> = (0..12)
            .map(|i| {
                if i % 2 == 0 {
                    format!("parcel late {i}")
                } else {
                    format!("refund please {i}")
                }
            })
            .collect();
        let labels: Vec<Vec<&str>> = (0..12)
            .map(|i| if i % 2 == 0 { vec!["Delay"] } else { vec!["Refund"] })
            .collect();
        let mut binarizer = LabelBinarizer::new();
        let y = binarizer.fit_transform(&labels);
        let params = BoosterParams {
            n_estimators: 5,
            ..Default::default()
        };
        let pipeline =
            FeatureModelPipeline::fit(&texts, &y, VectorizerConfig::default(), params).unwrap();
        let metadata = ArtifactMetadata {
            trained_at: Utc::now(),
            training_records: texts.len(),
            best_params: params,
            cv_micro_f1: 1.0,
        };
        FeatureModelArtifact::new(pipeline, binarizer, metadata).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.bin");
        let artifact = small_artifact();
        artifact.save(&path).unwrap();
        assert!(!temp_path_for(&path).exists());

        let loaded = FeatureModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.categories(), &["Delay", "Refund"]);
        assert_eq!(loaded.metadata(), artifact.metadata());
        assert_eq!(
            loaded.pipeline().predict_proba_one("late parcel").unwrap(),
            artifact.pipeline().predict_proba_one("late parcel").unwrap()
        );
    }

    #[test]
    fn test_rejects_corruption() {
        let mut bytes = small_artifact().to_bytes().unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0xFF;
        let err = FeatureModelArtifact::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_rejects_bad_header() {
        assert!(FeatureModelArtifact::from_bytes(b"").is_err());
        assert!(FeatureModelArtifact::from_bytes(b"JUNKJUNKJUNK").is_err());

        let mut bytes = small_artifact().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(FeatureModelArtifact::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = FeatureModelArtifact::load(&temp_dir.path().join("absent.bin"));
        assert!(matches!(result, Err(TasnifError::Artifact(_))));
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let artifact = small_artifact();
        let wider = LabelBinarizer::from(vec![
            "Delay".to_string(),
            "Payment".to_string(),
            "Refund".to_string(),
        ]);
        let result = FeatureModelArtifact::new(
            artifact.pipeline().clone(),
            wider,
            artifact.metadata().clone(),
        );
        assert!(result.is_err());
    }
}
