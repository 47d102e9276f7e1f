//! Command line argument parsing for the tasnif CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::TasnifConfig;
use crate::error::Result;

/// Tasnif - multi-label feedback classifier for English and Arabic
#[derive(Parser, Debug, Clone)]
#[command(name = "tasnif")]
#[command(about = "Multi-label complaint and feedback classifier for English and Arabic text")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TasnifArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, env = "TASNIF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Labeled dataset path
    #[arg(long, env = "TASNIF_DATASET", global = true)]
    pub dataset: Option<PathBuf>,

    /// Model artifact path
    #[arg(long, env = "TASNIF_MODEL", global = true)]
    pub model: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TasnifArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Configuration from `--config` (or defaults) with path flags applied.
    pub fn load_config(&self) -> Result<TasnifConfig> {
        let mut config = match &self.config {
            Some(path) => TasnifConfig::from_file(path)?,
            None => TasnifConfig::default(),
        };
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(model) = &self.model {
            config.artifact_path = model.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train on the dataset and overwrite the model artifact
    Train,

    /// Classify one or more messages
    Predict(PredictArgs),

    /// Score the model against the curated dataset
    Evaluate,

    /// Remove the "NA" label from a dataset file in place
    Clean(CleanArgs),
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Messages to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Arguments for dataset cleaning
#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    /// Dataset file to rewrite (defaults to the configured dataset)
    #[arg(value_name = "DATASET_FILE")]
    pub path: Option<PathBuf>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let args = TasnifArgs::parse_from(["tasnif", "-vv", "predict", "late parcel", "جيد"]);
        assert_eq!(args.verbosity(), 2);
        match args.command {
            Command::Predict(predict) => assert_eq!(predict.texts, vec!["late parcel", "جيد"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = TasnifArgs::parse_from(["tasnif", "train", "-v", "-q"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_path_overrides() {
        let args = TasnifArgs::parse_from([
            "tasnif",
            "--format",
            "json",
            "--model",
            "/tmp/m.bin",
            "evaluate",
        ]);
        assert_eq!(args.output_format, OutputFormat::Json);
        let config = args.load_config().unwrap();
        assert_eq!(config.artifact_path, PathBuf::from("/tmp/m.bin"));
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(TasnifArgs::try_parse_from(["tasnif", "predict"]).is_err());
    }
}
