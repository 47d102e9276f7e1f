//! Output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TasnifArgs};
use crate::error::Result;
use crate::evaluation::EvaluationResponse;
use crate::inference::DisplayLanguage;
use crate::ml::gbdt::BoosterParams;

/// Plain-text rendering used by the human output format.
pub trait HumanReadable {
    fn render_human(&self) -> String;
}

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub artifact_path: String,
    pub trained_at: DateTime<Utc>,
    pub training_records: usize,
    pub categories: Vec<String>,
    pub vocabulary_size: usize,
    pub best_params: BoosterParams,
    pub cv_micro_f1: f64,
    pub duration_ms: u64,
}

impl HumanReadable for TrainingSummary {
    fn render_human(&self) -> String {
        format!(
            "Model:        {}\n\
             Records:      {}\n\
             Categories:   {}\n\
             Vocabulary:   {}\n\
             Parameters:   {}\n\
             CV micro-F1:  {:.4}\n\
             Duration:     {} ms",
            self.artifact_path,
            self.training_records,
            self.categories.join(", "),
            self.vocabulary_size,
            self.best_params,
            self.cv_micro_f1,
            self.duration_ms
        )
    }
}

/// One classified message.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub text: String,
    pub categories: Vec<String>,
    pub language: DisplayLanguage,
}

impl HumanReadable for Vec<PredictionOutput> {
    fn render_human(&self) -> String {
        self.iter()
            .map(|p| {
                let categories = if p.categories.is_empty() {
                    "-".to_string()
                } else {
                    p.categories.join(", ")
                };
                format!("{:?}\t[{categories}]\t{}", p.language, p.text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl HumanReadable for EvaluationResponse {
    fn render_human(&self) -> String {
        self.report.trim_end().to_string()
    }
}

/// Result structure for dataset cleaning.
#[derive(Debug, Serialize, Deserialize)]
pub struct CleanSummary {
    pub path: String,
    pub records_removed: usize,
}

impl HumanReadable for CleanSummary {
    fn render_human(&self) -> String {
        format!("Cleaned data saved to {}. {} entries removed.", self.path, self.records_removed)
    }
}

/// Output a result in the requested format.
pub fn output_result<T>(message: &str, result: &T, args: &TasnifArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            println!("{}", result.render_human());
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}
