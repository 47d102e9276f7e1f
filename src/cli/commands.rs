//! Command implementations for the tasnif CLI.

use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::clean_file;
use crate::error::Result;
use crate::service::ServiceContext;
use crate::training::Trainer;

/// Execute a CLI command.
pub fn execute_command(args: TasnifArgs) -> Result<()> {
    match &args.command {
        Command::Train => train(&args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Evaluate => evaluate(&args),
        Command::Clean(clean_args) => clean(clean_args, &args),
    }
}

/// Train and persist a new model.
fn train(cli_args: &TasnifArgs) -> Result<()> {
    let config = cli_args.load_config()?;
    let start = Instant::now();
    let artifact = Trainer::new(config.clone()).run()?;
    let metadata = artifact.metadata();

    output_result(
        "Training completed",
        &TrainingSummary {
            artifact_path: config.artifact_path.display().to_string(),
            trained_at: metadata.trained_at,
            training_records: metadata.training_records,
            categories: artifact.categories().to_vec(),
            vocabulary_size: artifact.pipeline().vectorizer().vocabulary_size(),
            best_params: metadata.best_params,
            cv_micro_f1: metadata.cv_micro_f1,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify messages given on the command line.
fn predict(args: &PredictArgs, cli_args: &TasnifArgs) -> Result<()> {
    let context = ServiceContext::bootstrap(cli_args.load_config()?)?;
    let classifier = context.classifier();

    let outputs: Vec<PredictionOutput> = args
        .texts
        .iter()
        .map(|text| {
            let result = classifier.predict(text);
            PredictionOutput {
                text: text.clone(),
                categories: result.categories,
                language: result.language,
            }
        })
        .collect();
    info!("Classified {} messages", outputs.len());

    output_result("Predictions", &outputs, cli_args)
}

/// Evaluate the model on the configured dataset.
fn evaluate(cli_args: &TasnifArgs) -> Result<()> {
    let context = ServiceContext::bootstrap(cli_args.load_config()?)?;
    let response = context.evaluate()?;
    output_result("Classification report", &response, cli_args)
}

/// Strip the sentinel label from a dataset file.
fn clean(args: &CleanArgs, cli_args: &TasnifArgs) -> Result<()> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => cli_args.load_config()?.dataset_path,
    };
    let removed = clean_file(&path)?;

    output_result(
        "Dataset cleaned",
        &CleanSummary {
            path: path.display().to_string(),
            records_removed: removed,
        },
        cli_args,
    )
}
