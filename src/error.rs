//! Error types for the Tasnif library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`TasnifError`] enum. Inference itself never fails on user input; errors
//! come from loading data, fitting the model, or reading and writing the
//! persisted artifact.
//!
//! # Examples
//!
//! ```
//! use tasnif::error::{Result, TasnifError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TasnifError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::ml::MLError;

/// The main error type for Tasnif operations.
#[derive(Error, Debug)]
pub enum TasnifError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Dataset loading or cleaning errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Analysis-related errors (tokenization, normalization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Training failures. Training aborts and nothing is persisted.
    #[error("Training error: {0}")]
    Training(String),

    /// Learning algorithm errors
    #[error("Model error: {0}")]
    Model(#[from] MLError),

    /// Persisted artifact is missing, corrupted or inconsistent
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with TasnifError.
pub type Result<T> = std::result::Result<T, TasnifError>;

impl TasnifError {
    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        TasnifError::Dataset(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TasnifError::Analysis(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        TasnifError::Training(msg.into())
    }

    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        TasnifError::Artifact(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TasnifError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TasnifError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
