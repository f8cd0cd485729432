//! Error types and exit codes for pcos-risk

use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssessmentError {
    #[error("Invalid input: {field} {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

impl AssessmentError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// - 1: file could not be read
    /// - 2: input rejected (malformed or out of domain)
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io { .. } => ExitCode::from(1),
            Self::InvalidInput { .. } | Self::Json(_) | Self::Csv(_) => ExitCode::from(2),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssessmentError>;
