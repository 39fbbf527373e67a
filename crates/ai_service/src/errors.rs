//! AI Service error types

use agrodx_ai_core::AiCoreError;
use thiserror::Error;

/// Errors surfaced by the prediction service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Artifacts failed to load at startup; permanent until restart
    #[error("AI service is not ready. ML model or preprocessing artifacts failed to load: {0}")]
    NotReady(String),

    /// Request body missing, malformed or incomplete
    #[error("{0}")]
    InvalidRequest(String),

    /// Classifier or label decoding failed for this request
    #[error("Error during prediction: {0}")]
    Prediction(#[from] AiCoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}
