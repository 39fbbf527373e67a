//! Error types for the AI Core module

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or loading models
#[derive(Error, Debug)]
pub enum AiCoreError {
    /// Feature schema contains the same column twice
    #[error("Duplicate feature column: {0}")]
    DuplicateFeature(String),

    /// Label encoder fitted on no labels
    #[error("Cannot fit a label encoder on an empty label set")]
    EmptyLabelSet,

    /// Disease name was never seen while fitting
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Classifier produced an index the label encoder does not know
    #[error("Class index {index} is out of range (fitted classes: {classes})")]
    ClassIndexOutOfRange { index: usize, classes: usize },

    /// Feature vector does not match the model input width
    #[error("Feature vector has length {actual}, model expects {expected}")]
    FeatureLengthMismatch { expected: usize, actual: usize },

    /// Decision tree structure is broken
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Artifacts disagree with each other
    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// Stored model digest does not match the model contents
    #[error("Model hash mismatch: expected {expected}, computed {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Artifact file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for AI Core operations
pub type Result<T> = std::result::Result<T, AiCoreError>;
