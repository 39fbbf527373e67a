use agrodx_ai_core::AiCoreError;
use thiserror::Error;

/// Errors returned by the disease trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("training error: {0}")]
    Training(String),

    #[error(transparent)]
    Core(#[from] AiCoreError),
}
