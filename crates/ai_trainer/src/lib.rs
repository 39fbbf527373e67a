//! AgroDx AI Trainer - offline disease classifier trainer
//!
//! Generates synthetic symptom data from a disease table, fits a decision
//! tree on it and writes the artifacts the prediction service loads.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod trainer;

use agrodx_ai_core::SavedArtifacts;
use std::path::Path;

pub use cart::{CartBuilder, TreeConfig};
pub use dataset::{Dataset, DiseaseTable, GeneratorConfig};
pub use deterministic::{seeded_rng, SplitTieBreaker, DEFAULT_SEED};
pub use errors::TrainerError;
pub use trainer::{DiseaseTrainer, TrainingParams, TrainingReport};

/// Train on `table` and save the resulting artifacts into `output`.
pub fn train_and_save(
    table: &DiseaseTable,
    params: TrainingParams,
    output: &Path,
) -> Result<(SavedArtifacts, TrainingReport), TrainerError> {
    let (artifacts, report) = DiseaseTrainer::new(params).train(table)?;
    let saved = artifacts.save(output)?;
    Ok((saved, report))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
