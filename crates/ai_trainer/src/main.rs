//! AgroDx Trainer CLI
//!
//! Generates synthetic training data, fits the disease classifier and
//! writes the model artifacts consumed by the prediction service.

use agrodx_ai_trainer::{
    train_and_save, DiseaseTable, GeneratorConfig, TrainingParams, TreeConfig,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "agrodx-train")]
#[command(author = "AgroDx Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train the AgroDx disease classifier on synthetic data", long_about = None)]
struct Args {
    /// Output directory for model artifacts
    #[arg(short, long, default_value = "artifacts")]
    output: PathBuf,

    /// JSON disease table (`{"Disease": [symptom ids]}`); built-in table if omitted
    #[arg(short, long)]
    diseases: Option<PathBuf>,

    /// Synthetic samples generated per disease
    #[arg(long, default_value = "200")]
    samples_per_disease: usize,

    /// Highest symptom id in the feature schema
    #[arg(long, default_value = "20")]
    max_symptom_id: i64,

    /// Maximum number of random noise symptoms per sample
    #[arg(long, default_value = "2")]
    noise_cap: usize,

    /// Random seed for generation and tie-breaking
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Maximum tree depth (unlimited if omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum samples per leaf
    #[arg(long, default_value = "1")]
    min_samples_leaf: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("AgroDx Disease Trainer v{}", env!("CARGO_PKG_VERSION"));

    let table = match &args.diseases {
        Some(path) => {
            info!("Loading disease table from: {}", path.display());
            DiseaseTable::from_json_file(path)?
        }
        None => DiseaseTable::default(),
    };

    for (disease, primary) in table.iter() {
        info!("  {}: primary symptoms {:?}", disease, primary);
    }

    let params = TrainingParams {
        generator: GeneratorConfig {
            samples_per_disease: args.samples_per_disease,
            max_symptom_id: args.max_symptom_id,
            noise_cap: args.noise_cap,
            seed: args.seed,
        },
        tree: TreeConfig {
            max_depth: args.max_depth,
            min_samples_leaf: args.min_samples_leaf,
            seed: args.seed,
            ..TreeConfig::default()
        },
    };

    info!("Training configuration:");
    info!("  Samples per disease: {}", params.generator.samples_per_disease);
    info!("  Max symptom id: {}", params.generator.max_symptom_id);
    info!("  Noise cap: {}", params.generator.noise_cap);
    info!("  Seed: {}", args.seed);
    match params.tree.max_depth {
        Some(depth) => info!("  Max depth: {}", depth),
        None => info!("  Max depth: unlimited"),
    }

    let (saved, report) = train_and_save(&table, params, &args.output)
        .context("Training failed")?;

    info!("Encoded diseases:");
    for (idx, class) in report.classes.iter().enumerate() {
        info!("  {}: {}", idx, class);
    }
    info!(
        "Training accuracy: {}/{} samples",
        report.training_correct, report.samples
    );
    for disease in report.primary_mismatches() {
        warn!(
            "Primary symptoms of '{}' predict '{}'",
            disease, report.primary_only[disease]
        );
    }

    info!("✓ Training completed successfully");
    info!("  Model: {}", saved.model_path.display());
    info!("  Label encoder: {}", saved.label_encoder_path.display());
    info!("  Feature columns: {}", saved.feature_columns_path.display());
    info!("  Hash: {} ({})", saved.hash_path.display(), saved.model_hash);

    Ok(())
}
