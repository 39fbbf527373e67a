//! Integration tests for the disease trainer
//!
//! Trains on synthetic tables, saves the artifacts, reloads them and checks
//! predictions through the same path the service uses.

use agrodx_ai_core::{DiseasePredictor, ModelArtifacts};
use agrodx_ai_trainer::{
    train_and_save, DiseaseTable, DiseaseTrainer, GeneratorConfig, TrainingParams, TreeConfig,
};
use anyhow::Result;
use std::fs;
use tempfile::tempdir;

fn params(samples_per_disease: usize) -> TrainingParams {
    TrainingParams {
        generator: GeneratorConfig {
            samples_per_disease,
            ..GeneratorConfig::default()
        },
        tree: TreeConfig::default(),
    }
}

#[test]
fn test_single_disease_predicts_itself() -> Result<()> {
    let table = DiseaseTable::from([("Early Blight", vec![1, 2])]);
    let (artifacts, report) = DiseaseTrainer::new(params(200)).train(&table)?;

    assert_eq!(report.classes, vec!["Early Blight"]);
    let predictor = DiseasePredictor::new(artifacts);
    let prediction = predictor.predict([1, 2])?;
    assert_eq!(prediction.disease.as_deref(), Some("Early Blight"));
    Ok(())
}

#[test]
fn test_primary_only_samples_mostly_correct() -> Result<()> {
    let table = DiseaseTable::default();
    let (artifacts, _) = DiseaseTrainer::new(params(200)).train(&table)?;
    let predictor = DiseasePredictor::new(artifacts);

    for (disease, primary) in table.iter() {
        let prediction = predictor.predict(primary.iter().copied())?;
        assert_eq!(
            prediction.disease.as_deref(),
            Some(disease.as_str()),
            "primary symptoms {:?} should predict {}",
            primary,
            disease
        );
    }
    Ok(())
}

#[test]
fn test_saved_artifacts_reload_identically() -> Result<()> {
    let dir = tempdir()?;
    let table = DiseaseTable::default();

    let (saved, _) = train_and_save(&table, params(100), dir.path())?;
    let loaded = ModelArtifacts::load(dir.path())?;
    let (retrained, _) = DiseaseTrainer::new(params(100)).train(&table)?;

    assert_eq!(loaded, retrained);
    assert_eq!(
        fs::read_to_string(&saved.hash_path)?.trim(),
        saved.model_hash
    );
    Ok(())
}

#[test]
fn test_deterministic_artifact_bytes() -> Result<()> {
    let dir1 = tempdir()?;
    let dir2 = tempdir()?;
    let table = DiseaseTable::default();

    let (saved1, _) = train_and_save(&table, params(80), dir1.path())?;
    let (saved2, _) = train_and_save(&table, params(80), dir2.path())?;

    assert_eq!(saved1.model_hash, saved2.model_hash);
    assert_eq!(
        fs::read(&saved1.model_path)?,
        fs::read(&saved2.model_path)?
    );
    assert_eq!(
        fs::read(&saved1.label_encoder_path)?,
        fs::read(&saved2.label_encoder_path)?
    );
    Ok(())
}

#[test]
fn test_unknown_symptoms_do_not_change_prediction() -> Result<()> {
    let (artifacts, _) = DiseaseTrainer::new(params(100)).train(&DiseaseTable::default())?;
    let predictor = DiseasePredictor::new(artifacts);

    let clean = predictor.predict([2, 3])?;
    let noisy = predictor.predict([2, 3, 400, -1])?;
    assert_eq!(clean.disease, noisy.disease);
    assert_eq!(noisy.ignored_symptoms, vec![-1, 400]);
    Ok(())
}
