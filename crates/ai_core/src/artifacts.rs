//! Model artifact persistence
//!
//! A trained model is stored as three canonical JSON files plus a BLAKE3
//! digest of the model file:
//!
//! - `model.json`: the decision tree
//! - `label_encoder.json`: the fitted class list
//! - `feature_columns.json`: the ordered feature schema (plain JSON array)
//! - `model.hash`: hex digest of `model.json`

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{AiCoreError, Result};
use crate::labels::LabelEncoder;
use crate::schema::FeatureSchema;
use crate::serialization::{canonical_json_string, content_hash_hex};
use crate::tree::DecisionTree;

pub const MODEL_FILE: &str = "model.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const MODEL_HASH_FILE: &str = "model.hash";

/// Everything the serving process needs to predict
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub model: DecisionTree,
    pub labels: LabelEncoder,
    pub schema: FeatureSchema,
}

/// Paths written by [`ModelArtifacts::save`]
#[derive(Debug, Clone)]
pub struct SavedArtifacts {
    pub model_path: PathBuf,
    pub label_encoder_path: PathBuf,
    pub feature_columns_path: PathBuf,
    pub hash_path: PathBuf,
    pub model_hash: String,
}

impl ModelArtifacts {
    pub fn new(model: DecisionTree, labels: LabelEncoder, schema: FeatureSchema) -> Result<Self> {
        let artifacts = Self {
            model,
            labels,
            schema,
        };
        artifacts.check_consistency()?;
        Ok(artifacts)
    }

    /// Write all artifacts into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<SavedArtifacts> {
        fs::create_dir_all(dir).map_err(|source| AiCoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let model_json = canonical_json_string(&self.model)?;
        let model_hash = content_hash_hex(model_json.as_bytes());

        let saved = SavedArtifacts {
            model_path: dir.join(MODEL_FILE),
            label_encoder_path: dir.join(LABEL_ENCODER_FILE),
            feature_columns_path: dir.join(FEATURE_COLUMNS_FILE),
            hash_path: dir.join(MODEL_HASH_FILE),
            model_hash,
        };

        write_file(&saved.model_path, &model_json)?;
        write_file(
            &saved.label_encoder_path,
            &canonical_json_string(&self.labels)?,
        )?;
        write_file(
            &saved.feature_columns_path,
            &canonical_json_string(&self.schema)?,
        )?;
        write_file(&saved.hash_path, &saved.model_hash)?;

        info!("Model artifacts saved to {}", dir.display());
        Ok(saved)
    }

    /// Load artifacts from `dir`, verifying the model digest when present
    pub fn load(dir: &Path) -> Result<Self> {
        let model_path = dir.join(MODEL_FILE);
        let model_json = read_file(&model_path)?;
        let model: DecisionTree = serde_json::from_str(&model_json)?;

        let hash_path = dir.join(MODEL_HASH_FILE);
        if hash_path.exists() {
            let expected = read_file(&hash_path)?.trim().to_owned();
            let actual = content_hash_hex(model_json.as_bytes());
            if !actual.eq_ignore_ascii_case(&expected) {
                return Err(AiCoreError::HashMismatch { expected, actual });
            }
            debug!("Model hash verified: {}", actual);
        }

        let labels: LabelEncoder = read_json(&dir.join(LABEL_ENCODER_FILE))?;
        let schema: FeatureSchema = read_json(&dir.join(FEATURE_COLUMNS_FILE))?;

        let artifacts = Self::new(model, labels, schema)?;
        info!(
            "Loaded model from {} ({} classes, {} features)",
            dir.display(),
            artifacts.labels.len(),
            artifacts.schema.len()
        );
        Ok(artifacts)
    }

    fn check_consistency(&self) -> Result<()> {
        self.model.validate()?;

        if self.schema.is_empty() {
            return Err(AiCoreError::ArtifactMismatch(
                "feature schema is empty".to_string(),
            ));
        }
        if self.model.n_features != self.schema.len() {
            return Err(AiCoreError::ArtifactMismatch(format!(
                "model expects {} features, schema has {} columns",
                self.model.n_features,
                self.schema.len()
            )));
        }
        if self.model.n_classes != self.labels.len() {
            return Err(AiCoreError::ArtifactMismatch(format!(
                "model has {} classes, label encoder has {}",
                self.model.n_classes,
                self.labels.len()
            )));
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| AiCoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| AiCoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
