//! Prediction backends and the service context shared by request handlers
//!
//! The context is built once at startup and never mutated. A failed artifact
//! load leaves it in the `NotReady` state until the process restarts.

use agrodx_ai_core::{DiseasePredictor, ModelArtifacts, SymptomId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{BackendMode, ServiceConfig};
use crate::errors::ServiceError;
use crate::rules::{PlantId, RuleTable};

/// Body of `POST /predict`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptom_ids: Option<Vec<SymptomId>>,
    /// Only consulted by the rule backend
    #[serde(default)]
    pub plant_id: Option<PlantId>,
}

impl PredictRequest {
    /// Non-empty symptom list, or the request-layer rejection
    pub fn symptom_ids(&self) -> Result<&[SymptomId], ServiceError> {
        match self.symptom_ids.as_deref() {
            Some(ids) if !ids.is_empty() => Ok(ids),
            _ => Err(ServiceError::InvalidRequest(
                "Invalid input. 'symptom_ids' (non-empty array of integers) are required."
                    .to_string(),
            )),
        }
    }
}

/// What a backend knows about itself, for health reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub mode: BackendMode,
    pub classes: usize,
    pub features: usize,
}

/// A source of disease predictions
pub trait PredictionBackend: Send + Sync {
    fn info(&self) -> BackendInfo;

    /// `Ok(None)` means no prediction is possible for this input
    fn predict(&self, request: &PredictRequest) -> Result<Option<String>, ServiceError>;
}

/// Learned decision-tree backend
pub struct ModelBackend {
    predictor: DiseasePredictor,
}

impl ModelBackend {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            predictor: DiseasePredictor::new(artifacts),
        }
    }
}

impl PredictionBackend for ModelBackend {
    fn info(&self) -> BackendInfo {
        let artifacts = self.predictor.artifacts();
        BackendInfo {
            mode: BackendMode::Model,
            classes: artifacts.labels.len(),
            features: artifacts.schema.len(),
        }
    }

    fn predict(&self, request: &PredictRequest) -> Result<Option<String>, ServiceError> {
        let ids = request.symptom_ids()?;
        let prediction = self.predictor.predict(ids.iter().copied())?;
        if !prediction.ignored_symptoms.is_empty() {
            warn!(
                "Ignored symptom ids unknown to the model: {:?}",
                prediction.ignored_symptoms
            );
        }
        Ok(prediction.disease)
    }
}

/// Static rule-table backend
#[derive(Default)]
pub struct RuleBackend {
    table: RuleTable,
}

impl RuleBackend {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }
}

impl PredictionBackend for RuleBackend {
    fn info(&self) -> BackendInfo {
        BackendInfo {
            mode: BackendMode::Rules,
            classes: self.table.len(),
            features: 0,
        }
    }

    fn predict(&self, request: &PredictRequest) -> Result<Option<String>, ServiceError> {
        let plant_id = match request.plant_id {
            Some(id) if id != 0 => id,
            _ => {
                return Err(ServiceError::InvalidRequest(
                    "Missing plant_id or symptom_ids".to_string(),
                ))
            }
        };
        let ids = request
            .symptom_ids()
            .map_err(|_| ServiceError::InvalidRequest("Missing plant_id or symptom_ids".to_string()))?;

        let disease = self.table.lookup(plant_id, ids.iter().copied());
        if disease.is_none() {
            let mut sorted = ids.to_vec();
            sorted.sort_unstable();
            info!(
                "No prediction rule for plant_id={}, symptom_ids={:?}",
                plant_id, sorted
            );
        }
        Ok(disease.map(str::to_string))
    }
}

/// Immutable state injected into every request handler
pub enum ServiceContext {
    Ready(Arc<dyn PredictionBackend>),
    NotReady { reason: String },
}

impl ServiceContext {
    /// Build the context for `config`, capturing load failures
    pub fn from_config(config: &ServiceConfig) -> Self {
        match config.mode {
            BackendMode::Rules => {
                info!("Serving predictions from the static rule table");
                Self::Ready(Arc::new(RuleBackend::default()))
            }
            BackendMode::Model => match ModelArtifacts::load(&config.artifacts_dir) {
                Ok(artifacts) => {
                    info!(
                        "Model loaded; expected features: {:?}",
                        artifacts.schema.columns()
                    );
                    Self::Ready(Arc::new(ModelBackend::new(artifacts)))
                }
                Err(err) => {
                    error!("Error loading ML model or preprocessing artifacts: {}", err);
                    error!(
                        "Run `agrodx-train --output {}` first to generate them",
                        config.artifacts_dir.display()
                    );
                    Self::NotReady {
                        reason: err.to_string(),
                    }
                }
            },
        }
    }

    pub fn backend(&self) -> Result<&Arc<dyn PredictionBackend>, ServiceError> {
        match self {
            Self::Ready(backend) => Ok(backend),
            Self::NotReady { reason } => Err(ServiceError::NotReady(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
