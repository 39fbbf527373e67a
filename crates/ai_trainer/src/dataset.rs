//! Synthetic training data
//!
//! There is no field data: each disease in the table contributes a fixed
//! number of samples built from its primary symptoms plus a few random
//! noise symptoms.

use agrodx_ai_core::{FeatureSchema, PresenceVector, SymptomId};
use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::deterministic::{seeded_rng, DEFAULT_SEED};
use crate::errors::TrainerError;

/// Disease name -> primary symptom ids. Iterates in name order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiseaseTable(BTreeMap<String, Vec<SymptomId>>);

impl DiseaseTable {
    pub fn new(entries: BTreeMap<String, Vec<SymptomId>>) -> Self {
        Self(entries)
    }

    /// Load a table from a JSON object such as `{"Early Blight": [1, 2]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read disease table {}", path.as_ref().display())
        })?;
        let table: Self = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse disease table {}", path.as_ref().display())
        })?;
        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<SymptomId>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DiseaseTable {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("Early Blight".to_string(), vec![1, 2]),
            ("Late Blight".to_string(), vec![1, 2, 5]),
            ("Fusarium Wilt".to_string(), vec![2, 3]),
        ]))
    }
}

impl<S: Into<String>, const N: usize> From<[(S, Vec<SymptomId>); N]> for DiseaseTable {
    fn from(entries: [(S, Vec<SymptomId>); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(name, ids)| (name.into(), ids))
                .collect(),
        )
    }
}

/// Synthetic generation parameters
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub samples_per_disease: usize,
    pub max_symptom_id: SymptomId,
    /// Upper bound on extra random symptoms per sample
    pub noise_cap: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples_per_disease: 200,
            max_symptom_id: 20,
            noise_cap: 2,
            seed: DEFAULT_SEED,
        }
    }
}

/// Labeled presence vectors laid out by `schema`
#[derive(Clone, Debug)]
pub struct Dataset {
    pub schema: FeatureSchema,
    pub features: Vec<PresenceVector>,
    pub labels: Vec<String>,
}

impl Dataset {
    /// Generate samples for every disease in `table`
    pub fn generate(table: &DiseaseTable, config: &GeneratorConfig) -> Result<Self, TrainerError> {
        if table.is_empty() {
            return Err(TrainerError::Dataset("disease table is empty".to_string()));
        }
        if config.samples_per_disease == 0 {
            return Err(TrainerError::Dataset(
                "samples_per_disease must be positive".to_string(),
            ));
        }
        if config.max_symptom_id < 1 {
            return Err(TrainerError::Dataset(
                "max_symptom_id must be at least 1".to_string(),
            ));
        }

        let schema = FeatureSchema::for_symptom_range(config.max_symptom_id);
        let mut rng = seeded_rng(config.seed);
        let capacity = table.len() * config.samples_per_disease;
        let mut features = Vec::with_capacity(capacity);
        let mut labels = Vec::with_capacity(capacity);

        for (disease, primary) in table.iter() {
            let mut primary_idx = BTreeSet::new();
            for &id in primary {
                match schema.index_of(id) {
                    Some(idx) => {
                        primary_idx.insert(idx);
                    }
                    None => warn!(
                        "Primary symptom {} of '{}' is outside 1..={}; skipping it",
                        id, disease, config.max_symptom_id
                    ),
                }
            }

            let noise_pool: Vec<usize> = (0..schema.len())
                .filter(|idx| !primary_idx.contains(idx))
                .collect();
            let max_noise = config.noise_cap.min(noise_pool.len());

            for _ in 0..config.samples_per_disease {
                let mut row = vec![0u8; schema.len()];
                for &idx in &primary_idx {
                    row[idx] = 1;
                }

                let num_noise = rng.gen_range(0..=max_noise);
                for &idx in noise_pool.choose_multiple(&mut rng, num_noise) {
                    row[idx] = 1;
                }

                features.push(row);
                labels.push(disease.clone());
            }

            debug!(
                "Generated {} samples for '{}'",
                config.samples_per_disease, disease
            );
        }

        Ok(Self {
            schema,
            features,
            labels,
        })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Samples per disease name
    pub fn class_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
