//! Disease classifier trainer
//!
//! Runs the full offline pipeline: synthetic generation, label encoding,
//! tree induction, and a self-check on the training data.

use agrodx_ai_core::{encode_symptoms, LabelEncoder, ModelArtifacts};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cart::{CartBuilder, TreeConfig};
use crate::dataset::{Dataset, DiseaseTable, GeneratorConfig};
use crate::errors::TrainerError;

/// Full training configuration
#[derive(Clone, Debug, Default)]
pub struct TrainingParams {
    pub generator: GeneratorConfig,
    pub tree: TreeConfig,
}

/// Summary of a training run
#[derive(Clone, Debug, Serialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub classes: Vec<String>,
    pub node_count: usize,
    pub leaf_count: usize,
    pub depth: usize,
    /// Training samples the fitted tree classifies correctly
    pub training_correct: usize,
    /// Prediction for each disease's primary symptoms with no noise
    pub primary_only: BTreeMap<String, String>,
}

impl TrainingReport {
    /// Diseases whose noise-free primary symptoms predict a different disease
    pub fn primary_mismatches(&self) -> Vec<&str> {
        self.primary_only
            .iter()
            .filter(|(disease, predicted)| disease != predicted)
            .map(|(disease, _)| disease.as_str())
            .collect()
    }
}

/// Decision tree trainer over a synthetic disease table
pub struct DiseaseTrainer {
    params: TrainingParams,
}

impl DiseaseTrainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    /// Generate data for `table`, fit the label encoder and the tree
    pub fn train(
        &self,
        table: &DiseaseTable,
    ) -> Result<(ModelArtifacts, TrainingReport), TrainerError> {
        let dataset = Dataset::generate(table, &self.params.generator)?;
        info!(
            "Generated {} synthetic samples over {} features",
            dataset.len(),
            dataset.schema.len()
        );

        let labels = LabelEncoder::fit(&dataset.labels)?;
        for (idx, class) in labels.classes().iter().enumerate() {
            debug!("  {}: {}", idx, class);
        }
        let targets = labels.encode_all(&dataset.labels)?;

        let builder = CartBuilder::new(
            &dataset.features,
            &targets,
            labels.len(),
            self.params.tree.clone(),
        )?;
        let model = builder.build();
        info!(
            "Tree built: {} nodes, {} leaves, depth {}",
            model.nodes.len(),
            model.leaf_count(),
            model.depth()
        );

        let mut training_correct = 0;
        for (row, &target) in dataset.features.iter().zip(&targets) {
            if model.predict(row)? == target {
                training_correct += 1;
            }
        }

        let mut primary_only = BTreeMap::new();
        for (disease, primary) in table.iter() {
            let encoded = encode_symptoms(primary.iter().copied(), &dataset.schema);
            let class = model.predict(&encoded.features)?;
            primary_only.insert(disease.clone(), labels.decode(class)?.to_string());
        }

        let report = TrainingReport {
            samples: dataset.len(),
            classes: labels.classes().to_vec(),
            node_count: model.nodes.len(),
            leaf_count: model.leaf_count(),
            depth: model.depth(),
            training_correct,
            primary_only,
        };

        let artifacts = ModelArtifacts::new(model, labels, dataset.schema)?;
        Ok((artifacts, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TrainingParams {
        TrainingParams {
            generator: GeneratorConfig {
                samples_per_disease: 60,
                ..GeneratorConfig::default()
            },
            tree: TreeConfig::default(),
        }
    }

    #[test]
    fn test_train_default_table() -> anyhow::Result<()> {
        let trainer = DiseaseTrainer::new(small_params());
        let (artifacts, report) = trainer.train(&DiseaseTable::default())?;

        assert_eq!(report.samples, 180);
        assert_eq!(
            report.classes,
            vec!["Early Blight", "Fusarium Wilt", "Late Blight"]
        );
        assert_eq!(artifacts.schema.len(), 20);
        assert_eq!(artifacts.model.n_classes, 3);
        assert!(report.training_correct * 2 > report.samples);
        Ok(())
    }

    #[test]
    fn test_primary_symptoms_predict_their_disease() -> anyhow::Result<()> {
        let trainer = DiseaseTrainer::new(small_params());
        let (_, report) = trainer.train(&DiseaseTable::default())?;
        assert!(
            report.primary_mismatches().is_empty(),
            "mismatches: {:?}",
            report.primary_mismatches()
        );
        Ok(())
    }

    #[test]
    fn test_training_is_reproducible() -> anyhow::Result<()> {
        let (a, _) = DiseaseTrainer::new(small_params()).train(&DiseaseTable::default())?;
        let (b, _) = DiseaseTrainer::new(small_params()).train(&DiseaseTable::default())?;
        assert_eq!(a, b);
        Ok(())
    }
}
