//! End-to-end inference: symptom ids -> presence vector -> class -> disease

use serde::Serialize;
use tracing::debug;

use crate::artifacts::ModelArtifacts;
use crate::encoder::encode_symptoms;
use crate::errors::Result;
use crate::schema::SymptomId;

/// Outcome of a single prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Predicted disease, `None` when the model has nothing to say
    pub disease: Option<String>,
    /// Symptom ids that the feature schema did not contain
    pub ignored_symptoms: Vec<SymptomId>,
}

/// Read-only predictor built once from loaded artifacts
#[derive(Debug, Clone)]
pub struct DiseasePredictor {
    artifacts: ModelArtifacts,
}

impl DiseasePredictor {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Predict a disease for the observed symptoms
    pub fn predict<I>(&self, symptom_ids: I) -> Result<Prediction>
    where
        I: IntoIterator<Item = SymptomId>,
    {
        let encoded = encode_symptoms(symptom_ids, &self.artifacts.schema);
        let class = self.artifacts.model.predict(&encoded.features)?;
        let disease = self.artifacts.labels.decode(class)?.to_string();
        debug!("Predicted class {} ({})", class, disease);

        Ok(Prediction {
            disease: Some(disease),
            ignored_symptoms: encoded.ignored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelEncoder;
    use crate::schema::FeatureSchema;
    use crate::tree::{DecisionTree, Node};
    use crate::AiCoreError;

    // symptom 3 present -> Fusarium Wilt, otherwise Early Blight
    fn predictor() -> DiseasePredictor {
        let schema = FeatureSchema::for_symptom_range(3);
        let labels = LabelEncoder::fit(["Early Blight", "Fusarium Wilt"]).unwrap();
        let model = DecisionTree::new(
            3,
            2,
            vec![
                Node::split(2, 0, 1, 2),
                Node::leaf(vec![10, 0]),
                Node::leaf(vec![1, 10]),
            ],
        );
        DiseasePredictor::new(ModelArtifacts::new(model, labels, schema).unwrap())
    }

    #[test]
    fn test_predicts_disease_name() {
        let p = predictor();
        assert_eq!(
            p.predict([1, 2]).unwrap().disease.as_deref(),
            Some("Early Blight")
        );
        assert_eq!(
            p.predict([2, 3]).unwrap().disease.as_deref(),
            Some("Fusarium Wilt")
        );
    }

    #[test]
    fn test_unknown_symptoms_reported_not_fatal() {
        let prediction = predictor().predict([1, 77]).unwrap();
        assert_eq!(prediction.disease.as_deref(), Some("Early Blight"));
        assert_eq!(prediction.ignored_symptoms, vec![77]);
    }

    #[test]
    fn test_out_of_range_class_surfaces_error() {
        let schema = FeatureSchema::for_symptom_range(1);
        let labels = LabelEncoder::fit(["Early Blight"]).unwrap();
        // Built directly to bypass artifact validation.
        let broken = ModelArtifacts {
            model: DecisionTree::new(1, 2, vec![Node::leaf(vec![0, 3])]),
            labels,
            schema,
        };
        let result = DiseasePredictor::new(broken).predict([1]);
        assert!(matches!(
            result,
            Err(AiCoreError::ClassIndexOutOfRange { index: 1, classes: 1 })
        ));
    }
}
