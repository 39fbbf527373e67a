//! AgroDx AI Core
//!
//! Inference building blocks for the plant disease prediction service.
//!
//! Modules:
//! - `schema`: Ordered symptom-presence feature columns
//! - `encoder`: Symptom id set to presence vector
//! - `labels`: Disease name <-> class index mapping
//! - `tree`: Decision tree model and traversal
//! - `artifacts`: Saving and loading the model, labels and schema
//! - `predictor`: End-to-end prediction over loaded artifacts
//! - `serialization`: Canonical JSON helpers

pub mod artifacts;
pub mod encoder;
pub mod errors;
pub mod labels;
pub mod predictor;
pub mod schema;
pub mod serialization;
pub mod tree;

pub use artifacts::{ModelArtifacts, SavedArtifacts};
pub use encoder::{encode_symptoms, EncodedSymptoms, PresenceVector};
pub use errors::AiCoreError;
pub use labels::LabelEncoder;
pub use predictor::{DiseasePredictor, Prediction};
pub use schema::{column_for_symptom, FeatureSchema, SymptomId};
pub use serialization::{canonical_json_string, content_hash_hex};
pub use tree::{DecisionTree, Node};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
