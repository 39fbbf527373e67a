//! AgroDx AI Service Layer
//!
//! HTTP prediction service for plant disease diagnosis:
//! - `POST /predict` maps observed symptom ids to a disease name
//! - learned decision-tree backend or static rule-table backend
//! - readiness reporting when model artifacts fail to load

pub mod config;
pub mod errors;
pub mod rules;
pub mod server;
pub mod service;

pub use config::{BackendMode, ServiceConfig};
pub use errors::ServiceError;
pub use rules::{PlantId, RuleTable};
pub use server::{build_router, start_server, PredictResponse};
pub use service::{
    BackendInfo, ModelBackend, PredictRequest, PredictionBackend, RuleBackend, ServiceContext,
};

/// AI Service version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
