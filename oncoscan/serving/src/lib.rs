#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Diagnosis service: loads the trained artifacts once and answers prediction
//! requests over HTTP.

/// Listener and artifact location settings.
#[path = "../config.rs"]
pub mod config;

/// Request failures and their HTTP mapping.
#[path = "../error.rs"]
pub mod error;

/// Threshold rules evaluated on raw measurements.
#[path = "../risk.rs"]
pub mod risk;

/// Label to diagnosis translation.
#[path = "../diagnosis.rs"]
pub mod diagnosis;

/// Shared, immutable router state.
#[path = "../state.rs"]
pub mod state;

/// HTTP handlers and router assembly.
#[path = "../routes.rs"]
pub mod routes;

pub use config::ServerConfig;
pub use diagnosis::{Diagnosis, DiagnosisResult, RiskLevel};
pub use error::PredictError;
pub use risk::{high_risk_features, RiskRule, RISK_RULES};
pub use routes::{build_router, PatientInfo, PredictResponse};
pub use state::AppState;
