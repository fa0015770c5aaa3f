use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use oncoscan_learning::{LearningError, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    diagnosis::{Diagnosis, DiagnosisResult},
    error::PredictError,
    risk::high_risk_features,
    state::AppState,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Patient metadata echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    /// Defaults to `"Unknown"`.
    pub patient_id: Value,
    /// Defaults to `""`.
    pub patient_name: Value,
    /// Defaults to `null`.
    pub age: Value,
    /// Defaults to `""`.
    pub gender: Value,
    /// Defaults to `""`.
    pub notes: Value,
}

impl PatientInfo {
    fn from_body(body: &Map<String, Value>) -> Self {
        let field = |key: &str, default: Value| body.get(key).cloned().unwrap_or(default);
        Self {
            patient_id: field("patientId", json!("Unknown")),
            patient_name: field("patientName", json!("")),
            age: field("age", Value::Null),
            gender: field("gender", json!("")),
            notes: field("notes", json!("")),
        }
    }
}

/// Body of a successful `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Echoed metadata.
    pub patient: PatientInfo,
    /// Classifier outcome and risk flags.
    pub result: DiagnosisResult,
    /// Local time of the prediction, ISO-8601 without offset.
    pub timestamp: String,
}

/// Builds the service router with permissive CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Breast Cancer Detection API",
        "status": "Running",
        "version": "1.0",
        "port": state.port(),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let outcome = payload
        .map_err(|rejection| PredictError::invalid(rejection.body_text()))
        .and_then(|Json(body)| diagnose(&state, &body));
    match &outcome {
        Ok(response) => info!(
            patient_id = %response.patient.patient_id,
            prediction = response.result.prediction.as_str(),
            confidence = response.result.confidence,
            "prediction served"
        ),
        Err(PredictError::InvalidInput { detail }) => warn!(%detail, "rejected prediction input"),
        Err(err) => warn!(error = %err, "prediction failed"),
    }
    outcome.map(Json)
}

/// Runs the full prediction for one decoded request body.
fn diagnose(state: &AppState, body: &Value) -> Result<PredictResponse, PredictError> {
    let body = body
        .as_object()
        .ok_or_else(|| PredictError::invalid("request body must be a JSON object"))?;
    let patient = PatientInfo::from_body(body);
    let raw = match body.get("cellFeatures") {
        None => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(Value::Null) => {
            return Err(PredictError::Inference(
                "cellFeatures is null, expected an array of numbers".into(),
            ))
        }
        Some(other) => {
            return Err(PredictError::invalid(format!(
                "cellFeatures must be an array, got {other}"
            )))
        }
    };
    info!(patient_id = %patient.patient_id, features = raw.len(), "prediction request");
    if raw.len() != FEATURE_COUNT {
        return Err(PredictError::FeatureCount {
            expected: FEATURE_COUNT,
            actual: raw.len(),
        });
    }
    let features = raw
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            value.as_f64().ok_or_else(|| {
                PredictError::invalid(format!("cellFeatures[{idx}] is not a number: {value}"))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let scaled = state.scaler().transform(&features).map_err(|err| match err {
        LearningError::DimensionMismatch { .. } => PredictError::invalid(err),
        other => PredictError::Inference(other.to_string()),
    })?;
    let proba = state
        .classifier()
        .predict_proba(&scaled)
        .map_err(|err| PredictError::Inference(err.to_string()))?;
    let diagnosis = Diagnosis::from_proba(proba);

    let flagged = high_risk_features(&features, state.feature_names());
    Ok(PredictResponse {
        patient,
        result: DiagnosisResult::new(diagnosis, proba, flagged),
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::http::StatusCode;

    use oncoscan_learning::{features::canonical_feature_names, Classifier, FeatureScaler};

    use super::*;

    struct Identity;

    impl FeatureScaler for Identity {
        fn transform(&self, features: &[f64]) -> Result<Vec<f64>, LearningError> {
            Ok(features.to_vec())
        }

        fn dimension(&self) -> usize {
            FEATURE_COUNT
        }
    }

    /// Benign with 80% unless the first scaled feature is negative.
    struct Threshold;

    impl Classifier for Threshold {
        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], LearningError> {
            Ok(if features[0] < 0.0 { [0.9, 0.1] } else { [0.2, 0.8] })
        }

        fn dimension(&self) -> usize {
            FEATURE_COUNT
        }
    }

    fn state() -> AppState {
        AppState::new(
            Arc::new(Threshold),
            Arc::new(Identity),
            canonical_feature_names(),
            5001,
        )
    }

    #[test]
    fn defaults_fill_missing_metadata() {
        let body = json!({ "cellFeatures": vec![1.0; 30] });
        let response = diagnose(&state(), &body).unwrap();
        assert_eq!(response.patient.patient_id, json!("Unknown"));
        assert_eq!(response.patient.age, Value::Null);
        assert_eq!(response.patient.notes, json!(""));
        assert_eq!(response.result.diagnosis, Diagnosis::Benign);
        assert!((response.result.confidence - 80.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_null_metadata_is_kept() {
        let body = json!({ "patientId": null, "gender": 3, "cellFeatures": vec![1.0; 30] });
        let response = diagnose(&state(), &body).unwrap();
        assert_eq!(response.patient.patient_id, Value::Null);
        assert_eq!(response.patient.gender, json!(3));
    }

    #[test]
    fn missing_features_count_as_zero() {
        let err = diagnose(&state(), &json!({ "patientId": "P-1" })).unwrap_err();
        assert_eq!(err.to_string(), "Expected 30 features, got 0");
    }

    #[test]
    fn null_features_fail_as_inference_error() {
        let err = diagnose(&state(), &json!({ "cellFeatures": null })).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Counts probability calls and refuses direct label requests.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Classifier for Counting {
        fn predict_proba(&self, _features: &[f64]) -> Result<[f64; 2], LearningError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok([0.35, 0.65])
        }

        fn predict(&self, _features: &[f64]) -> Result<u8, LearningError> {
            Err(LearningError::NotFitted("label path"))
        }

        fn dimension(&self) -> usize {
            FEATURE_COUNT
        }
    }

    #[test]
    fn forest_is_evaluated_once_per_request() {
        let classifier = Arc::new(Counting::default());
        let state = AppState::new(
            classifier.clone(),
            Arc::new(Identity),
            canonical_feature_names(),
            5001,
        );
        let response = diagnose(&state, &json!({ "cellFeatures": vec![1.0; 30] })).unwrap();
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.result.diagnosis, Diagnosis::Benign);
        assert!((response.result.confidence - 65.0).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_features_are_invalid_input() {
        let mut features = vec![json!(1.0); 30];
        features[4] = json!("large");
        let err = diagnose(&state(), &json!({ "cellFeatures": features })).unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput { .. }));
        let err = diagnose(&state(), &json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, PredictError::InvalidInput { .. }));
    }

    #[test]
    fn timestamp_is_local_iso_without_offset() {
        let response = diagnose(&state(), &json!({ "cellFeatures": vec![-1.0; 30] })).unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(&response.timestamp, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(response.result.diagnosis, Diagnosis::Malignant);
    }
}
