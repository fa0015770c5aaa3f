use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of `POST /api/predict`.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Wrong number of cell features.
    #[error("Expected {expected} features, got {actual}")]
    FeatureCount {
        /// Features the model was trained on.
        expected: usize,
        /// Features received.
        actual: usize,
    },
    /// Body is not valid JSON, has wrong field types, or was rejected by the scaler.
    #[error("Invalid input data. Please check all fields.")]
    InvalidInput {
        /// Underlying cause; logged, never returned to the client.
        detail: String,
    },
    /// Any other inference failure; the text is returned as-is.
    #[error("Prediction failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// HTTP status for this failure.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::FeatureCount { .. } | Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn invalid(detail: impl ToString) -> Self {
        Self::InvalidInput {
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
