use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing data, fitting, or evaluating models.
#[derive(Debug, Error)]
pub enum LearningError {
    /// Input vector or matrix has the wrong number of features.
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch {
        /// Dimension the component was fitted with.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },
    /// Dataset (or a partition of it) contains no samples.
    #[error("dataset contains no samples")]
    EmptyDataset,
    /// Label outside the binary convention.
    #[error("invalid label {0}, expected 0 (malignant) or 1 (benign)")]
    InvalidLabel(u8),
    /// Training labels contain a single class.
    #[error("training data contains only label {0}; both classes are required")]
    SingleClass(u8),
    /// Component used before fitting.
    #[error("{0} has not been fitted")]
    NotFitted(&'static str),
    /// Malformed dataset row.
    #[error("{}:{line}: {reason}", path.display())]
    MalformedRow {
        /// Source file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// Invalid hyper-parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The underlying estimator rejected its input.
    #[error("estimator failure: {0}")]
    Estimator(#[from] smartcore::error::Failed),
    /// I/O error (filesystem).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while persisting or restoring trained artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Reading or writing an artifact file failed.
    #[error("artifact {}: {source}", path.display())]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Encoding or decoding an artifact failed.
    #[error("artifact {} is not a valid {kind}: {source}", path.display())]
    Codec {
        /// Artifact path.
        path: PathBuf,
        /// Artifact kind (model, scaler, feature names).
        kind: &'static str,
        /// Underlying failure.
        #[source]
        source: bincode::Error,
    },
    /// Artifacts disagree on the feature dimension.
    #[error("inconsistent artifacts: model expects {model}, scaler expects {scaler}, {names} feature names")]
    Inconsistent {
        /// Model feature dimension.
        model: usize,
        /// Scaler feature dimension.
        scaler: usize,
        /// Number of feature names.
        names: usize,
    },
}
