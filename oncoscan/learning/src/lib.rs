#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! OncoScan learning stack: WDBC dataset handling, standardization, random forest, and artifacts.

/// Canonical feature layout and label convention.
#[path = "../features.rs"]
pub mod features;

/// Error types for fitting and persistence.
#[path = "../error.rs"]
pub mod error;

/// Labelled dataset loading and conversion.
#[path = "../dataset.rs"]
pub mod dataset;

/// Stratified train/test partitioning.
#[path = "../split.rs"]
pub mod split;

/// Inference traits shared with the serving layer.
#[path = "../inference.rs"]
pub mod inference;

/// Per-feature standardization.
#[path = "../scaler.rs"]
pub mod scaler;

/// Random forest classifier.
#[path = "../forest/main.rs"]
pub mod forest;

/// Evaluation metrics and training reports.
#[path = "../metrics.rs"]
pub mod metrics;

/// End-to-end training pipeline.
#[path = "../pipeline.rs"]
pub mod pipeline;

/// Artifact persistence for the train/serve hand-off.
#[path = "../artifacts.rs"]
pub mod artifacts;

pub use artifacts::{ArtifactPaths, TrainedArtifacts};
pub use dataset::{DataPoint, Dataset};
pub use error::{ArtifactError, LearningError};
pub use features::{BENIGN, FEATURE_COUNT, FEATURE_NAMES, MALIGNANT};
pub use forest::{ForestParams, RandomForest};
pub use inference::{Classifier, FeatureScaler};
pub use metrics::{accuracy, ConfusionMatrix, TrainingReport};
pub use pipeline::{TrainingOutcome, TrainingPipeline};
pub use scaler::StandardScaler;
pub use split::stratified_split;
