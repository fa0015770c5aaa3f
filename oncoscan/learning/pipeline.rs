use serde::{Deserialize, Serialize};

use crate::{
    artifacts::TrainedArtifacts,
    dataset::Dataset,
    error::LearningError,
    forest::{ForestParams, RandomForest},
    metrics::{accuracy, ConfusionMatrix, TrainingReport},
    scaler::StandardScaler,
    split::stratified_split,
};

/// Split, scale, fit, and evaluate in one reproducible pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrainingPipeline {
    /// Forest hyper-parameters.
    pub forest: ForestParams,
    /// Held-out fraction.
    pub test_ratio: f64,
    /// Seed for the stratified split.
    pub split_seed: u64,
}

impl Default for TrainingPipeline {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_ratio: 0.2,
            split_seed: 42,
        }
    }
}

/// Artifacts plus evaluation produced by [`TrainingPipeline::run`].
#[derive(Debug)]
pub struct TrainingOutcome {
    /// Model, scaler, and feature names ready to persist.
    pub artifacts: TrainedArtifacts,
    /// Held-out evaluation.
    pub report: TrainingReport,
}

impl TrainingPipeline {
    /// Runs the pipeline; the scaler only ever sees training rows.
    pub fn run(&self, dataset: &Dataset) -> Result<TrainingOutcome, LearningError> {
        let (train, test) = stratified_split(dataset, self.test_ratio, self.split_seed)?;
        let scaler = StandardScaler::fit_dataset(&train)?;
        let train_scaled = scaler.transform_dataset(&train)?;
        let test_scaled = scaler.transform_dataset(&test)?;

        let model = RandomForest::fit_dataset(self.forest, &train_scaled)?;
        let predictions = model.predict_dataset(&test_scaled)?;
        let labels = test_scaled.labels();

        let report = TrainingReport {
            model: "random_forest".into(),
            params: self.forest,
            train_samples: train.len(),
            test_samples: test.len(),
            accuracy: accuracy(&predictions, &labels)?,
            confusion: ConfusionMatrix::from_predictions(&predictions, &labels)?,
            importances: model.ranked_importances(&dataset.feature_names),
        };
        Ok(TrainingOutcome {
            artifacts: TrainedArtifacts {
                model,
                scaler,
                feature_names: dataset.feature_names.clone(),
            },
            report,
        })
    }
}
