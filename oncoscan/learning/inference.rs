//! Inference seams consumed by the serving layer.
//!
//! The server only depends on these traits, so tests can substitute canned
//! scalers and classifiers for the fitted artifacts.

use crate::{
    error::LearningError,
    features::{BENIGN, MALIGNANT},
};

/// Per-feature transform applied before classification.
pub trait FeatureScaler: Send + Sync {
    /// Scales a single raw feature vector.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, LearningError>;

    /// Feature dimension the scaler was fitted with.
    fn dimension(&self) -> usize;
}

/// Binary classifier over scaled feature vectors.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p(malignant), p(benign)]`.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], LearningError>;

    /// Predicted label; ties resolve to malignant.
    fn predict(&self, features: &[f64]) -> Result<u8, LearningError> {
        let proba = self.predict_proba(features)?;
        Ok(if proba[usize::from(BENIGN)] > proba[usize::from(MALIGNANT)] {
            BENIGN
        } else {
            MALIGNANT
        })
    }

    /// Feature dimension the classifier was fitted with.
    fn dimension(&self) -> usize;
}
