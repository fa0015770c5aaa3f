use serde::{Deserialize, Serialize};

use crate::{error::LearningError, forest::ForestParams};

/// Fraction of predictions equal to the true labels.
pub fn accuracy(predictions: &[u8], labels: &[u8]) -> Result<f64, LearningError> {
    if predictions.len() != labels.len() {
        return Err(LearningError::DimensionMismatch {
            expected: labels.len(),
            actual: predictions.len(),
        });
    }
    if labels.is_empty() {
        return Err(LearningError::EmptyDataset);
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(pred, label)| pred == label)
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// 2x2 confusion matrix; rows are actual labels, columns predicted labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    /// `cells[actual][predicted]`.
    pub cells: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Tallies predictions against labels.
    pub fn from_predictions(predictions: &[u8], labels: &[u8]) -> Result<Self, LearningError> {
        if predictions.len() != labels.len() {
            return Err(LearningError::DimensionMismatch {
                expected: labels.len(),
                actual: predictions.len(),
            });
        }
        let mut matrix = Self::default();
        for (&pred, &label) in predictions.iter().zip(labels) {
            if pred > 1 {
                return Err(LearningError::InvalidLabel(pred));
            }
            if label > 1 {
                return Err(LearningError::InvalidLabel(label));
            }
            matrix.cells[usize::from(label)][usize::from(pred)] += 1;
        }
        Ok(matrix)
    }

    /// Total number of tallied samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// Renders the cancer / no-cancer table printed by the trainer.
    #[must_use]
    pub fn render(&self) -> String {
        let [[tp, fn_], [fp, tn]] = self.cells;
        format!(
            "                 Predicted\n                Cancer  No Cancer\nActual Cancer      {tp:3}      {fn_:3}\n       No Cancer   {fp:3}      {tn:3}"
        )
    }
}

/// Summary of one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Model name.
    pub model: String,
    /// Hyper-parameters used.
    pub params: ForestParams,
    /// Training partition size.
    pub train_samples: usize,
    /// Held-out partition size.
    pub test_samples: usize,
    /// Held-out accuracy in `[0, 1]`.
    pub accuracy: f64,
    /// Held-out confusion matrix.
    pub confusion: ConfusionMatrix,
    /// Features ranked by importance.
    pub importances: Vec<(String, f64)>,
}

impl TrainingReport {
    /// Renders a concise summary string.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "[ML] model={} trees={} train={} test={} accuracy={:.2}%",
            self.model,
            self.params.n_trees,
            self.train_samples,
            self.test_samples,
            self.accuracy * 100.0
        )
    }
}
