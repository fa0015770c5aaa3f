use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use smartcore::{
    api::{Transformer, UnsupervisedEstimator},
    linalg::basic::{arrays::Array, matrix::DenseMatrix},
    preprocessing::numerical::{self, StandardScalerParameters},
};

use crate::{
    dataset::{dense_matrix, DataPoint, Dataset},
    error::LearningError,
    inference::FeatureScaler,
};

/// Per-feature standardization learned from training rows.
///
/// Wraps smartcore's column scaler (population standard deviation) and keeps
/// the fitted width so mismatched rows are rejected before they reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    columns: numerical::StandardScaler<f64>,
    dimension: usize,
}

impl StandardScaler {
    /// Fits the scaler on a `samples x features` matrix.
    pub fn fit(features: ArrayView2<'_, f64>) -> Result<Self, LearningError> {
        let matrix = dense_matrix(features)?;
        let columns = <numerical::StandardScaler<f64> as UnsupervisedEstimator<
            DenseMatrix<f64>,
            StandardScalerParameters,
        >>::fit(&matrix, StandardScalerParameters::default())?;
        Ok(Self {
            columns,
            dimension: features.ncols(),
        })
    }

    /// Fits the scaler on every sample of a dataset.
    pub fn fit_dataset(dataset: &Dataset) -> Result<Self, LearningError> {
        let (matrix, _) = dataset.to_matrix()?;
        Self::fit(matrix.view())
    }

    fn check_width(&self, actual: usize) -> Result<(), LearningError> {
        if actual == self.dimension {
            Ok(())
        } else {
            Err(LearningError::DimensionMismatch {
                expected: self.dimension,
                actual,
            })
        }
    }

    /// Scales every row of a matrix.
    pub fn transform_matrix(
        &self,
        features: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, LearningError> {
        self.check_width(features.ncols())?;
        let scaled = self.columns.transform(&dense_matrix(features)?)?;
        Ok(Array2::from_shape_fn(features.dim(), |(row, col)| {
            *scaled.get((row, col))
        }))
    }

    /// Returns a copy of the dataset with every sample scaled.
    pub fn transform_dataset(&self, dataset: &Dataset) -> Result<Dataset, LearningError> {
        let (matrix, labels) = dataset.to_matrix()?;
        let scaled = self.transform_matrix(matrix.view())?;
        let samples = scaled
            .rows()
            .into_iter()
            .zip(labels)
            .map(|(row, label)| DataPoint {
                features: row.to_vec(),
                label,
            })
            .collect();
        Ok(Dataset {
            samples,
            feature_names: dataset.feature_names.clone(),
        })
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, LearningError> {
        self.check_width(features.len())?;
        let row = DenseMatrix::new(1, self.dimension, features.to_vec(), false)?;
        let scaled = self.columns.transform(&row)?;
        Ok((0..self.dimension).map(|col| *scaled.get((0, col))).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
