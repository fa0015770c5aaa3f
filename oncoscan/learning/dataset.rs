use std::{fs, path::Path};

use ndarray::{Array2, ArrayView2};
use smartcore::linalg::basic::matrix::DenseMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    error::LearningError,
    features::{canonical_feature_names, BENIGN, FEATURE_COUNT, MALIGNANT},
};

/// Single labelled measurement vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// Feature vector.
    pub features: Vec<f64>,
    /// Class label (0 = malignant, 1 = benign).
    pub label: u8,
}

/// Labelled tabular dataset with ordered feature names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    /// Data points.
    pub samples: Vec<DataPoint>,
    /// Feature names in column order.
    pub feature_names: Vec<String>,
}

impl Dataset {
    /// Creates an empty dataset with the given column names.
    #[must_use]
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            samples: Vec::new(),
            feature_names,
        }
    }

    /// Loads the embedded Wisconsin diagnostic breast cancer dataset (569 x 30).
    #[must_use]
    pub fn breast_cancer() -> Self {
        let raw = smartcore::dataset::breast_cancer::load_dataset();
        let feature_names = if raw.num_features == FEATURE_COUNT {
            canonical_feature_names()
        } else {
            raw.feature_names.clone()
        };
        let mut dataset = Self::new(feature_names);
        let width = raw.num_features.max(1);
        for (row, target) in raw.data.chunks(width).zip(raw.target.iter()) {
            let label = if f64::from(*target) < 0.5 {
                MALIGNANT
            } else {
                BENIGN
            };
            dataset.samples.push(DataPoint {
                features: row.iter().map(|value| f64::from(*value)).collect(),
                label,
            });
        }
        dataset
    }

    /// Loads a UCI `wdbc.data` file: `id,diagnosis,30 measurements` per line.
    ///
    /// Diagnosis `M` maps to label 0 and `B` to label 1.
    pub fn from_wdbc_csv(path: impl AsRef<Path>) -> Result<Self, LearningError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::parse_wdbc(&contents, path)
    }

    fn parse_wdbc(contents: &str, path: &Path) -> Result<Self, LearningError> {
        let mut dataset = Self::new(canonical_feature_names());
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = |reason: String| LearningError::MalformedRow {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            };
            let columns: Vec<&str> = line.split(',').map(str::trim).collect();
            if columns.len() != FEATURE_COUNT + 2 {
                return Err(malformed(format!(
                    "expected {} columns, found {}",
                    FEATURE_COUNT + 2,
                    columns.len()
                )));
            }
            let label = match columns[1] {
                "M" | "m" => MALIGNANT,
                "B" | "b" => BENIGN,
                other => return Err(malformed(format!("unknown diagnosis {other:?}"))),
            };
            let features = columns[2..]
                .iter()
                .map(|raw| {
                    raw.parse::<f64>()
                        .map_err(|err| malformed(format!("bad value {raw:?}: {err}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            dataset.samples.push(DataPoint { features, label });
        }
        if dataset.samples.is_empty() {
            return Err(LearningError::EmptyDataset);
        }
        Ok(dataset)
    }

    /// Appends a sample after checking its dimension and label.
    pub fn push(&mut self, features: Vec<f64>, label: u8) -> Result<(), LearningError> {
        if label > BENIGN {
            return Err(LearningError::InvalidLabel(label));
        }
        let expected = self.feature_dim();
        if expected != 0 && features.len() != expected {
            return Err(LearningError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        self.samples.push(DataPoint { features, label });
        Ok(())
    }

    /// Returns a dataset holding clones of the selected rows.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            samples: indices
                .iter()
                .filter_map(|&idx| self.samples.get(idx).cloned())
                .collect(),
            feature_names: self.feature_names.clone(),
        }
    }

    /// Returns the feature dimensionality.
    #[must_use]
    pub fn feature_dim(&self) -> usize {
        self.samples
            .first()
            .map_or(self.feature_names.len(), |point| point.features.len())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-class sample counts indexed by label.
    #[must_use]
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0; 2];
        for point in &self.samples {
            counts[usize::from(point.label.min(BENIGN))] += 1;
        }
        counts
    }

    /// Labels in sample order.
    #[must_use]
    pub fn labels(&self) -> Vec<u8> {
        self.samples.iter().map(|point| point.label).collect()
    }

    /// Converts samples into a row-major feature matrix and label vector.
    pub fn to_matrix(&self) -> Result<(Array2<f64>, Vec<u8>), LearningError> {
        if self.samples.is_empty() {
            return Err(LearningError::EmptyDataset);
        }
        let dim = self.feature_dim();
        let mut flat = Vec::with_capacity(self.samples.len() * dim);
        for point in &self.samples {
            if point.features.len() != dim {
                return Err(LearningError::DimensionMismatch {
                    expected: dim,
                    actual: point.features.len(),
                });
            }
            flat.extend_from_slice(&point.features);
        }
        let matrix = Array2::from_shape_vec((self.samples.len(), dim), flat).map_err(|_| {
            LearningError::DimensionMismatch {
                expected: dim,
                actual: 0,
            }
        })?;
        Ok((matrix, self.labels()))
    }
}

/// Copies a `samples x features` view into the row-major matrix smartcore estimators take.
pub(crate) fn dense_matrix(
    features: ArrayView2<'_, f64>,
) -> Result<DenseMatrix<f64>, LearningError> {
    let (rows, cols) = features.dim();
    if rows == 0 || cols == 0 {
        return Err(LearningError::EmptyDataset);
    }
    Ok(DenseMatrix::new(rows, cols, features.iter().copied().collect(), false)?)
}
