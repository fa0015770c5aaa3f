//! Voting ensemble over smartcore random-forest members.
//!
//! Each member is a single-tree `RandomForestClassifier` with its own seed, so
//! bootstrap sampling and per-split feature sampling stay inside smartcore
//! while the ensemble can still report vote fractions per class.

use ndarray::ArrayView2;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smartcore::{
    ensemble::random_forest_classifier::{
        RandomForestClassifier, RandomForestClassifierParameters,
    },
    linalg::basic::matrix::DenseMatrix,
};

use crate::{
    dataset::{dense_matrix, Dataset},
    error::LearningError,
    features::{BENIGN, MALIGNANT},
    inference::Classifier,
};

type Member = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Hyper-parameters for [`RandomForest`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: u16,
    /// Depth limit per tree.
    pub max_depth: Option<u16>,
    /// Minimum node size eligible for splitting.
    pub min_samples_split: usize,
    /// Candidate features per split; `None` uses `floor(sqrt(n_features))`.
    pub max_features: Option<usize>,
    /// Seed driving bootstrap and feature sampling.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: Some(10),
            min_samples_split: 5,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<(), LearningError> {
        if self.n_trees == 0 {
            return Err(LearningError::InvalidParameter("n_trees must be at least 1".into()));
        }
        if self.min_samples_split < 2 {
            return Err(LearningError::InvalidParameter(
                "min_samples_split must be at least 2".into(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(LearningError::InvalidParameter("max_features must be at least 1".into()));
        }
        Ok(())
    }

    fn member_params(&self, seed: u64, n_features: usize) -> RandomForestClassifierParameters {
        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(1)
            .with_min_samples_split(self.min_samples_split)
            .with_seed(seed);
        if let Some(depth) = self.max_depth {
            params = params.with_max_depth(depth);
        }
        if let Some(m) = self.max_features {
            params = params.with_m(m.min(n_features));
        }
        params
    }
}

/// Random forest classifier over the binary malignant/benign labels.
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    members: Vec<Member>,
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fits the forest on a `samples x features` matrix and its labels.
    pub fn fit(
        params: ForestParams,
        features: ArrayView2<'_, f64>,
        labels: &[u8],
    ) -> Result<Self, LearningError> {
        params.validate()?;
        let (n_samples, n_features) = features.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(LearningError::EmptyDataset);
        }
        if labels.len() != n_samples {
            return Err(LearningError::DimensionMismatch {
                expected: n_samples,
                actual: labels.len(),
            });
        }
        if let Some(&label) = labels.iter().find(|&&label| label > BENIGN) {
            return Err(LearningError::InvalidLabel(label));
        }
        if labels.iter().all(|&label| label == labels[0]) {
            return Err(LearningError::SingleClass(labels[0]));
        }

        let matrix = dense_matrix(features)?;
        let targets: Vec<u32> = labels.iter().map(|&label| u32::from(label)).collect();
        let mut master = ChaCha8Rng::seed_from_u64(params.seed);
        let members = (0..params.n_trees)
            .map(|_| {
                let member_params = params.member_params(master.gen(), n_features);
                RandomForestClassifier::fit(&matrix, &targets, member_params)
            })
            .collect::<Result<Vec<Member>, _>>()?;

        let mut forest = Self {
            params,
            n_features,
            members,
            importances: vec![0.0; n_features],
        };
        forest.importances = forest.permutation_importances(features, &targets, &mut master)?;
        Ok(forest)
    }

    /// Fits the forest on every sample of a dataset.
    pub fn fit_dataset(params: ForestParams, dataset: &Dataset) -> Result<Self, LearningError> {
        let (matrix, labels) = dataset.to_matrix()?;
        Self::fit(params, matrix.view(), &labels)
    }

    /// Mean per-member accuracy drop when one column is shuffled, clamped at
    /// zero and normalised to sum to one.
    fn permutation_importances(
        &self,
        features: ArrayView2<'_, f64>,
        targets: &[u32],
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<f64>, LearningError> {
        let baseline = self.member_accuracies(&dense_matrix(features)?, targets)?;
        let mut order: Vec<usize> = (0..features.nrows()).collect();
        let mut importances = Vec::with_capacity(self.n_features);
        for col in 0..self.n_features {
            order.shuffle(rng);
            let mut shuffled = features.to_owned();
            for (row, &source) in order.iter().enumerate() {
                shuffled[[row, col]] = features[[source, col]];
            }
            let permuted = self.member_accuracies(&dense_matrix(shuffled.view())?, targets)?;
            let drop: f64 = baseline
                .iter()
                .zip(&permuted)
                .map(|(before, after)| before - after)
                .sum::<f64>()
                / self.members.len() as f64;
            importances.push(drop.max(0.0));
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for value in &mut importances {
                *value /= total;
            }
        }
        Ok(importances)
    }

    fn member_accuracies(
        &self,
        matrix: &DenseMatrix<f64>,
        targets: &[u32],
    ) -> Result<Vec<f64>, LearningError> {
        self.members
            .iter()
            .map(|member| -> Result<f64, LearningError> {
                let predicted = member.predict(matrix)?;
                let correct = predicted
                    .iter()
                    .zip(targets)
                    .filter(|(predicted, target)| predicted == target)
                    .count();
                Ok(correct as f64 / targets.len() as f64)
            })
            .collect()
    }

    /// Per-row `[malignant, benign]` vote counts across members.
    fn votes(
        &self,
        matrix: &DenseMatrix<f64>,
        rows: usize,
    ) -> Result<Vec<[usize; 2]>, LearningError> {
        if self.members.is_empty() {
            return Err(LearningError::NotFitted("random forest"));
        }
        let mut votes = vec![[0_usize; 2]; rows];
        for member in &self.members {
            for (tally, label) in votes.iter_mut().zip(member.predict(matrix)?) {
                if label == u32::from(BENIGN) {
                    tally[usize::from(BENIGN)] += 1;
                } else {
                    tally[usize::from(MALIGNANT)] += 1;
                }
            }
        }
        Ok(votes)
    }

    /// Hyper-parameters used for fitting.
    #[must_use]
    pub const fn params(&self) -> ForestParams {
        self.params
    }

    /// Number of fitted trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    /// Permutation importance per feature, normalised to sum to one.
    #[must_use]
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    /// Feature names paired with importances, most important first.
    #[must_use]
    pub fn ranked_importances(&self, feature_names: &[String]) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .importances
            .iter()
            .enumerate()
            .map(|(idx, importance)| {
                let name = feature_names
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("feature {idx}"));
                (name, *importance)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Predicts labels for every sample of a dataset.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<u8>, LearningError> {
        let (matrix, _) = dataset.to_matrix()?;
        if matrix.ncols() != self.n_features {
            return Err(LearningError::DimensionMismatch {
                expected: self.n_features,
                actual: matrix.ncols(),
            });
        }
        let votes = self.votes(&dense_matrix(matrix.view())?, matrix.nrows())?;
        Ok(votes
            .into_iter()
            .map(|tally| {
                if tally[usize::from(BENIGN)] > tally[usize::from(MALIGNANT)] {
                    BENIGN
                } else {
                    MALIGNANT
                }
            })
            .collect())
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], LearningError> {
        if features.len() != self.n_features {
            return Err(LearningError::DimensionMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let row = DenseMatrix::new(1, self.n_features, features.to_vec(), false)?;
        let tally = self.votes(&row, 1)?[0];
        let n = self.members.len() as f64;
        Ok([
            tally[usize::from(MALIGNANT)] as f64 / n,
            tally[usize::from(BENIGN)] as f64 / n,
        ])
    }

    fn dimension(&self) -> usize {
        self.n_features
    }
}
