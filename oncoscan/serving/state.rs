use std::{path::Path, sync::Arc};

use oncoscan_learning::{
    ArtifactError, ArtifactPaths, Classifier, FeatureScaler, TrainedArtifacts,
};

/// Loaded model, scaler, and feature names shared read-only by every handler.
#[derive(Clone)]
pub struct AppState {
    classifier: Arc<dyn Classifier>,
    scaler: Arc<dyn FeatureScaler>,
    feature_names: Arc<[String]>,
    port: u16,
}

impl AppState {
    /// Wires explicit components; tests inject mocks here.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        scaler: Arc<dyn FeatureScaler>,
        feature_names: Vec<String>,
        port: u16,
    ) -> Self {
        Self {
            classifier,
            scaler,
            feature_names: feature_names.into(),
            port,
        }
    }

    /// Wraps artifacts produced by the trainer.
    #[must_use]
    pub fn from_artifacts(artifacts: TrainedArtifacts, port: u16) -> Self {
        Self::new(
            Arc::new(artifacts.model),
            Arc::new(artifacts.scaler),
            artifacts.feature_names,
            port,
        )
    }

    /// Loads `cancer_model.bin`, `scaler.bin`, and `feature_names.bin` from `dir`.
    pub fn load(dir: impl AsRef<Path>, port: u16) -> Result<Self, ArtifactError> {
        let artifacts = TrainedArtifacts::load(&ArtifactPaths::in_dir(dir))?;
        Ok(Self::from_artifacts(artifacts, port))
    }

    /// Classifier behind the predict route.
    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Scaler applied before classification.
    #[must_use]
    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    /// Feature names in vector order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Configured port, echoed by `GET /`.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("features", &self.feature_names.len())
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
