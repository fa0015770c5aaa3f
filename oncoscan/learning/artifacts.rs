use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::ArtifactError,
    forest::RandomForest,
    inference::{Classifier, FeatureScaler},
    scaler::StandardScaler,
};

/// File name of the serialized forest.
pub const MODEL_FILE: &str = "cancer_model.pkl";
/// File name of the serialized scaler.
pub const SCALER_FILE: &str = "scaler.pkl";
/// File name of the serialized feature-name list.
pub const FEATURE_NAMES_FILE: &str = "feature_names.pkl";

/// Locations of the three training artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Forest artifact.
    pub model: PathBuf,
    /// Scaler artifact.
    pub scaler: PathBuf,
    /// Feature-name artifact.
    pub feature_names: PathBuf,
}

impl ArtifactPaths {
    /// Uses the fixed artifact file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            feature_names: dir.join(FEATURE_NAMES_FILE),
        }
    }
}

/// Fitted model, scaler, and ordered feature names handed from trainer to server.
#[derive(Debug)]
pub struct TrainedArtifacts {
    /// Fitted forest.
    pub model: RandomForest,
    /// Fitted scaler.
    pub scaler: StandardScaler,
    /// Feature names in vector order.
    pub feature_names: Vec<String>,
}

impl TrainedArtifacts {
    /// Checks that model, scaler, and names agree on the feature dimension.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let model = self.model.dimension();
        let scaler = self.scaler.dimension();
        let names = self.feature_names.len();
        if model != scaler || scaler != names {
            return Err(ArtifactError::Inconsistent {
                model,
                scaler,
                names,
            });
        }
        Ok(())
    }

    /// Writes all three artifacts, creating parent directories as needed.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        self.validate()?;
        write_artifact(&paths.model, "model", &self.model)?;
        write_artifact(&paths.scaler, "scaler", &self.scaler)?;
        write_artifact(&paths.feature_names, "feature names", &self.feature_names)?;
        Ok(())
    }

    /// Reads all three artifacts and checks their consistency.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let artifacts = Self {
            model: read_artifact(&paths.model, "model")?,
            scaler: read_artifact(&paths.scaler, "scaler")?,
            feature_names: read_artifact(&paths.feature_names, "feature names")?,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }
}

fn write_artifact<T: Serialize>(
    path: &Path,
    kind: &'static str,
    value: &T,
) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    bincode::serialize_into(&mut writer, value).map_err(|source| ArtifactError::Codec {
        path: path.to_path_buf(),
        kind,
        source,
    })?;
    writer.flush().map_err(io_err)
}

fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    kind: &'static str,
) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|source| ArtifactError::Codec {
        path: path.to_path_buf(),
        kind,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::ForestParams;
    use ndarray::array;
    use tempfile::tempdir;

    fn fitted() -> TrainedArtifacts {
        let x = array![[1.0, 8.0], [2.0, 7.0], [3.0, 9.0], [10.0, 1.0], [11.0, 2.0], [12.0, 0.5]];
        let y = [0, 0, 0, 1, 1, 1];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let scaled = scaler.transform_matrix(x.view()).unwrap();
        let params = ForestParams {
            n_trees: 5,
            min_samples_split: 2,
            ..ForestParams::default()
        };
        TrainedArtifacts {
            model: RandomForest::fit(params, scaled.view(), &y).unwrap(),
            scaler,
            feature_names: vec!["left".into(), "right".into()],
        }
    }

    #[test]
    fn save_then_load_predicts_identically() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("out"));
        let artifacts = fitted();
        artifacts.save(&paths).unwrap();

        let restored = TrainedArtifacts::load(&paths).unwrap();
        assert_eq!(restored.feature_names, artifacts.feature_names);
        assert_eq!(restored.scaler, artifacts.scaler);
        let sample = restored.scaler.transform(&[2.5, 6.0]).unwrap();
        assert_eq!(
            restored.model.predict_proba(&sample).unwrap(),
            artifacts.model.predict_proba(&sample).unwrap()
        );
    }

    #[test]
    fn artifacts_use_the_served_file_names() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fitted().save(&paths).unwrap();
        for name in ["cancer_model.pkl", "scaler.pkl", "feature_names.pkl"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let err = TrainedArtifacts::load(&paths).unwrap_err();
        assert!(err.to_string().contains(MODEL_FILE));
    }

    #[test]
    fn corrupt_file_is_a_codec_error() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fitted().save(&paths).unwrap();
        fs::write(&paths.scaler, b"not a scaler").unwrap();
        assert!(matches!(
            TrainedArtifacts::load(&paths),
            Err(ArtifactError::Codec { kind: "scaler", .. })
        ));
    }

    #[test]
    fn inconsistent_names_are_rejected() {
        let mut artifacts = fitted();
        artifacts.feature_names.push("extra".into());
        assert!(matches!(
            artifacts.validate(),
            Err(ArtifactError::Inconsistent { model: 2, scaler: 2, names: 3 })
        ));
    }
}
