use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Address the server binds to and where it finds the trained artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// TCP port, also reported by `GET /`.
    pub port: u16,
    /// Directory holding `cancer_model.bin`, `scaler.bin`, and `feature_names.bin`.
    pub artifact_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5001,
            artifact_dir: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading server config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        if config.host.trim().is_empty() {
            bail!("host must not be empty");
        }
        Ok(config)
    }

    /// Applies command-line or environment overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        artifact_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(dir) = artifact_dir {
            self.artifact_dir = dir;
        }
        self
    }

    /// `host:port` string accepted by `TcpListener::bind`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:5001");
        assert_eq!(config.artifact_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml("port = 8080\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn overrides_win_over_file() {
        let config = ServerConfig::from_toml("host = \"127.0.0.1\"\nartifact_dir = \"models\"\n")
            .unwrap()
            .with_overrides(None, Some(6000), Some(PathBuf::from("/srv/models")));
        assert_eq!(config.bind_address(), "127.0.0.1:6000");
        assert_eq!(config.artifact_dir, PathBuf::from("/srv/models"));
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(ServerConfig::from_toml("port = \"high\"").is_err());
        assert!(ServerConfig::from_toml("host = \"  \"").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(dir.path().join("server.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("server.toml"));
    }
}
