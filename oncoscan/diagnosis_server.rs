use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use oncoscan_serving::{build_router, AppState, ServerConfig};
use shared_logging::init_tracing;
use tracing::{error, info};

/// Breast cancer diagnosis HTTP server.
#[derive(Parser, Debug)]
#[command(name = "diagnosis_server", version, about)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(long, env = "ONCOSCAN_CONFIG")]
    config: Option<PathBuf>,
    /// Interface to bind (default 0.0.0.0).
    #[arg(long, env = "ONCOSCAN_HOST")]
    host: Option<String>,
    /// Port to bind (default 5001).
    #[arg(long, env = "ONCOSCAN_PORT")]
    port: Option<u16>,
    /// Directory containing the trained artifacts (default `.`).
    #[arg(long, env = "ONCOSCAN_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,
}

impl Args {
    fn resolve(self) -> Result<ServerConfig> {
        let base = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        Ok(base.with_overrides(self.host, self.port, self.artifact_dir))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info");
    let config = Args::parse().resolve()?;

    info!(artifact_dir = %config.artifact_dir.display(), "loading model files");
    let state = match AppState::load(&config.artifact_dir, config.port) {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, "loading model files failed");
            return Err(err).context("server cannot start without trained artifacts");
        }
    };
    info!(features = state.feature_names().len(), "model loaded");

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "diagnosis server listening; endpoint POST /api/predict");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;
    info!("diagnosis server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
