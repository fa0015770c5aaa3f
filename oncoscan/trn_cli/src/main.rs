use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oncoscan_learning::{
    ArtifactPaths, Dataset, FeatureScaler, ForestParams, TrainedArtifacts, TrainingPipeline,
    BENIGN, MALIGNANT,
};
use serde_json::{json, Value};
use shared_logging::{JsonLogger, LogLevel};
use uuid::Uuid;

const RULE: &str = "============================================================";

#[derive(Parser, Debug)]
#[command(name = "trn", version, about = "Breast cancer classifier trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Trains the forest and writes model, scaler, and feature-name artifacts.
    Train(TrainArgs),
    /// Summarises previously written artifacts.
    Inspect {
        /// Directory holding the artifacts.
        #[arg(long, default_value = ".")]
        artifact_dir: PathBuf,
        /// Number of importances to list.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[derive(Parser, Debug)]
struct TrainArgs {
    /// UCI `wdbc.data` file; the embedded dataset is used when omitted.
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Directory receiving the artifacts.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Seed for the split and the forest.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 0.2)]
    test_ratio: f64,
    #[arg(long, default_value_t = 100)]
    trees: u16,
    #[arg(long, default_value_t = 10)]
    max_depth: u16,
    #[arg(long, default_value_t = 5)]
    min_samples_split: usize,
    /// Number of importances to print.
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Optional JSON-lines run log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl TrainArgs {
    fn pipeline(&self) -> TrainingPipeline {
        TrainingPipeline {
            forest: ForestParams {
                n_trees: self.trees,
                max_depth: Some(self.max_depth),
                min_samples_split: self.min_samples_split,
                max_features: None,
                seed: self.seed,
            },
            test_ratio: self.test_ratio,
            split_seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Train(args) => handle_train(&args),
        Commands::Inspect { artifact_dir, top } => handle_inspect(&artifact_dir, top),
    }
}

/// Run log that is silently skipped when no file was requested.
struct RunLog {
    run_id: Uuid,
    logger: Option<JsonLogger>,
}

impl RunLog {
    fn open(path: Option<&Path>) -> Result<Self> {
        let logger = path
            .map(|path| {
                JsonLogger::new(path, "trn")
                    .with_context(|| format!("opening run log {}", path.display()))
            })
            .transpose()?;
        Ok(Self {
            run_id: Uuid::new_v4(),
            logger,
        })
    }

    fn record(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.logger {
            let mut metadata = metadata;
            if let Value::Object(map) = &mut metadata {
                map.insert("run_id".into(), Value::String(self.run_id.to_string()));
            }
            logger.event(level, message, metadata)?;
        }
        Ok(())
    }
}

fn handle_train(args: &TrainArgs) -> Result<()> {
    let run_log = RunLog::open(args.log_file.as_deref())?;

    println!("{RULE}");
    println!("CANCER DETECTION - ML MODEL TRAINING");
    println!("{RULE}");

    let dataset = match &args.dataset {
        Some(path) => Dataset::from_wdbc_csv(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => Dataset::breast_cancer(),
    };
    let counts = dataset.class_counts();
    println!("\n✓ Dataset Loaded!");
    println!("  - Total Patients: {}", dataset.len());
    println!("  - Features: {}", dataset.feature_dim());
    println!("  - Cancer: {}", counts[usize::from(MALIGNANT)]);
    println!("  - No Cancer: {}", counts[usize::from(BENIGN)]);
    println!("\n✓ {} Cell Features:", dataset.feature_names.len());
    println!("{}", "-".repeat(60));
    for (idx, name) in dataset.feature_names.iter().enumerate() {
        println!("  {:2}. {name}", idx + 1);
    }
    run_log.record(
        LogLevel::Info,
        "dataset loaded",
        json!({
            "source": args
                .dataset
                .as_ref()
                .map_or_else(|| "embedded".to_string(), |path| path.display().to_string()),
            "samples": dataset.len(),
            "features": dataset.feature_dim(),
            "malignant": counts[usize::from(MALIGNANT)],
            "benign": counts[usize::from(BENIGN)],
        }),
    )?;

    let pipeline = args.pipeline();
    println!("\n⏳ Training model...");
    let outcome = pipeline.run(&dataset).context("training pipeline failed")?;
    let report = &outcome.report;
    println!(
        "✓ Training: {}, Testing: {}",
        report.train_samples, report.test_samples
    );
    println!("✓ Features normalized");
    println!("✓ Training complete!");

    println!("\n{RULE}");
    println!("RESULTS");
    println!("{RULE}");
    println!("\n✓ Accuracy: {:.2}%", report.accuracy * 100.0);
    println!("\n✓ Confusion Matrix:");
    println!("{}", report.confusion.render());
    println!("\n✓ Top {} Important Features:", args.top.min(report.importances.len()));
    for (name, importance) in report.importances.iter().take(args.top) {
        println!("  {name:30}: {:5.2}%", importance * 100.0);
    }
    run_log.record(
        LogLevel::Info,
        "training complete",
        json!({
            "summary": report.summary(),
            "params": report.params,
            "train_samples": report.train_samples,
            "test_samples": report.test_samples,
            "accuracy": report.accuracy,
            "confusion_matrix": report.confusion.cells,
        }),
    )?;

    println!("\n⏳ Saving files...");
    let paths = ArtifactPaths::in_dir(&args.out_dir);
    if let Err(err) = outcome.artifacts.save(&paths) {
        let metadata = json!({ "error": err.to_string() });
        run_log.record(LogLevel::Error, "saving artifacts failed", metadata)?;
        return Err(err).context("saving artifacts");
    }
    for path in [&paths.model, &paths.scaler, &paths.feature_names] {
        println!("✓ {} - saved", path.display());
    }
    run_log.record(
        LogLevel::Info,
        "artifacts saved",
        json!({
            "model": paths.model,
            "scaler": paths.scaler,
            "feature_names": paths.feature_names,
        }),
    )?;

    println!("\n{RULE}");
    println!("TRAINING COMPLETE!");
    println!("{RULE}\n");
    Ok(())
}

fn handle_inspect(artifact_dir: &Path, top: usize) -> Result<()> {
    let paths = ArtifactPaths::in_dir(artifact_dir);
    let artifacts = TrainedArtifacts::load(&paths)
        .with_context(|| format!("loading artifacts from {}", artifact_dir.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "artifact_dir": artifact_dir,
            "trees": artifacts.model.n_trees(),
            "features": artifacts.scaler.dimension(),
            "params": artifacts.model.params(),
            "feature_names": artifacts.feature_names,
        }))?
    );
    println!("\nTop {top} Important Features:");
    for (name, importance) in artifacts
        .model
        .ranked_importances(&artifacts.feature_names)
        .into_iter()
        .take(top)
    {
        println!("  {name:30}: {:5.2}%", importance * 100.0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn train_defaults_match_reference_setup() {
        let cli = Cli::parse_from(["trn", "train"]);
        let Commands::Train(args) = cli.command else {
            panic!("expected train command");
        };
        let pipeline = args.pipeline();
        assert_eq!(pipeline, TrainingPipeline::default());
        assert_eq!(args.out_dir, PathBuf::from("."));
    }

    #[test]
    fn inspect_reads_saved_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = TrainingPipeline {
            forest: ForestParams {
                n_trees: 5,
                ..ForestParams::default()
            },
            ..TrainingPipeline::default()
        };
        let outcome = pipeline.run(&Dataset::breast_cancer()).unwrap();
        outcome.artifacts.save(&ArtifactPaths::in_dir(dir.path())).unwrap();
        handle_inspect(dir.path(), 3).unwrap();
        assert!(handle_inspect(&dir.path().join("missing"), 3).is_err());
    }

    #[test]
    fn run_log_tags_records_with_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        let run_log = RunLog::open(Some(path.as_path())).unwrap();
        run_log.record(LogLevel::Info, "dataset loaded", json!({ "samples": 3 })).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(&run_log.run_id.to_string()));
        assert!(content.contains("\"module\":\"trn\""));
    }
}
