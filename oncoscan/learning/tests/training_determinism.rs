use oncoscan_learning::{
    Classifier, Dataset, FeatureScaler, TrainingOutcome, TrainingPipeline, FEATURE_COUNT,
};

fn train_once(dataset: &Dataset) -> TrainingOutcome {
    TrainingPipeline::default().run(dataset).unwrap()
}

#[test]
fn same_seed_reproduces_metrics() {
    let dataset = Dataset::breast_cancer();
    let a = train_once(&dataset);
    let b = train_once(&dataset);
    assert_eq!(a.report.accuracy, b.report.accuracy);
    assert_eq!(a.report.confusion, b.report.confusion);
    assert_eq!(a.report.importances, b.report.importances);
}

#[test]
fn forest_generalises_on_held_out_split() {
    let dataset = Dataset::breast_cancer();
    let outcome = train_once(&dataset);
    assert_eq!(outcome.report.train_samples, 455);
    assert_eq!(outcome.report.confusion.total(), 114);
    assert!(
        outcome.report.accuracy > 0.9,
        "held-out accuracy {}",
        outcome.report.accuracy
    );

    let artifacts = &outcome.artifacts;
    assert_eq!(artifacts.model.n_trees(), 100);
    assert_eq!(artifacts.scaler.dimension(), FEATURE_COUNT);
    assert_eq!(artifacts.feature_names.len(), FEATURE_COUNT);

    let scaled = artifacts
        .scaler
        .transform(&dataset.samples[0].features)
        .unwrap();
    let proba = artifacts.model.predict_proba(&scaled).unwrap();
    assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);
}
