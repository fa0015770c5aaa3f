//! Canonical cell-measurement feature layout shared by the trainer and the server.

/// Number of measurements in every feature vector.
pub const FEATURE_COUNT: usize = 30;

/// Feature names in vector order (ten means, ten standard errors, ten worst values).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "mean radius",
    "mean texture",
    "mean perimeter",
    "mean area",
    "mean smoothness",
    "mean compactness",
    "mean concavity",
    "mean concave points",
    "mean symmetry",
    "mean fractal dimension",
    "radius error",
    "texture error",
    "perimeter error",
    "area error",
    "smoothness error",
    "compactness error",
    "concavity error",
    "concave points error",
    "symmetry error",
    "fractal dimension error",
    "worst radius",
    "worst texture",
    "worst perimeter",
    "worst area",
    "worst smoothness",
    "worst compactness",
    "worst concavity",
    "worst concave points",
    "worst symmetry",
    "worst fractal dimension",
];

/// Label emitted for malignant samples.
pub const MALIGNANT: u8 = 0;
/// Label emitted for benign samples.
pub const BENIGN: u8 = 1;

/// Returns the canonical feature names as owned strings.
#[must_use]
pub fn canonical_feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|name| (*name).to_string()).collect()
}
