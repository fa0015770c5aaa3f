/// Raw-measurement threshold that marks a feature as high risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskRule {
    /// Index into the 30-feature vector.
    pub feature: usize,
    /// Values strictly above this are flagged.
    pub threshold: f64,
    /// Name used when the loaded feature names do not cover `feature`.
    pub fallback_name: &'static str,
}

impl RiskRule {
    /// Whether the raw vector trips this rule.
    #[must_use]
    pub fn triggered(&self, features: &[f64]) -> bool {
        features
            .get(self.feature)
            .is_some_and(|&value| value > self.threshold)
    }
}

/// Rules in reporting order.
pub const RISK_RULES: [RiskRule; 4] = [
    RiskRule {
        feature: 0,
        threshold: 14.0,
        fallback_name: "mean radius",
    },
    RiskRule {
        feature: 20,
        threshold: 16.0,
        fallback_name: "worst radius",
    },
    RiskRule {
        feature: 23,
        threshold: 880.0,
        fallback_name: "worst area",
    },
    RiskRule {
        feature: 26,
        threshold: 0.25,
        fallback_name: "worst concavity",
    },
];

/// Names of the features whose raw values exceed their rule thresholds.
///
/// Evaluated on unscaled input and independent of the classifier.
#[must_use]
pub fn high_risk_features(features: &[f64], feature_names: &[String]) -> Vec<String> {
    RISK_RULES
        .iter()
        .filter(|rule| rule.triggered(features))
        .map(|rule| {
            feature_names
                .get(rule.feature)
                .cloned()
                .unwrap_or_else(|| rule.fallback_name.to_string())
        })
        .collect()
}
