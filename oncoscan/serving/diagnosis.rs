use oncoscan_learning::{BENIGN, MALIGNANT};
use serde::{Deserialize, Serialize};

const URGENT_RECOMMENDATION: &str =
    "⚠️ URGENT: Immediate consultation with oncologist recommended. Further diagnostic tests required.";
const ROUTINE_RECOMMENDATION: &str =
    "✓ Results appear normal. Continue regular screening as recommended by healthcare provider.";

/// Diagnosis derived from the classifier's class probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    /// Label 0.
    Malignant,
    /// Label 1.
    Benign,
}

/// Binary risk level reported alongside the diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Malignant prediction.
    High,
    /// Benign prediction.
    Low,
}

impl Diagnosis {
    /// Picks the more probable class; a tie is reported as malignant.
    #[must_use]
    pub fn from_proba(proba: [f64; 2]) -> Self {
        if proba[usize::from(BENIGN)] > proba[usize::from(MALIGNANT)] {
            Self::Benign
        } else {
            Self::Malignant
        }
    }

    /// Class index of this diagnosis in a probability pair.
    #[must_use]
    pub const fn label(self) -> u8 {
        match self {
            Self::Malignant => MALIGNANT,
            Self::Benign => BENIGN,
        }
    }

    /// Headline shown to the clinician.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Malignant => "CANCER DETECTED",
            Self::Benign => "NO CANCER DETECTED",
        }
    }

    /// `High` for malignant, `Low` otherwise.
    #[must_use]
    pub const fn risk_level(self) -> RiskLevel {
        match self {
            Self::Malignant => RiskLevel::High,
            Self::Benign => RiskLevel::Low,
        }
    }

    /// Fixed follow-up advice.
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Malignant => URGENT_RECOMMENDATION,
            Self::Benign => ROUTINE_RECOMMENDATION,
        }
    }

    /// Probability of this class as a percentage rounded to two decimals.
    #[must_use]
    pub fn confidence(self, proba: [f64; 2]) -> f64 {
        let percent = proba[usize::from(self.label())].clamp(0.0, 1.0) * 100.0;
        (percent * 100.0).round() / 100.0
    }
}

/// `result` object of a successful prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    /// Headline text.
    pub prediction: String,
    /// `Malignant` or `Benign`.
    pub diagnosis: Diagnosis,
    /// Percentage in `[0, 100]`.
    pub confidence: f64,
    /// `High` iff malignant.
    pub risk_level: RiskLevel,
    /// Names of features over their risk thresholds.
    pub high_risk_features: Vec<String>,
    /// Follow-up advice.
    pub recommendation: String,
}

impl DiagnosisResult {
    /// Assembles the result for a diagnosis, its class probabilities, and risk flags.
    #[must_use]
    pub fn new(diagnosis: Diagnosis, proba: [f64; 2], high_risk_features: Vec<String>) -> Self {
        Self {
            prediction: diagnosis.headline().to_string(),
            diagnosis,
            confidence: diagnosis.confidence(proba),
            risk_level: diagnosis.risk_level(),
            high_risk_features,
            recommendation: diagnosis.recommendation().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn more_probable_class_wins_and_ties_are_malignant() {
        assert_eq!(Diagnosis::from_proba([0.7, 0.3]), Diagnosis::Malignant);
        assert_eq!(Diagnosis::from_proba([0.2, 0.8]), Diagnosis::Benign);
        assert_eq!(Diagnosis::from_proba([0.5, 0.5]), Diagnosis::Malignant);
    }

    #[test]
    fn confidence_uses_predicted_class_and_rounds() {
        assert!((Diagnosis::Malignant.confidence([0.87654, 0.12346]) - 87.65).abs() < 1e-9);
        assert!((Diagnosis::Benign.confidence([0.03, 0.97]) - 97.0).abs() < 1e-9);
        assert!((Diagnosis::Benign.confidence([0.0, 1.0]) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn result_serializes_with_wire_names() {
        let result = DiagnosisResult::new(Diagnosis::Malignant, [0.9, 0.1], vec!["mean radius".into()]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["prediction"], "CANCER DETECTED");
        assert_eq!(value["diagnosis"], "Malignant");
        assert_eq!(value["riskLevel"], "High");
        assert_eq!(value["confidence"], json!(90.0));
        assert_eq!(value["highRiskFeatures"], json!(["mean radius"]));
        assert!(value["recommendation"].as_str().unwrap().starts_with("⚠️ URGENT"));
    }

    #[test]
    fn benign_is_low_risk() {
        let result = DiagnosisResult::new(Diagnosis::Benign, [0.2, 0.8], Vec::new());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.prediction, "NO CANCER DETECTED");
        assert!(result.recommendation.starts_with("✓ Results appear normal"));
    }
}
