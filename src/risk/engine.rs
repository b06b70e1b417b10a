//! Maps classifier output to a risk tier with configurable thresholds.
//!
//! The tier follows the probability while the message follows the hard
//! class label. Near the decision boundary the two can disagree (e.g. a
//! Moderate tier with the consult message); they are reported as computed.

use crate::config::RiskConfig;
use crate::model::Prediction;
use serde::{Deserialize, Serialize};

pub const CONSULT_MESSAGE: &str = "🔔 Consult a gynecologist.";
pub const LOW_RISK_MESSAGE: &str = "👍 Low risk. Maintain a healthy lifestyle.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Normal,
    Moderate,
    High,
}

impl RiskTier {
    /// Tier for a percentage already rounded by [`round_percent`].
    /// Boundary values fall into the lower tier.
    pub fn from_percent(percent: f64, config: &RiskConfig) -> Self {
        if percent <= config.normal_max_percent {
            RiskTier::Normal
        } else if percent <= config.moderate_max_percent {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Normal => "Normal",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Label shown to the patient.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Normal => "✅ Normal",
            RiskTier::Moderate => "⚠ Moderate Risk",
            RiskTier::High => "❗ High Risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `probability × 100` to two decimals, ties to even.
pub fn round_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub probability: f64,
    pub risk_percent: f64,
    pub predicted_class: u8,
    pub risk_tier: RiskTier,
    pub message: String,
}

pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn assess(&self, prediction: Prediction) -> InferenceResult {
        let risk_percent = round_percent(prediction.probability);
        let risk_tier = RiskTier::from_percent(risk_percent, &self.config);
        let message = if prediction.class != 0 {
            CONSULT_MESSAGE
        } else {
            LOW_RISK_MESSAGE
        };
        InferenceResult {
            probability: prediction.probability,
            risk_percent,
            predicted_class: prediction.class,
            risk_tier,
            message: message.to_string(),
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
