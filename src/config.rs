//! Service configuration. Artifact locations, risk thresholds and logging.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Trained classifier artifact
    pub model: ModelConfig,
    /// Ordered feature-name artifact produced alongside the model
    pub schema: SchemaConfig,
    /// Risk tier thresholds
    pub risk: RiskConfig,
    /// Logging
    pub log: LogConfig,
}

/// On-disk classifier encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// skl2onnx export with `zipmap=False`
    Onnx,
    /// Tree arrays dumped from a fitted random forest
    ForestJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Inferred from the file extension when unset
    pub format: Option<ModelFormat>,
    /// Hex SHA-256 the artifact must match, if pinned
    pub expected_sha256: Option<String>,
    /// ONNX output carrying the hard class label
    pub label_output: String,
    /// ONNX output carrying per-class probabilities
    pub probability_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub path: PathBuf,
    pub expected_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Percentages at or below this are Normal (0.0–100.0)
    pub normal_max_percent: f64,
    /// Percentages at or below this (and above normal) are Moderate
    pub moderate_max_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            schema: SchemaConfig::default(),
            risk: RiskConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model/pcos_model.onnx"),
            format: None,
            expected_sha256: None,
            label_output: "output_label".to_string(),
            probability_output: "output_probability".to_string(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model/columns.json"),
            expected_sha256: None,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            normal_max_percent: 30.0,
            moderate_max_percent: 70.0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl RiskConfig {
    /// Thresholds must be finite percentages with Normal below Moderate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (normal, moderate) = (self.normal_max_percent, self.moderate_max_percent);
        for v in [normal, moderate] {
            if !(0.0..=100.0).contains(&v) {
                return Err(ConfigError::Invalid(format!(
                    "risk threshold {} is outside 0-100",
                    v
                )));
            }
        }
        if normal > moderate {
            return Err(ConfigError::Invalid(format!(
                "normal_max_percent {} exceeds moderate_max_percent {}",
                normal, moderate
            )));
        }
        Ok(())
    }
}

impl ServiceConfig {
    /// Load from JSON file if present; otherwise return default. A file that
    /// exists but fails to read, parse or validate is an error.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServiceConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        config.risk.validate()?;
        Ok(config)
    }
}
