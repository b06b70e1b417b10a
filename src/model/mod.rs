//! Classifier adapters over the trained model artifact.

mod forest;
mod onnx;

pub use forest::{ForestClassifier, ForestModel, TreeArrays};
pub use onnx::OnnxClassifier;

use crate::artifact::Artifact;
use crate::config::{ModelConfig, ModelFormat};
use crate::error::{InferenceError, ModelLoadError};
use crate::features::FeatureVector;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Probability of the positive class together with the hard label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub class: u8,
}

/// A trained binary classifier. Implementations hold no per-call state, so
/// identical vectors always yield identical outputs.
pub trait Classifier: Send + Sync {
    /// Positive-class probability in [0, 1].
    fn predict_probability(&self, vector: &FeatureVector) -> Result<f64, InferenceError>;

    /// The model's own decision, 0 or 1.
    fn predict_class(&self, vector: &FeatureVector) -> Result<u8, InferenceError>;

    /// Both outputs; adapters that get them from one pass override this.
    fn evaluate(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        Ok(Prediction {
            probability: self.predict_probability(vector)?,
            class: self.predict_class(vector)?,
        })
    }
}

/// Loads the classifier artifact named by the config.
pub struct ModelStore;

impl ModelStore {
    pub fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        let path = config.path.as_path();
        if !path.exists() {
            return Err(ModelLoadError::NotFound(path.to_path_buf()));
        }
        let format = match config.format {
            Some(f) => f,
            None => Self::infer_format(path)?,
        };
        let artifact = Artifact::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        artifact
            .verify(config.expected_sha256.as_deref())
            .map_err(|(expected, actual)| ModelLoadError::DigestMismatch { expected, actual })?;

        let classifier: Arc<dyn Classifier> = match format {
            ModelFormat::Onnx => Arc::new(OnnxClassifier::from_bytes(
                &artifact.bytes,
                &config.label_output,
                &config.probability_output,
            )?),
            ModelFormat::ForestJson => Arc::new(ForestClassifier::from_slice(&artifact.bytes)?),
        };
        info!(
            path = %path.display(),
            sha256 = %artifact.sha256,
            format = ?format,
            "classifier loaded"
        );
        Ok(classifier)
    }

    fn infer_format(path: &Path) -> Result<ModelFormat, ModelLoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("onnx") => Ok(ModelFormat::Onnx),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ModelFormat::ForestJson),
            _ => Err(ModelLoadError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
