//! ONNX Runtime inference. Input: [1, n_features] f32. Outputs: int64 label
//! and f32 [1, n_classes] probabilities (skl2onnx with `zipmap=False`).

use super::{Classifier, Prediction};
use crate::error::{InferenceError, ModelLoadError};
use crate::features::FeatureVector;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::sync::OnceLock;

/// Column of the probability output holding class 1.
const POSITIVE_CLASS: usize = 1;

static ORT_ENV: OnceLock<()> = OnceLock::new();

fn init_env() {
    ORT_ENV.get_or_init(|| {
        if let Err(e) = ort::init().with_name("pcos-risk").commit() {
            tracing::warn!(error = %e, "ORT environment init failed; using defaults");
        }
    });
}

pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    label_output: String,
    probability_output: String,
}

impl OnnxClassifier {
    pub fn from_bytes(
        model: &[u8],
        label_output: &str,
        probability_output: &str,
    ) -> Result<Self, ModelLoadError> {
        init_env();
        let session = Session::builder()?.commit_from_memory(model)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        for wanted in [label_output, probability_output] {
            if !session.outputs.iter().any(|o| o.name == wanted) {
                return Err(ModelLoadError::Malformed(format!(
                    "ONNX model has no output named `{}`",
                    wanted
                )));
            }
        }

        Ok(Self {
            session,
            input_name,
            label_output: label_output.to_string(),
            probability_output: probability_output.to_string(),
        })
    }

    fn run(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        let arr = Array2::from_shape_vec((1, vector.len()), vector.to_f32())
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        let input = Tensor::from_array(arr)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input]?)?;

        let probs = outputs
            .get(self.probability_output.as_str())
            .ok_or_else(|| InferenceError::MissingOutput(self.probability_output.clone()))?
            .try_extract_tensor::<f32>()?;
        let probability = probs
            .iter()
            .nth(POSITIVE_CLASS)
            .copied()
            .ok_or_else(|| {
                InferenceError::Malformed(format!(
                    "probability output has shape {:?}",
                    probs.shape()
                ))
            })?;

        let labels = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| InferenceError::MissingOutput(self.label_output.clone()))?
            .try_extract_tensor::<i64>()?;
        let class = match labels.iter().next().copied() {
            Some(0) => 0,
            Some(1) => 1,
            other => {
                return Err(InferenceError::Malformed(format!(
                    "label output {:?} is not 0 or 1",
                    other
                )))
            }
        };

        Ok(Prediction {
            probability: (probability as f64).clamp(0.0, 1.0),
            class,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_probability(&self, vector: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(self.run(vector)?.probability)
    }

    fn predict_class(&self, vector: &FeatureVector) -> Result<u8, InferenceError> {
        Ok(self.run(vector)?.class)
    }

    fn evaluate(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        self.run(vector)
    }
}
