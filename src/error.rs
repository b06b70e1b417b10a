//! Error taxonomy. Load errors are startup-fatal; coercion and inference
//! errors fail a single request.

use std::path::PathBuf;

/// A config file exists but cannot be used; startup-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("feature schema not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read feature schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feature schema is not a JSON array of strings: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("feature schema is empty")]
    Empty,

    #[error("feature schema lists {0:?} more than once")]
    DuplicateName(String),

    #[error("feature schema digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("classifier artifact not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read classifier {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ONNX runtime rejected classifier: {0}")]
    Onnx(#[from] ort::Error),

    #[error("malformed classifier artifact: {0}")]
    Malformed(String),

    #[error("cannot infer classifier format from {0}")]
    UnsupportedFormat(PathBuf),

    #[error("classifier digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

impl From<serde_json::Error> for ModelLoadError {
    fn from(e: serde_json::Error) -> Self {
        ModelLoadError::Malformed(e.to_string())
    }
}

/// A required observation field is absent or not convertible.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("missing required field `{field}`")]
    Missing { field: &'static str },

    #[error("field `{field}` has invalid value {value}: expected {expected}")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl CoercionError {
    /// Raw field name that caused the rejection.
    pub fn field(&self) -> &'static str {
        match self {
            CoercionError::Missing { field } => *field,
            CoercionError::Invalid { field, .. } => *field,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("ONNX inference failed: {0}")]
    Onnx(#[from] ort::Error),

    #[error("classifier output `{0}` missing")]
    MissingOutput(String),

    #[error("classifier expects {expected} features, vector has {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("classifier output malformed: {0}")]
    Malformed(String),
}

/// Per-request failure.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Failure to build the inference context; the process must not serve.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaLoadError),

    #[error(transparent)]
    Model(#[from] ModelLoadError),
}
