//! PCOS risk scoring core.
//!
//! Modular structure:
//! - [`config`] — Service configuration (artifact paths, thresholds, logging)
//! - [`error`] — Load, configuration and per-request error types
//! - [`artifact`] — Artifact reads with SHA-256 digests
//! - [`observation`] — Typed form fields as received
//! - [`features`] — Field coercion, BMI derivation, schema alignment
//! - [`model`] — Classifier adapters (ONNX, exported forest)
//! - [`risk`] — Probability → risk tier and message
//! - [`pipeline`] — Immutable inference context and the pure pipeline
//! - [`transport`] — JSON request/response contract and the ndjson batch loop
//! - [`logging`] — Structured JSON logging

pub mod artifact;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod observation;
pub mod pipeline;
pub mod risk;
pub mod transport;

pub use config::ServiceConfig;
pub use error::{CoercionError, ConfigError, InferenceError, ModelLoadError, PipelineError, SchemaLoadError, StartupError};
pub use features::{FeatureMapper, FeatureSchema, FeatureVector, SchemaAligner};
pub use model::{Classifier, ModelStore};
pub use observation::{RawObservation, RawValue};
pub use pipeline::{run_pipeline, InferenceContext};
pub use risk::{InferenceResult, RiskEngine, RiskTier};
pub use logging::StructuredLogger;
