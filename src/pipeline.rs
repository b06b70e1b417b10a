//! Observation → mapped features → aligned vector → classifier → risk tier.

use crate::config::ServiceConfig;
use crate::error::{PipelineError, StartupError};
use crate::features::{FeatureMapper, FeatureSchema, SchemaAligner};
use crate::model::{Classifier, ModelStore};
use crate::observation::RawObservation;
use crate::risk::{InferenceResult, RiskEngine};
use std::sync::Arc;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Pure pipeline over explicitly passed collaborators.
pub fn run_pipeline(
    obs: &RawObservation,
    schema: &FeatureSchema,
    classifier: &dyn Classifier,
    risk_engine: &RiskEngine,
) -> Result<InferenceResult, PipelineError> {
    let mapped = FeatureMapper.map(obs)?;
    let vector = SchemaAligner.align(schema, &mapped);
    let prediction = classifier.evaluate(&vector)?;
    Ok(risk_engine.assess(prediction))
}

/// Artifacts loaded once at startup and shared read-only by every request.
pub struct InferenceContext {
    schema: FeatureSchema,
    classifier: Arc<dyn Classifier>,
    risk_engine: RiskEngine,
}

impl InferenceContext {
    pub fn new(schema: FeatureSchema, classifier: Arc<dyn Classifier>, risk_engine: RiskEngine) -> Self {
        Self {
            schema,
            classifier,
            risk_engine,
        }
    }

    /// Check thresholds, load schema then classifier; any failure aborts startup.
    pub fn load(config: &ServiceConfig) -> Result<Self, StartupError> {
        config.risk.validate()?;
        let schema = FeatureSchema::load_with(&config.schema)?;
        let classifier = ModelStore::load_classifier(&config.model)?;
        info!(columns = schema.len(), "inference context ready");
        Ok(Self::new(schema, classifier, RiskEngine::new(config.risk.clone())))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn risk_engine(&self) -> &RiskEngine {
        &self.risk_engine
    }

    pub fn infer(&self, obs: &RawObservation) -> Result<InferenceResult, PipelineError> {
        let request_id = Uuid::new_v4();
        let _span = info_span!("infer", %request_id).entered();
        let result = run_pipeline(obs, &self.schema, self.classifier.as_ref(), &self.risk_engine);
        match &result {
            Ok(r) => debug!(
                risk_percent = r.risk_percent,
                tier = %r.risk_tier,
                prediction = r.predicted_class,
                "inference complete"
            ),
            Err(e) => debug!(error = %e, "inference rejected"),
        }
        result
    }
}
