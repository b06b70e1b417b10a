//! Probability → risk tier and user-facing message.

mod engine;

pub use engine::{round_percent, InferenceResult, RiskEngine, RiskTier, CONSULT_MESSAGE, LOW_RISK_MESSAGE};
