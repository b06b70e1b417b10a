//! JSON request/response contract of the prediction endpoint, and the
//! newline-delimited batch loop built on it.

use crate::error::{CoercionError, PipelineError};
use crate::logging::StructuredLogger;
use crate::observation::RawObservation;
use crate::pipeline::InferenceContext;
use crate::risk::InferenceResult;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use tracing::warn;

/// Request body: the observation fields at top level.
pub type PredictRequest = RawObservation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub risk_percent: f64,
    pub risk_level: String,
    pub prediction: u8,
    pub message: String,
}

impl From<&InferenceResult> for PredictResponse {
    fn from(r: &InferenceResult) -> Self {
        Self {
            risk_percent: r.risk_percent,
            risk_level: r.risk_tier.label().to_string(),
            prediction: r.predicted_class,
            message: r.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Offending raw field for coercion failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }
}

impl From<&CoercionError> for ErrorResponse {
    fn from(e: &CoercionError) -> Self {
        Self {
            error: e.to_string(),
            field: Some(e.field().to_string()),
        }
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(e: &PipelineError) -> Self {
        match e {
            PipelineError::Coercion(c) => c.into(),
            PipelineError::Inference(_) => Self {
                error: e.to_string(),
                field: None,
            },
        }
    }
}

impl From<&serde_json::Error> for ErrorResponse {
    fn from(e: &serde_json::Error) -> Self {
        Self {
            error: format!("request is not a JSON object: {}", e),
            field: None,
        }
    }
}

/// Counts from one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub scored: u64,
    pub rejected: u64,
}

/// Score newline-delimited JSON requests, writing one response line per
/// non-blank input line. A line that is not UTF-8, not a JSON object or
/// fails coercion yields an [`ErrorResponse`] line and the batch continues;
/// only I/O errors on the streams themselves abort.
pub fn score_lines<R: BufRead, W: Write>(
    context: &InferenceContext,
    mut input: R,
    out: &mut W,
) -> std::io::Result<BatchStats> {
    let mut stats = BatchStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => score_line(context, line),
            Err(e) => Err(ErrorResponse::message(format!(
                "request is not valid UTF-8: {}",
                e
            ))),
        };
        match response {
            Ok(r) => {
                stats.scored += 1;
                StructuredLogger::emit_json(&r, &mut *out)?;
            }
            Err(e) => {
                stats.rejected += 1;
                warn!(error = %e.error, field = ?e.field, "request rejected");
                StructuredLogger::emit_json(&e, &mut *out)?;
            }
        }
        out.flush()?;
    }
    Ok(stats)
}

fn score_line(context: &InferenceContext, line: &str) -> Result<PredictResponse, ErrorResponse> {
    let obs = RawObservation::from_json(line).map_err(|e| ErrorResponse::from(&e))?;
    context
        .infer(&obs)
        .map(|r| PredictResponse::from(&r))
        .map_err(|e| ErrorResponse::from(&e))
}
