//! Typed request boundary: one patient observation as submitted by a form.
//!
//! Every field is kept as a loosely-typed [`RawValue`] so that malformed
//! input surfaces as a [`CoercionError`] naming the field, rather than as an
//! opaque deserialization failure.

use crate::error::CoercionError;
use serde::{Deserialize, Serialize};

/// A single JSON scalar as received. Non-scalars land in `Other` and are
/// rejected during coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Integer coercion: floats truncate toward zero, strings parse base-10.
    pub fn to_int(&self, field: &'static str) -> Result<i64, CoercionError> {
        match self {
            RawValue::Int(i) => Ok(*i),
            RawValue::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => {
                Ok(f.trunc() as i64)
            }
            RawValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.invalid(field, "an integer")),
            _ => Err(self.invalid(field, "an integer")),
        }
    }

    /// Float coercion: numbers as-is, strings parsed; result must be finite.
    pub fn to_float(&self, field: &'static str) -> Result<f64, CoercionError> {
        let v = match self {
            RawValue::Int(i) => *i as f64,
            RawValue::Float(f) => *f,
            RawValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(field, "a number"))?,
            _ => return Err(self.invalid(field, "a number")),
        };
        if v.is_finite() {
            Ok(v)
        } else {
            Err(self.invalid(field, "a finite number"))
        }
    }

    /// `0`, `0.0`, `""` and `false` count as "not provided".
    pub fn is_falsy(&self) -> bool {
        match self {
            RawValue::Int(i) => *i == 0,
            RawValue::Float(f) => *f == 0.0,
            RawValue::Bool(b) => !b,
            RawValue::Text(s) => s.is_empty(),
            RawValue::Other(v) => match v {
                serde_json::Value::Null => true,
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
                _ => false,
            },
        }
    }

    /// Exact, case-sensitive string match. Non-strings never match.
    pub fn is_text(&self, expected: &str) -> bool {
        matches!(self, RawValue::Text(s) if s == expected)
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> CoercionError {
        let value = match self {
            RawValue::Int(i) => i.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Text(s) => format!("{:?}", s),
            RawValue::Other(v) => v.to_string(),
        };
        CoercionError::Invalid {
            field,
            value,
            expected,
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Patient-reported form fields. `None` means absent or `null`.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawObservation {
    pub age: Option<RawValue>,
    /// kg
    pub weight: Option<RawValue>,
    /// cm
    pub height: Option<RawValue>,
    /// Derived from weight and height when absent or falsy
    pub bmi: Option<RawValue>,
    pub waist_hip_ratio: Option<RawValue>,
    /// "R" (regular) or "I" (irregular)
    pub cycle: Option<RawValue>,
    /// days
    pub cycle_length: Option<RawValue>,
    pub hair_growth: Option<RawValue>,
    pub weight_gain: Option<RawValue>,
    pub pimples: Option<RawValue>,
    pub hair_loss: Option<RawValue>,
    pub skin_darkening: Option<RawValue>,
    /// Times per week
    pub fast_food: Option<RawValue>,
    pub exercise: Option<RawValue>,
}

impl RawObservation {
    /// Parse one JSON object. Field-level problems are deferred to coercion.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Fetch a required field or report it missing.
pub(crate) fn required<'a>(
    value: &'a Option<RawValue>,
    field: &'static str,
) -> Result<&'a RawValue, CoercionError> {
    value.as_ref().ok_or(CoercionError::Missing { field })
}
