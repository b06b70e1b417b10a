//! Raw observation → named numeric features, independent of any schema.

use crate::error::CoercionError;
use crate::observation::{required, RawObservation, RawValue};

pub const AGE: &str = "Age (yrs)";
pub const WEIGHT: &str = "Weight (Kg)";
pub const HEIGHT: &str = "Height(Cm)";
pub const BMI: &str = "BMI";
pub const WAIST_HIP_RATIO: &str = "Waist:Hip Ratio";
pub const CYCLE: &str = "Cycle(R/I)";
pub const CYCLE_LENGTH: &str = "Cycle length(days)";
pub const HAIR_GROWTH: &str = "Hair growth(Y/N)";
pub const WEIGHT_GAIN: &str = "Weight gain(Y/N)";
pub const PIMPLES: &str = "Pimples(Y/N)";
pub const HAIR_LOSS: &str = "Hair loss(Y/N)";
pub const SKIN_DARKENING: &str = "Skin darkening (Y/N)";
pub const FAST_FOOD: &str = "Fast food (Y/N)";
pub const EXERCISE: &str = "Exercise(Y/N)";

/// Every feature name the mapper emits, in emission order.
pub const MAPPED_FEATURES: [&str; 14] = [
    AGE,
    WEIGHT,
    HEIGHT,
    BMI,
    WAIST_HIP_RATIO,
    CYCLE,
    CYCLE_LENGTH,
    HAIR_GROWTH,
    WEIGHT_GAIN,
    PIMPLES,
    HAIR_LOSS,
    SKIN_DARKENING,
    FAST_FOOD,
    EXERCISE,
];

/// Fast-food meals per week above which the flag is set.
const FAST_FOOD_WEEKLY_LIMIT: i64 = 2;

/// Named feature values produced from one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedFeatures {
    entries: Vec<(&'static str, f64)>,
}

impl MappedFeatures {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAPPED_FEATURES.len()),
        }
    }

    /// Insert or overwrite.
    pub fn set(&mut self, name: &'static str, value: f64) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MappedFeatures {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the per-field coercion rules and BMI derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureMapper;

impl FeatureMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, obs: &RawObservation) -> Result<MappedFeatures, CoercionError> {
        let mut out = MappedFeatures::new();

        out.set(AGE, required(&obs.age, "age")?.to_int("age")? as f64);
        let weight = required(&obs.weight, "weight")?.to_float("weight")?;
        let height = required(&obs.height, "height")?.to_float("height")?;
        out.set(WEIGHT, weight);
        out.set(HEIGHT, height);
        let bmi = optional_float(&obs.bmi, "bmi")?;
        out.set(BMI, bmi);
        out.set(
            WAIST_HIP_RATIO,
            required(&obs.waist_hip_ratio, "waist_hip_ratio")?.to_float("waist_hip_ratio")?,
        );
        out.set(CYCLE, flag(required(&obs.cycle, "cycle")?, "R"));
        out.set(
            CYCLE_LENGTH,
            required(&obs.cycle_length, "cycle_length")?.to_int("cycle_length")? as f64,
        );
        out.set(HAIR_GROWTH, yes(&obs.hair_growth, "hair_growth")?);
        out.set(WEIGHT_GAIN, yes(&obs.weight_gain, "weight_gain")?);
        out.set(PIMPLES, yes(&obs.pimples, "pimples")?);
        out.set(HAIR_LOSS, yes(&obs.hair_loss, "hair_loss")?);
        out.set(SKIN_DARKENING, yes(&obs.skin_darkening, "skin_darkening")?);
        let fast_food = required(&obs.fast_food, "fast_food")?.to_int("fast_food")?;
        out.set(
            FAST_FOOD,
            if fast_food > FAST_FOOD_WEEKLY_LIMIT { 1.0 } else { 0.0 },
        );
        out.set(EXERCISE, yes(&obs.exercise, "exercise")?);

        if bmi == 0.0 {
            out.set(BMI, derive_bmi(weight, height)?);
        }
        Ok(out)
    }
}

/// kg / m². Height is in centimetres and must be positive.
pub fn derive_bmi(weight_kg: f64, height_cm: f64) -> Result<f64, CoercionError> {
    if height_cm <= 0.0 {
        return Err(CoercionError::Invalid {
            field: "height",
            value: height_cm.to_string(),
            expected: "a positive height to derive BMI",
        });
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

fn optional_float(value: &Option<RawValue>, field: &'static str) -> Result<f64, CoercionError> {
    match value {
        Some(v) if !v.is_falsy() => v.to_float(field),
        _ => Ok(0.0),
    }
}

fn flag(value: &RawValue, expected: &str) -> f64 {
    if value.is_text(expected) {
        1.0
    } else {
        0.0
    }
}

fn yes(value: &Option<RawValue>, field: &'static str) -> Result<f64, CoercionError> {
    Ok(flag(required(value, field)?, "yes"))
}
