//! Mapped features → vector in exact schema order.
//!
//! Schema columns the mapper did not produce are filled with `0.0`, and
//! mapped features the schema does not list are dropped. Both are intended:
//! the schema and the mapper are versioned independently, so neither side
//! rejects the other's extra columns.

use super::{FeatureSchema, FeatureVector, MappedFeatures};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaAligner;

impl SchemaAligner {
    pub fn new() -> Self {
        Self
    }

    pub fn align(&self, schema: &FeatureSchema, mapped: &MappedFeatures) -> FeatureVector {
        let mut defaulted = 0usize;
        let values: Vec<f64> = schema
            .names()
            .iter()
            .map(|name| {
                mapped.get(name).unwrap_or_else(|| {
                    defaulted += 1;
                    0.0
                })
            })
            .collect();

        let dropped = mapped
            .iter()
            .filter(|(name, _)| schema.position(name).is_none())
            .count();
        if defaulted > 0 || dropped > 0 {
            debug!(defaulted, dropped, columns = schema.len(), "aligned with default-fill");
        }

        FeatureVector::from_parts(schema.shared(), values)
    }
}

impl FeatureSchema {
    /// Shorthand for [`SchemaAligner::align`].
    pub fn align(&self, mapped: &MappedFeatures) -> FeatureVector {
        SchemaAligner.align(self, mapped)
    }
}
