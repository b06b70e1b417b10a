//! Feature construction: observation → mapped features → schema-aligned vector.

mod aligner;
pub mod mapper;
mod schema;

pub use aligner::SchemaAligner;
pub use mapper::{FeatureMapper, MappedFeatures};
pub use schema::FeatureSchema;

use std::sync::Arc;

/// One fully populated row in schema order, ready for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Columns and values must have equal length; the aligner is the only
    /// producer outside tests.
    pub(crate) fn from_parts(columns: Arc<[String]>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Positional values for `schema`; `None` when the lengths differ.
    pub fn with_values(schema: &FeatureSchema, values: Vec<f64>) -> Option<Self> {
        (values.len() == schema.len()).then(|| Self::from_parts(schema.shared(), values))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Single-precision copy for runtimes that take f32 input.
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }
}
