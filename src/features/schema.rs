//! Ordered feature names the classifier was trained on.

use crate::artifact::Artifact;
use crate::config::SchemaConfig;
use crate::error::SchemaLoadError;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Immutable, cheaply cloneable column list. Defines both which features the
/// classifier accepts and their positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Arc<[String]>,
}

impl FeatureSchema {
    /// Build from names; rejects an empty list and duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self, SchemaLoadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(SchemaLoadError::Empty);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for n in &names {
            if !seen.insert(n.as_str()) {
                return Err(SchemaLoadError::DuplicateName(n.clone()));
            }
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Read a JSON array of strings, e.g. `["Age (yrs)", "Weight (Kg)", ...]`.
    pub fn load(path: &Path) -> Result<Self, SchemaLoadError> {
        Self::load_pinned(path, None)
    }

    /// Load per config, enforcing `expected_sha256` when set.
    pub fn load_with(config: &SchemaConfig) -> Result<Self, SchemaLoadError> {
        Self::load_pinned(&config.path, config.expected_sha256.as_deref())
    }

    fn load_pinned(path: &Path, expected_sha256: Option<&str>) -> Result<Self, SchemaLoadError> {
        if !path.exists() {
            return Err(SchemaLoadError::NotFound(path.to_path_buf()));
        }
        let artifact = Artifact::read(path).map_err(|source| SchemaLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        artifact
            .verify(expected_sha256)
            .map_err(|(expected, actual)| SchemaLoadError::DigestMismatch { expected, actual })?;

        let names: Vec<String> = serde_json::from_slice(&artifact.bytes)?;
        let schema = Self::new(names)?;
        info!(
            path = %path.display(),
            sha256 = %artifact.sha256,
            columns = schema.len(),
            "feature schema loaded"
        );
        Ok(schema)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub(crate) fn shared(&self) -> Arc<[String]> {
        Arc::clone(&self.names)
    }
}
