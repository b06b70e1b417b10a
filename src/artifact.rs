//! Training artifacts on disk: read once at startup, hashed for audit.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Contents and hex SHA-256 of a read artifact.
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

impl Artifact {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        Ok(Self { bytes, sha256 })
    }

    /// Compare against a pinned digest (case-insensitive). `Err` carries
    /// (expected, actual).
    pub fn verify(&self, expected: Option<&str>) -> Result<(), (String, String)> {
        match expected {
            Some(want) if !want.trim().eq_ignore_ascii_case(&self.sha256) => {
                Err((want.trim().to_string(), self.sha256.clone()))
            }
            _ => Ok(()),
        }
    }
}
