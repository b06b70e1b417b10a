//! Shared fixtures: artifact files in a temp dir and a sample observation.

#![allow(dead_code)]

use pcos_risk::config::ServiceConfig;
use pcos_risk::features::mapper::MAPPED_FEATURES;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Schema column the mapper never produces; always default-filled.
pub const FOLLICLE_COLUMN: &str = "Follicle No. (R)";

pub fn schema_names() -> Vec<String> {
    MAPPED_FEATURES
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(FOLLICLE_COLUMN.to_string()))
        .collect()
}

/// One tree over the default schema: no hair growth → 0.2; hair growth with
/// BMI <= 25 → 0.7; hair growth with BMI > 25 → 0.9.
pub fn forest_json() -> Value {
    json!({
        "classes": [0, 1],
        "n_features": 15,
        "trees": [{
            "children_left":  [1, -1, 3, -1, -1],
            "children_right": [2, -1, 4, -1, -1],
            "feature":        [7, -2, 3, -2, -2],
            "threshold":      [0.5, -2.0, 25.0, -2.0, -2.0],
            "value": [[12.0, 18.0], [8.0, 2.0], [4.0, 16.0], [3.0, 7.0], [1.0, 9.0]]
        }]
    })
}

/// Observation from the reference scenario (BMI left blank).
pub fn sample_request() -> Value {
    json!({
        "age": 25,
        "weight": 60,
        "height": 160,
        "bmi": "",
        "waist_hip_ratio": 0.8,
        "cycle": "I",
        "cycle_length": 30,
        "hair_growth": "yes",
        "weight_gain": "no",
        "pimples": "no",
        "hair_loss": "no",
        "skin_darkening": "no",
        "fast_food": 1,
        "exercise": "yes"
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path
}

/// Config pointing at freshly written schema and forest artifacts.
pub fn write_artifacts(dir: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.schema.path = write_json(dir, "columns.json", &json!(schema_names()));
    config.model.path = write_json(dir, "forest.json", &forest_json());
    config
}
