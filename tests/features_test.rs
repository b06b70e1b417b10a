//! Field coercion, BMI derivation, schema alignment and forest evaluation.

mod common;

use common::{forest_json, sample_request, schema_names, FOLLICLE_COLUMN};
use pcos_risk::{
    error::{CoercionError, InferenceError, ModelLoadError},
    features::{mapper, FeatureMapper, FeatureSchema, FeatureVector, MappedFeatures, SchemaAligner},
    model::{Classifier, ForestClassifier, ForestModel},
    observation::{RawObservation, RawValue},
};
use serde_json::{json, Value};

fn map(req: Value) -> Result<MappedFeatures, CoercionError> {
    FeatureMapper::new().map(&RawObservation::from_value(req).unwrap())
}

fn with(field: &str, value: Value) -> Value {
    let mut req = sample_request();
    req[field] = value;
    req
}

#[test]
fn reference_scenario_mapping() {
    let m = map(sample_request()).unwrap();
    assert_eq!(m.len(), mapper::MAPPED_FEATURES.len());
    assert_eq!(m.get(mapper::AGE), Some(25.0));
    assert!((m.get(mapper::BMI).unwrap() - 23.4375).abs() < 1e-9);
    assert_eq!(m.get(mapper::CYCLE), Some(0.0));
    assert_eq!(m.get(mapper::FAST_FOOD), Some(0.0));
    assert_eq!(m.get(mapper::HAIR_GROWTH), Some(1.0));
    assert_eq!(m.get(mapper::WEIGHT_GAIN), Some(0.0));
    assert_eq!(m.get(mapper::EXERCISE), Some(1.0));
    assert_eq!(m.get(mapper::WAIST_HIP_RATIO), Some(0.8));
}

#[test]
fn bmi_derived_when_absent_or_falsy() {
    for bmi in [json!(null), json!(""), json!(0), json!(0.0), json!("0")] {
        let m = map(with("bmi", bmi.clone())).unwrap();
        assert!((m.get(mapper::BMI).unwrap() - 23.4375).abs() < 1e-9, "bmi = {bmi}");
    }
    let mut req = sample_request();
    req.as_object_mut().unwrap().remove("bmi");
    let m = map(req).unwrap();
    assert!((m.get(mapper::BMI).unwrap() - 23.4375).abs() < 1e-9);
}

#[test]
fn bmi_kept_when_provided() {
    assert_eq!(map(with("bmi", json!(31.2))).unwrap().get(mapper::BMI), Some(31.2));
    assert_eq!(map(with("bmi", json!(" 22 "))).unwrap().get(mapper::BMI), Some(22.0));
}

#[test]
fn bmi_derivation_needs_positive_height() {
    let err = map(with("height", json!(0))).unwrap_err();
    assert_eq!(err.field(), "height");
    // Height is irrelevant once BMI is given.
    let mut req = with("height", json!(0));
    req["bmi"] = json!(21.0);
    assert_eq!(map(req).unwrap().get(mapper::BMI), Some(21.0));
}

#[test]
fn binary_encodings() {
    assert_eq!(map(with("cycle", json!("R"))).unwrap().get(mapper::CYCLE), Some(1.0));
    assert_eq!(map(with("cycle", json!("I"))).unwrap().get(mapper::CYCLE), Some(0.0));
    assert_eq!(map(with("cycle", json!("r"))).unwrap().get(mapper::CYCLE), Some(0.0));

    for (v, want) in [(json!("yes"), 1.0), (json!("no"), 0.0), (json!("Yes"), 0.0), (json!(1), 0.0)] {
        let m = map(with("hair_growth", v)).unwrap();
        assert_eq!(m.get(mapper::HAIR_GROWTH), Some(want));
    }

    assert_eq!(map(with("fast_food", json!(3))).unwrap().get(mapper::FAST_FOOD), Some(1.0));
    assert_eq!(map(with("fast_food", json!(2))).unwrap().get(mapper::FAST_FOOD), Some(0.0));
    assert_eq!(map(with("fast_food", json!("5"))).unwrap().get(mapper::FAST_FOOD), Some(1.0));
}

#[test]
fn numeric_coercion() {
    assert_eq!(map(with("age", json!("31"))).unwrap().get(mapper::AGE), Some(31.0));
    assert_eq!(map(with("age", json!(31.9))).unwrap().get(mapper::AGE), Some(31.0));
    assert_eq!(map(with("weight", json!("58.5"))).unwrap().get(mapper::WEIGHT), Some(58.5));
    assert_eq!(
        map(with("cycle_length", json!(28))).unwrap().get(mapper::CYCLE_LENGTH),
        Some(28.0)
    );
}

#[test]
fn invalid_required_fields_are_rejected() {
    let cases = [
        ("age", json!("twenty")),
        ("age", json!("25.5")),
        ("age", json!(true)),
        ("weight", json!("heavy")),
        ("weight", json!([60])),
        ("height", json!("NaN")),
        ("waist_hip_ratio", json!({"ratio": 0.8})),
        ("fast_food", json!("often")),
        ("bmi", json!("n/a")),
    ];
    for (field, value) in cases {
        match map(with(field, value.clone())) {
            Err(CoercionError::Invalid { field: f, .. }) => assert_eq!(f, field, "{value}"),
            other => panic!("{field} = {value}: expected invalid, got {other:?}"),
        }
    }
}

#[test]
fn missing_required_fields_are_rejected() {
    for field in [
        "age",
        "weight",
        "height",
        "waist_hip_ratio",
        "cycle",
        "cycle_length",
        "hair_growth",
        "weight_gain",
        "pimples",
        "hair_loss",
        "skin_darkening",
        "fast_food",
        "exercise",
    ] {
        let mut req = sample_request();
        req.as_object_mut().unwrap().remove(field);
        assert_eq!(map(req).unwrap_err(), CoercionError::Missing { field });

        assert_eq!(
            map(with(field, Value::Null)).unwrap_err(),
            CoercionError::Missing { field },
            "null {field}"
        );
    }
}

#[test]
fn unknown_request_keys_are_ignored() {
    let req = with("favourite_colour", json!("green"));
    assert!(map(req).is_ok());
}

#[test]
fn raw_value_shapes() {
    assert_eq!(RawValue::from(5i64).to_int("x"), Ok(5));
    assert_eq!(RawValue::from("7").to_float("x"), Ok(7.0));
    assert!(RawValue::from("").is_falsy());
    assert!(!RawValue::from(" ").is_falsy());
    assert!(RawValue::from("R").is_text("R"));
    assert!(!RawValue::from(1.0).is_text("1"));
}

#[test]
fn aligned_vector_follows_schema_order() {
    let mapped = map(sample_request()).unwrap();

    let mut reversed = schema_names();
    reversed.reverse();
    let subset = vec!["BMI".to_string(), "Cycle(R/I)".to_string()];
    let with_extras = vec![
        "Pulse rate(bpm)".to_string(),
        "Age (yrs)".to_string(),
        "AMH(ng/mL)".to_string(),
    ];

    for names in [schema_names(), reversed, subset, with_extras] {
        let schema = FeatureSchema::new(names.clone()).unwrap();
        let vector = SchemaAligner::new().align(&schema, &mapped);
        assert_eq!(vector.columns(), names.as_slice());
        assert_eq!(vector.len(), schema.len());
        for (name, value) in vector.iter() {
            assert_eq!(value, mapped.get(name).unwrap_or(0.0), "{name}");
        }
    }
}

#[test]
fn schema_only_columns_default_to_zero() {
    let mapped = map(sample_request()).unwrap();
    let schema = FeatureSchema::new(schema_names()).unwrap();
    let vector = schema.align(&mapped);
    assert_eq!(vector.get(FOLLICLE_COLUMN), Some(0.0));
    assert_eq!(vector.get("Age (yrs)"), Some(25.0));
    assert_eq!(vector.as_slice().last(), Some(&0.0));
}

#[test]
fn mapper_only_features_are_dropped() {
    let mapped = map(sample_request()).unwrap();
    let schema = FeatureSchema::new(["Age (yrs)", "BMI"]).unwrap();
    let vector = schema.align(&mapped);
    assert_eq!(vector.len(), 2);
    assert_eq!(vector.get("Hair growth(Y/N)"), None);
}

fn forest() -> ForestClassifier {
    ForestClassifier::from_slice(&serde_json::to_vec(&forest_json()).unwrap()).unwrap()
}

fn vector(values: Vec<f64>) -> FeatureVector {
    let schema = FeatureSchema::new(schema_names()).unwrap();
    FeatureVector::with_values(&schema, values).unwrap()
}

#[test]
fn forest_follows_splits() {
    let f = forest();
    let mut x = vec![0.0; 15];
    assert!((f.predict_probability(&vector(x.clone())).unwrap() - 0.2).abs() < 1e-12);
    assert_eq!(f.predict_class(&vector(x.clone())).unwrap(), 0);

    x[7] = 1.0;
    x[3] = 25.0;
    assert!((f.predict_probability(&vector(x.clone())).unwrap() - 0.7).abs() < 1e-12);
    assert_eq!(f.predict_class(&vector(x.clone())).unwrap(), 1);

    // Compared in single precision, so this still goes left.
    x[3] = 25.0000001;
    assert!((f.predict_probability(&vector(x.clone())).unwrap() - 0.7).abs() < 1e-12);

    x[3] = 25.5;
    assert!((f.predict_probability(&vector(x)).unwrap() - 0.9).abs() < 1e-12);
}

#[test]
fn forest_averages_trees_and_breaks_ties_low() {
    let mut model: ForestModel = serde_json::from_value(forest_json()).unwrap();
    let stump = serde_json::from_value(json!({
        "children_left": [-1],
        "children_right": [-1],
        "feature": [-2],
        "threshold": [-2.0],
        "value": [[0.8, 0.2]]
    }))
    .unwrap();
    model.trees.push(stump);
    let f = ForestClassifier::new(model).unwrap();
    assert_eq!(f.n_trees(), 2);

    let mut x = vec![0.0; 15];
    x[7] = 1.0;
    x[3] = 30.0;
    // (0.9 + 0.2) / 2
    let p = f.predict_probability(&vector(x.clone())).unwrap();
    assert!((p - 0.55).abs() < 1e-12);
    assert_eq!(f.predict_class(&vector(x)).unwrap(), 1);

    // A balanced leaf gives 0.5; the first class wins the tie.
    let tie: ForestModel = serde_json::from_value(json!({
        "classes": [0, 1],
        "trees": [{
            "children_left": [-1], "children_right": [-1], "feature": [-2],
            "threshold": [-2.0], "value": [[5.0, 5.0]]
        }]
    }))
    .unwrap();
    let f = ForestClassifier::new(tie).unwrap();
    let p = f.evaluate(&vector(vec![0.0; 15])).unwrap();
    assert_eq!(p.probability, 0.5);
    assert_eq!(p.class, 0);
}

#[test]
fn forest_rejects_short_vectors() {
    let f = forest();
    let schema = FeatureSchema::new(["Age (yrs)", "BMI"]).unwrap();
    let v = FeatureVector::with_values(&schema, vec![25.0, 23.4]).unwrap();
    assert!(matches!(
        f.predict_probability(&v),
        Err(InferenceError::FeatureCount { expected: 15, actual: 2 })
    ));
}

#[test]
fn forest_artifact_validation() {
    let mut bad_classes = forest_json();
    bad_classes["classes"] = json!([0, 1, 2]);

    let mut bad_child = forest_json();
    bad_child["trees"][0]["children_left"] = json!([1, -1, 0, -1, -1]);

    let mut short_arrays = forest_json();
    short_arrays["trees"][0]["threshold"] = json!([0.5]);

    let mut low_n_features = forest_json();
    low_n_features["n_features"] = json!(4);

    let mut no_trees = forest_json();
    no_trees["trees"] = json!([]);

    for model in [bad_classes, bad_child, short_arrays, low_n_features, no_trees] {
        let res = ForestClassifier::from_slice(&serde_json::to_vec(&model).unwrap());
        assert!(matches!(res, Err(ModelLoadError::Malformed(_))), "{model}");
    }
}

#[test]
fn vector_length_must_match_schema() {
    let schema = FeatureSchema::new(["a", "b"]).unwrap();
    assert!(FeatureVector::with_values(&schema, vec![1.0]).is_none());
    assert_eq!(schema.position("b"), Some(1));
}
