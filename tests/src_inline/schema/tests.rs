use super::*;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawInputs {
    serde_json::from_value(value).unwrap()
}

fn scenario_high_risk() -> RawInputs {
    raw(json!({
        "age": 65, "sex": 1, "cp": 0, "trestbps": 160, "chol": 300,
        "fbs": 1, "restecg": 2, "thalach": 100, "exang": 1,
        "oldpeak": 2.5, "slope": 1, "ca": 2, "thal": 1
    }))
}

#[test]
fn test_feature_order_matches_training_columns() {
    assert_eq!(
        feature_names(),
        [
            "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
            "oldpeak", "slope", "ca", "thal"
        ]
    );
    for (i, f) in FEATURE_ORDER.iter().enumerate() {
        assert_eq!(f.index(), i);
        assert_eq!(Feature::from_name(f.name()), Some(*f));
    }
}

#[test]
fn test_scaled_columns_are_the_five_continuous_fields() {
    let names: Vec<&str> = SCALED_COLUMNS.iter().map(|f| f.name()).collect();
    assert_eq!(names, ["age", "trestbps", "chol", "thalach", "oldpeak"]);
    assert_eq!(FEATURE_ORDER.iter().filter(|f| f.is_scaled()).count(), 5);
}

#[test]
fn test_validate_orders_values_canonically() {
    let v = validate(&scenario_high_risk()).unwrap();
    assert_eq!(
        v.values(),
        &[65.0, 1.0, 0.0, 160.0, 300.0, 1.0, 2.0, 100.0, 1.0, 2.5, 1.0, 2.0, 1.0]
    );
    assert_eq!(v.get(Feature::Trestbps), 160.0);
    assert_eq!(v.get(Feature::Oldpeak), 2.5);
}

#[test]
fn test_thal_outside_codes_names_field() {
    let mut input = scenario_high_risk();
    input.insert("thal".to_string(), json!(5));
    let err = validate(&input).unwrap_err();
    assert_eq!(err.field(), "thal");
    assert!(matches!(err, SchemaViolation::OutOfRange { got, .. } if got == 5.0));
    assert!(err.to_string().contains("one of {0, 1, 2, 3}"));
}

#[test]
fn test_missing_field_is_reported() {
    let mut input = scenario_high_risk();
    input.remove("chol");
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::Missing { field: "chol", .. }));
}

#[test]
fn test_null_counts_as_missing() {
    let mut input = scenario_high_risk();
    input.insert("ca".to_string(), serde_json::Value::Null);
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::Missing { field: "ca", .. }));
}

#[test]
fn test_range_bounds_are_inclusive() {
    let mut input = scenario_high_risk();
    input.insert("oldpeak".to_string(), json!(6.2));
    input.insert("age".to_string(), json!(1));
    assert!(validate(&input).is_ok());

    input.insert("trestbps".to_string(), json!(79.9));
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::OutOfRange { field: "trestbps", .. }));
}

#[test]
fn test_non_integral_code_is_wrong_kind() {
    let mut input = scenario_high_risk();
    input.insert("cp".to_string(), json!(2.5));
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::WrongKind { field: "cp", .. }));
}

#[test]
fn test_flags_accept_words_and_booleans() {
    let mut input = scenario_high_risk();
    input.insert("fbs".to_string(), json!("No"));
    input.insert("exang".to_string(), json!(true));
    input.insert("sex".to_string(), json!("female"));
    let v = validate(&input).unwrap();
    assert_eq!(v.get(Feature::Fbs), 0.0);
    assert_eq!(v.get(Feature::Exang), 1.0);
    assert_eq!(v.get(Feature::Sex), 0.0);
}

#[test]
fn test_flag_not_reducible_to_binary_is_wrong_kind() {
    let mut input = scenario_high_risk();
    input.insert("fbs".to_string(), json!("sometimes"));
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::WrongKind { field: "fbs", .. }));

    input.insert("fbs".to_string(), json!(2));
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::OutOfRange { field: "fbs", .. }));

    input.insert("fbs".to_string(), json!("male"));
    assert!(validate(&input).is_err());
}

#[test]
fn test_string_for_numeric_is_wrong_kind() {
    let mut input = scenario_high_risk();
    input.insert("chol".to_string(), json!("300"));
    let err = validate(&input).unwrap_err();
    assert!(matches!(err, SchemaViolation::WrongKind { field: "chol", .. }));
    assert!(err.to_string().contains("string \"300\""));
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut input = scenario_high_risk();
    input.insert("cholesterol".to_string(), json!(300));
    let err = validate(&input).unwrap_err();
    assert_eq!(
        err,
        SchemaViolation::Unknown {
            field: "cholesterol".to_string()
        }
    );
}
