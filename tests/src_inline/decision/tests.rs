use super::*;
use crate::input::presets::Preset;
use crate::schema::{FeatureVector, RawInputs, validate};
use serde_json::json;

fn vector_with(overrides: &[(&str, serde_json::Value)]) -> FeatureVector {
    let mut raw: RawInputs = Preset::DemoLow.raw_inputs();
    for (k, v) in overrides {
        raw.insert(k.to_string(), v.clone());
    }
    validate(&raw).unwrap()
}

fn rule_ids(verdict: &RiskVerdict) -> Vec<&'static str> {
    verdict.triggered_rules.iter().map(|r| r.rule_id).collect()
}

#[test]
fn test_rule_declaration_order() {
    let ids: Vec<&str> = rule_order().iter().map(|r| r.id).collect();
    assert_eq!(
        ids,
        [
            "resting_bp_high",
            "cholesterol_high",
            "st_depression",
            "fasting_sugar_elevated"
        ]
    );
    let severities: Vec<Severity> = rule_order().iter().map(|r| r.severity).collect();
    assert_eq!(
        severities,
        [
            Severity::Critical,
            Severity::Critical,
            Severity::Warning,
            Severity::Warning
        ]
    );
}

#[test]
fn test_no_rules_label_follows_model() {
    let v = vector_with(&[]);
    let low = decide(0.2, &v);
    assert!(low.triggered_rules.is_empty());
    assert_eq!(low.label, RiskLabel::LowRisk);

    let high = decide(0.8, &v);
    assert!(high.triggered_rules.is_empty());
    assert_eq!(high.label, RiskLabel::HighRisk);
}

#[test]
fn test_probability_cutoff_is_strict() {
    let v = vector_with(&[]);
    assert_eq!(decide(0.5, &v).label, RiskLabel::LowRisk);
    assert_eq!(decide(0.500001, &v).label, RiskLabel::HighRisk);
}

#[test]
fn test_bp_boundary_inclusive() {
    let v159 = vector_with(&[("trestbps", json!(159))]);
    assert!(decide(0.1, &v159).triggered_rules.is_empty());
    assert_eq!(decide(0.1, &v159).label, RiskLabel::LowRisk);

    let v160 = vector_with(&[("trestbps", json!(160))]);
    let verdict = decide(0.1, &v160);
    assert_eq!(rule_ids(&verdict), ["resting_bp_high"]);
    assert_eq!(verdict.triggered_rules[0].severity, Severity::Critical);
    assert_eq!(verdict.label, RiskLabel::HighRisk);
}

#[test]
fn test_other_rule_boundaries() {
    let v = vector_with(&[("chol", json!(279.9)), ("oldpeak", json!(2.4))]);
    assert!(decide(0.0, &v).triggered_rules.is_empty());

    let v = vector_with(&[("chol", json!(280)), ("oldpeak", json!(2.5))]);
    assert_eq!(
        rule_ids(&decide(0.0, &v)),
        ["cholesterol_high", "st_depression"]
    );
}

#[test]
fn test_warning_alone_raises_verdict() {
    let v = vector_with(&[("fbs", json!("Yes"))]);
    let verdict = decide(0.05, &v);
    assert_eq!(rule_ids(&verdict), ["fasting_sugar_elevated"]);
    assert_eq!(verdict.triggered_rules[0].severity, Severity::Warning);
    assert_eq!(verdict.label, RiskLabel::HighRisk);
}

#[test]
fn test_high_risk_scenario_fires_all_rules_in_order() {
    let v = validate(&Preset::HighRisk.raw_inputs()).unwrap();
    for p in [0.0, 0.3, 0.5, 0.99] {
        let verdict = decide(p, &v);
        assert_eq!(verdict.label, RiskLabel::HighRisk);
        assert_eq!(
            rule_ids(&verdict),
            [
                "resting_bp_high",
                "cholesterol_high",
                "st_depression",
                "fasting_sugar_elevated"
            ]
        );
        assert_eq!(verdict.probability, p);
    }
}

#[test]
fn test_explanation_lines() {
    let v = vector_with(&[("trestbps", json!(170))]);
    let verdict = decide(0.25, &v);
    let lines = verdict.explanation();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "model probability 25.0% does not exceed 50%");
    assert!(lines[1].starts_with("CRITICAL: resting blood pressure 170 mmHg"));
    assert!(!verdict.model_high_risk());

    let verdict = decide(0.831, &vector_with(&[]));
    assert_eq!(
        verdict.explanation(),
        ["model probability 83.1% exceeds 50%"]
    );
}

#[test]
fn test_verdict_serializes_labels() {
    let v = validate(&Preset::HighRisk.raw_inputs()).unwrap();
    let value = serde_json::to_value(decide(0.75, &v)).unwrap();
    assert_eq!(value["label"], json!("HIGH_RISK"));
    assert_eq!(value["probability"], json!(0.75));
    assert_eq!(value["triggered_rules"][0]["rule_id"], json!("resting_bp_high"));
    assert_eq!(value["triggered_rules"][0]["severity"], json!("CRITICAL"));
    assert_eq!(value["triggered_rules"][3]["severity"], json!("WARNING"));
    assert_eq!(RiskLabel::LowRisk.to_string(), "LOW_RISK");
}
