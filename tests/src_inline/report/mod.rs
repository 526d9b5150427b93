use super::json::{render_batch_json, render_verdict_json};
use super::text::{render_batch_text, render_verdict_text};
use super::*;
use crate::decision::decide;
use crate::input::presets::Preset;
use crate::schema::{SchemaViolation, validate};

fn ctx() -> ReportContext {
    ReportContext {
        model_id: "heart-nn".to_string(),
        model_version: "2".to_string(),
    }
}

fn verdict(preset: Preset, p: f64) -> RiskVerdict {
    decide(p, &validate(&preset.raw_inputs()).unwrap())
}

#[test]
fn test_gauge() {
    assert_eq!(gauge(0.4, 20), "[########------------]");
    assert_eq!(gauge(0.0, 4), "[----]");
    assert_eq!(gauge(1.0, 4), "[####]");
    assert_eq!(gauge(1.7, 4), "[####]");
    assert_eq!(format_percent(0.831), "83.1%");
}

#[test]
fn test_text_report_low_risk() {
    let text = render_verdict_text(&verdict(Preset::DemoLow, 0.12), &ctx());
    assert!(text.contains("Verdict: LOW RISK (12.0%)"));
    assert!(text.contains("Model: heart-nn v2"));
    assert!(text.contains("- model probability 12.0% does not exceed 50%"));
    assert!(text.contains("healthy lifestyle"));
}

#[test]
fn test_text_report_rules_override_low_model() {
    let text = render_verdict_text(&verdict(Preset::HighRisk, 0.2), &ctx());
    assert!(text.contains("Verdict: HIGH RISK (20.0%)"));
    assert!(text.contains("- CRITICAL: resting blood pressure 160 mmHg"));
    assert!(text.contains("- WARNING: fasting blood sugar above 120 mg/dl"));
    assert!(text.contains("even though the model score is low"));
}

#[test]
fn test_json_report() {
    let out = render_verdict_json(&verdict(Preset::HighRisk, 0.9), &ctx()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["label"], "HIGH_RISK");
    assert_eq!(value["model_id"], "heart-nn");
    assert_eq!(value["probability"], 0.9);
    assert_eq!(value["triggered_rules"].as_array().unwrap().len(), 4);
    assert_eq!(value["triggered_rules"][2]["rule_id"], "st_depression");
    assert_eq!(value["explanation"][0], "model probability 90.0% exceeds 50%");
}

#[test]
fn test_batch_outputs() {
    let results = vec![
        Ok(verdict(Preset::HighRisk, 0.9)),
        Err(PipelineError::Schema(SchemaViolation::Unknown {
            field: "bp".to_string(),
        })),
        Ok(verdict(Preset::DemoLow, 0.1)),
    ];

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.high_risk, 1);
    assert_eq!(summary.low_risk, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.high_risk_fraction(), 0.5);

    let text = render_batch_text(&results, &ctx());
    assert!(text.contains("1\tHIGH_RISK\t0.900000\tresting_bp_high,cholesterol_high"));
    assert!(text.contains("2\tREJECTED\t-\tunknown field `bp`"));
    assert!(text.contains("3\tLOW_RISK\t0.100000\t-"));
    assert!(text.contains("3 records, 1 high risk (50.0%), 1 low risk, 1 rejected"));

    let out = render_batch_json(&results, &ctx()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["summary"]["rejected"], 1);
    assert_eq!(value["records"][0]["label"], "HIGH_RISK");
    assert_eq!(value["records"][1]["error"], "unknown field `bp`");
    assert!(value["records"][1].get("label").is_none());
    assert!(value["records"][0].get("error").is_none());
}

#[test]
fn test_empty_batch_summary() {
    let summary = BatchSummary::from_results(&[]);
    assert_eq!(summary.n_records, 0);
    assert_eq!(summary.high_risk_fraction(), 0.0);
}
