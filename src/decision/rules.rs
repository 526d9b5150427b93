use serde::Serialize;

use crate::decision::thresholds::DecisionThresholds;
use crate::schema::{Feature, FeatureVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleViolation {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// A stateless check against raw (unscaled) measurements. Returns the
/// explanation when the rule fires.
#[derive(Debug, Clone, Copy)]
pub struct ClinicalRule {
    pub id: &'static str,
    pub severity: Severity,
    check: fn(&FeatureVector, &DecisionThresholds) -> Option<String>,
}

impl ClinicalRule {
    pub fn evaluate(
        &self,
        features: &FeatureVector,
        thresholds: &DecisionThresholds,
    ) -> Option<RuleViolation> {
        (self.check)(features, thresholds).map(|message| RuleViolation {
            rule_id: self.id,
            severity: self.severity,
            message,
        })
    }
}

const CLINICAL_RULES: &[ClinicalRule] = &[
    ClinicalRule {
        id: "resting_bp_high",
        severity: Severity::Critical,
        check: resting_bp_high,
    },
    ClinicalRule {
        id: "cholesterol_high",
        severity: Severity::Critical,
        check: cholesterol_high,
    },
    ClinicalRule {
        id: "st_depression",
        severity: Severity::Warning,
        check: st_depression,
    },
    ClinicalRule {
        id: "fasting_sugar_elevated",
        severity: Severity::Warning,
        check: fasting_sugar_elevated,
    },
];

/// Rules in declaration order; verdicts list fired rules in this order.
pub fn rule_order() -> &'static [ClinicalRule] {
    CLINICAL_RULES
}

fn resting_bp_high(v: &FeatureVector, t: &DecisionThresholds) -> Option<String> {
    let bp = v.get(Feature::Trestbps);
    (bp >= t.resting_bp).then(|| {
        format!(
            "resting blood pressure {bp} mmHg is at or above {} mmHg (hypertension)",
            t.resting_bp
        )
    })
}

fn cholesterol_high(v: &FeatureVector, t: &DecisionThresholds) -> Option<String> {
    let chol = v.get(Feature::Chol);
    (chol >= t.cholesterol).then(|| {
        format!(
            "serum cholesterol {chol} mg/dl is at or above {} mg/dl",
            t.cholesterol
        )
    })
}

fn st_depression(v: &FeatureVector, t: &DecisionThresholds) -> Option<String> {
    let oldpeak = v.get(Feature::Oldpeak);
    (oldpeak >= t.oldpeak).then(|| {
        format!(
            "exercise-induced ST depression {oldpeak} is at or above {}",
            t.oldpeak
        )
    })
}

fn fasting_sugar_elevated(v: &FeatureVector, _t: &DecisionThresholds) -> Option<String> {
    (v.get(Feature::Fbs) == 1.0)
        .then(|| "fasting blood sugar above 120 mg/dl".to_string())
}
