//! Risk decision: the model probability and the clinical rule checks can
//! each independently raise a verdict to HIGH_RISK. Neither overrides nor
//! averages the other.

pub mod rules;
pub mod thresholds;

use std::fmt;

use serde::Serialize;

use crate::schema::FeatureVector;

pub use rules::{RuleViolation, Severity, rule_order};
pub use thresholds::DecisionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    HighRisk,
    LowRisk,
}

impl RiskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "HIGH_RISK",
            RiskLabel::LowRisk => "LOW_RISK",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskVerdict {
    pub probability: f64,
    pub label: RiskLabel,
    pub triggered_rules: Vec<RuleViolation>,
}

impl RiskVerdict {
    /// Whether the model alone would have raised the verdict.
    pub fn model_high_risk(&self) -> bool {
        self.probability > DecisionThresholds::clinical_v1().probability
    }

    /// Human-readable lines: the model statement, then one line per fired
    /// rule in declaration order.
    pub fn explanation(&self) -> Vec<String> {
        let cutoff = DecisionThresholds::clinical_v1().probability;
        let mut lines = Vec::with_capacity(self.triggered_rules.len() + 1);
        let relation = if self.model_high_risk() {
            "exceeds"
        } else {
            "does not exceed"
        };
        lines.push(format!(
            "model probability {:.1}% {relation} {:.0}%",
            self.probability * 100.0,
            cutoff * 100.0
        ));
        for rule in &self.triggered_rules {
            lines.push(format!("{}: {}", rule.severity.as_str(), rule.message));
        }
        lines
    }
}

pub fn decide(probability: f64, features: &FeatureVector) -> RiskVerdict {
    let thresholds = DecisionThresholds::clinical_v1();
    let triggered_rules: Vec<RuleViolation> = rule_order()
        .iter()
        .filter_map(|rule| rule.evaluate(features, &thresholds))
        .collect();

    let label = if probability > thresholds.probability || !triggered_rules.is_empty() {
        RiskLabel::HighRisk
    } else {
        RiskLabel::LowRisk
    };

    tracing::debug!(
        probability,
        rules = triggered_rules.len(),
        label = label.as_str(),
        "verdict decided"
    );

    RiskVerdict {
        probability,
        label,
        triggered_rules,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/decision/tests.rs"]
mod tests;
