pub mod json;
pub mod text;

use crate::decision::{RiskLabel, RiskVerdict};
use crate::pipeline::PipelineError;

/// Identifies the artifacts behind a verdict.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub model_id: String,
    pub model_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub n_records: usize,
    pub high_risk: usize,
    pub low_risk: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[Result<RiskVerdict, PipelineError>]) -> Self {
        let mut summary = Self {
            n_records: results.len(),
            high_risk: 0,
            low_risk: 0,
            rejected: 0,
        };
        for r in results {
            match r {
                Ok(v) if v.label == RiskLabel::HighRisk => summary.high_risk += 1,
                Ok(_) => summary.low_risk += 1,
                Err(_) => summary.rejected += 1,
            }
        }
        summary
    }

    pub fn high_risk_fraction(&self) -> f64 {
        let scored = self.high_risk + self.low_risk;
        if scored == 0 {
            return 0.0;
        }
        self.high_risk as f64 / scored as f64
    }
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Fixed-width bar, e.g. `[########------------]` for 0.4 at width 20.
pub fn gauge(p: f64, width: usize) -> String {
    let filled = ((p.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let mut out = String::with_capacity(width + 2);
    out.push('[');
    out.extend(std::iter::repeat_n('#', filled));
    out.extend(std::iter::repeat_n('-', width - filled));
    out.push(']');
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
