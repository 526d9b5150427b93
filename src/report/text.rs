use crate::decision::{RiskLabel, RiskVerdict};
use crate::pipeline::PipelineError;
use crate::report::{BatchSummary, ReportContext, format_percent, gauge};

const GAUGE_WIDTH: usize = 20;

pub fn render_verdict_text(verdict: &RiskVerdict, ctx: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str("Heart Disease Risk Assessment\n");
    out.push_str("=============================\n\n");

    let headline = match verdict.label {
        RiskLabel::HighRisk => "HIGH RISK",
        RiskLabel::LowRisk => "LOW RISK",
    };
    out.push_str(&format!(
        "Verdict: {headline} ({})\n",
        format_percent(verdict.probability)
    ));
    out.push_str(&format!(
        "Risk gauge: {} {}\n",
        gauge(verdict.probability, GAUGE_WIDTH),
        format_percent(verdict.probability)
    ));
    out.push_str(&format!("Model: {}", ctx.model_id));
    if !ctx.model_version.is_empty() {
        out.push_str(&format!(" v{}", ctx.model_version));
    }
    out.push_str("\n\n");

    out.push_str("Findings\n");
    for line in verdict.explanation() {
        out.push_str(&format!("- {line}\n"));
    }
    out.push('\n');

    out.push_str(advisory(verdict));
    out.push('\n');
    out
}

pub fn render_batch_text(
    results: &[Result<RiskVerdict, PipelineError>],
    ctx: &ReportContext,
) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(v) => {
                let rules = v
                    .triggered_rules
                    .iter()
                    .map(|r| r.rule_id)
                    .collect::<Vec<_>>()
                    .join(",");
                out.push_str(&format!(
                    "{}\t{}\t{:.6}\t{}\n",
                    i + 1,
                    v.label,
                    v.probability,
                    if rules.is_empty() { "-" } else { rules.as_str() }
                ));
            }
            Err(err) => out.push_str(&format!("{}\tREJECTED\t-\t{err}\n", i + 1)),
        }
    }

    let summary = BatchSummary::from_results(results);
    out.push_str(&format!(
        "\n{} records, {} high risk ({}), {} low risk, {} rejected; model {}\n",
        summary.n_records,
        summary.high_risk,
        format_percent(summary.high_risk_fraction()),
        summary.low_risk,
        summary.rejected,
        ctx.model_id
    ));
    out
}

fn advisory(verdict: &RiskVerdict) -> &'static str {
    match verdict.label {
        RiskLabel::HighRisk if !verdict.model_high_risk() => {
            "Clinical thresholds were exceeded even though the model score is low. \
             Please consult a cardiologist."
        }
        RiskLabel::HighRisk => {
            "Patterns associated with heart disease were detected. Please consult a cardiologist."
        }
        RiskLabel::LowRisk => "Vitals look strong. Keep up the healthy lifestyle.",
    }
}
