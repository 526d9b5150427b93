use serde::Serialize;

use crate::decision::{RiskVerdict, RuleViolation};
use crate::pipeline::PipelineError;
use crate::report::{BatchSummary, ReportContext};

#[derive(Debug, Serialize)]
struct VerdictDoc<'a> {
    model_id: &'a str,
    model_version: &'a str,
    probability: f64,
    label: &'static str,
    triggered_rules: &'a [RuleViolation],
    explanation: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BatchRecord<'a> {
    record: usize,
    #[serde(flatten)]
    verdict: Option<VerdictDoc<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchDoc<'a> {
    summary: BatchSummaryDoc,
    records: Vec<BatchRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchSummaryDoc {
    n_records: usize,
    high_risk: usize,
    low_risk: usize,
    rejected: usize,
    high_risk_fraction: f64,
}

fn verdict_doc<'a>(verdict: &'a RiskVerdict, ctx: &'a ReportContext) -> VerdictDoc<'a> {
    VerdictDoc {
        model_id: &ctx.model_id,
        model_version: &ctx.model_version,
        probability: verdict.probability,
        label: verdict.label.as_str(),
        triggered_rules: &verdict.triggered_rules,
        explanation: verdict.explanation(),
    }
}

pub fn render_verdict_json(
    verdict: &RiskVerdict,
    ctx: &ReportContext,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&verdict_doc(verdict, ctx))
}

pub fn render_batch_json(
    results: &[Result<RiskVerdict, PipelineError>],
    ctx: &ReportContext,
) -> Result<String, serde_json::Error> {
    let summary = BatchSummary::from_results(results);
    let records = results
        .iter()
        .enumerate()
        .map(|(i, r)| match r {
            Ok(v) => BatchRecord {
                record: i + 1,
                verdict: Some(verdict_doc(v, ctx)),
                error: None,
            },
            Err(err) => BatchRecord {
                record: i + 1,
                verdict: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    serde_json::to_string_pretty(&BatchDoc {
        summary: BatchSummaryDoc {
            n_records: summary.n_records,
            high_risk: summary.high_risk,
            low_risk: summary.low_risk,
            rejected: summary.rejected,
            high_risk_fraction: summary.high_risk_fraction(),
        },
        records,
    })
}
