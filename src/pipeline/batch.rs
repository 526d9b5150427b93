use std::thread;

use crate::decision::RiskVerdict;
use crate::pipeline::{PipelineError, ScoringPipeline};
use crate::schema::RawInputs;

/// Assesses every record independently on up to `workers` scoped threads.
/// Output order matches input order; a bad record does not affect others.
pub fn assess_batch(
    pipeline: &ScoringPipeline,
    records: &[RawInputs],
    workers: usize,
) -> Vec<Result<RiskVerdict, PipelineError>> {
    if records.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, records.len());
    let chunk = records.len().div_ceil(workers);

    thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk)
            .map(|part| {
                scope.spawn(move || {
                    part.iter()
                        .map(|raw| pipeline.assess(raw))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut out = Vec::with_capacity(records.len());
        for handle in handles {
            match handle.join() {
                Ok(results) => out.extend(results),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        out
    })
}

pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}
