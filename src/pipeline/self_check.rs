use crate::input::presets::Preset;
use crate::pipeline::{PipelineError, ScoringPipeline};
use crate::schema::validate;

/// Outcome of a successful self-check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelfCheck {
    /// The signature probability was reproduced within tolerance.
    Verified { probability: f64 },
    /// No signature shipped; the reference patient scored to a valid
    /// probability but the scaler/model pairing is unverified.
    Unsigned { probability: f64 },
}

/// Feeds a known input through scaler and model. A mismatched or
/// reordered artifact pair fails here instead of at the first request.
pub fn run(pipeline: &ScoringPipeline) -> Result<SelfCheck, PipelineError> {
    match pipeline.model().signature() {
        Some(sig) => {
            let features = validate(&sig.input).map_err(PipelineError::InvalidSignature)?;
            let got = pipeline.score_vector(&features)?;
            if (got - sig.probability).abs() > sig.tolerance {
                tracing::error!(
                    expected = sig.probability,
                    got,
                    tolerance = sig.tolerance,
                    "self-check mismatch"
                );
                return Err(PipelineError::SelfCheckFailed {
                    expected: sig.probability,
                    got,
                    tolerance: sig.tolerance,
                });
            }
            tracing::info!(probability = got, "self-check passed");
            Ok(SelfCheck::Verified { probability: got })
        }
        None => {
            let features = validate(&Preset::HighRisk.raw_inputs())?;
            let got = pipeline.score_vector(&features)?;
            tracing::warn!(
                model_id = pipeline.model().id(),
                "model artifact carries no signature; scaler/model pairing not verified"
            );
            Ok(SelfCheck::Unsigned { probability: got })
        }
    }
}
