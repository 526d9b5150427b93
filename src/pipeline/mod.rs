//! Scoring pipeline: validate, scale, infer. Rules in the decision layer
//! see the unscaled vector; the model only ever sees the scaled one.

pub mod batch;
pub mod self_check;

use std::path::Path;

use thiserror::Error;

use crate::decision::{RiskVerdict, decide};
use crate::model::{InferenceError, Model, ModelLoadError};
use crate::scaler::{Scaler, ScalerLoadError};
use crate::schema::{FeatureVector, RawInputs, SchemaViolation, validate};

pub use self_check::SelfCheck;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    ScalerLoad(#[from] ScalerLoadError),
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),
    #[error("internal invariant violated: {0}")]
    Inference(#[from] InferenceError),
    #[error("self-check signature input rejected: {0}")]
    InvalidSignature(SchemaViolation),
    #[error(
        "self-check failed: expected probability {expected} (tolerance {tolerance}), got {got}; \
         model and scaler are probably not a matching pair"
    )]
    SelfCheckFailed {
        expected: f64,
        got: f64,
        tolerance: f64,
    },
}

impl PipelineError {
    /// Per-call input problems the caller can fix and resubmit.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PipelineError::Schema(_))
    }
}

/// Result of one scoring call: the model probability and the validated,
/// unscaled features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub probability: f64,
    pub features: FeatureVector,
}

/// Loaded, self-checked scaler and model. Immutable after construction and
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    scaler: Scaler,
    model: Model,
    self_check: SelfCheck,
}

impl ScoringPipeline {
    /// Loads both artifacts and runs the self-check. Nothing is returned
    /// unless every step succeeds.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, PipelineError> {
        let scaler = Scaler::from_file(scaler_path)?;
        let model = Model::from_file(model_path)?;
        Self::new(scaler, model)
    }

    pub fn new(scaler: Scaler, model: Model) -> Result<Self, PipelineError> {
        let mut pipeline = Self {
            scaler,
            model,
            self_check: SelfCheck::Unsigned { probability: 0.0 },
        };
        pipeline.self_check = self_check::run(&pipeline)?;
        Ok(pipeline)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn self_check(&self) -> SelfCheck {
        self.self_check
    }

    pub fn score(&self, raw: &RawInputs) -> Result<Scored, PipelineError> {
        let features = validate(raw)
            .inspect_err(|e| tracing::debug!(field = e.field(), "input rejected"))?;
        let probability = self.score_vector(&features)?;
        tracing::debug!(probability, model_id = self.model.id(), "scored");
        Ok(Scored {
            probability,
            features,
        })
    }

    pub fn score_vector(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let scaled = self.scaler.transform(features);
        self.model.predict(scaled.as_slice())
    }

    /// `score` followed by `decide`.
    pub fn assess(&self, raw: &RawInputs) -> Result<RiskVerdict, PipelineError> {
        let scored = self.score(raw)?;
        Ok(decide(scored.probability, &scored.features))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/tests.rs"]
mod tests;
