//! Feed-forward classifier: 13 post-scaling features in, P(disease) out.
//!
//! The network is consumed as an opaque artifact; only its shape is checked
//! at load time so that inference can never index out of bounds.

pub mod layers;
mod math;

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::read_to_string_maybe_gz;
use crate::schema::{FEATURE_COUNT, RawInputs, feature_names};

pub use layers::{Activation, DenseLayer};

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model feature order {got:?} does not match {expected:?}")]
    FeatureNames {
        expected: Vec<&'static str>,
        got: Vec<String>,
    },
    #[error("model has no layers")]
    Empty,
    #[error("layer {layer}: {detail}")]
    Shape { layer: usize, detail: String },
    #[error("layer {layer}: non-finite parameter")]
    NonFinite { layer: usize },
    #[error("unsupported output head: {units} unit(s) with {activation:?} activation")]
    UnsupportedHead { units: usize, activation: Activation },
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model expects {expected} inputs, got {got}")]
    InputLength { expected: usize, got: usize },
    #[error("model produced non-finite output {0}")]
    NonFiniteOutput(f64),
}

/// Known raw input and the probability the trained scaler+model pair must
/// produce for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Signature {
    pub input: RawInputs,
    pub probability: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-6
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub model_version: String,
    /// Optional; when present must equal the canonical feature order.
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub layers: Vec<DenseLayer>,
    #[serde(default)]
    pub signature: Option<Signature>,
}

fn default_model_id() -> String {
    "unnamed".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputHead {
    /// One sigmoid unit: the output is P(disease).
    Sigmoid,
    /// Two softmax units: index 1 is the disease class.
    Softmax2,
}

#[derive(Debug, Clone)]
pub struct Model {
    id: String,
    version: String,
    layers: Vec<DenseLayer>,
    head: OutputHead,
    signature: Option<Signature>,
}

impl Model {
    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let content = read_to_string_maybe_gz(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            model_id = %model.id,
            layers = model.layers.len(),
            inputs = model.layers.first().map_or(0, DenseLayer::input_dim),
            signed = model.signature.is_some(),
            "model loaded"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        let expected = feature_names();
        if !artifact.feature_names.is_empty()
            && artifact.feature_names.iter().map(String::as_str).ne(expected)
        {
            return Err(ModelLoadError::FeatureNames {
                expected: expected.to_vec(),
                got: artifact.feature_names,
            });
        }

        let head = validate_layers(&artifact.layers)?;

        if let Some(sig) = &artifact.signature {
            if !(0.0..=1.0).contains(&sig.probability) {
                return Err(ModelLoadError::InvalidSignature(format!(
                    "probability {} outside [0, 1]",
                    sig.probability
                )));
            }
            if !sig.tolerance.is_finite() || sig.tolerance < 0.0 {
                return Err(ModelLoadError::InvalidSignature(format!(
                    "tolerance {} must be finite and non-negative",
                    sig.tolerance
                )));
            }
        }

        Ok(Self {
            id: artifact.model_id,
            version: artifact.model_version,
            layers: artifact.layers,
            head,
            signature: artifact.signature,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Forward pass. `input` must be the post-scaling vector.
    pub fn predict(&self, input: &[f64]) -> Result<f64, InferenceError> {
        if input.len() != FEATURE_COUNT {
            return Err(InferenceError::InputLength {
                expected: FEATURE_COUNT,
                got: input.len(),
            });
        }

        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        let p = match self.head {
            OutputHead::Sigmoid => activations[0],
            OutputHead::Softmax2 => activations[1],
        };
        if !p.is_finite() {
            return Err(InferenceError::NonFiniteOutput(p));
        }
        Ok(p.clamp(0.0, 1.0))
    }
}

fn validate_layers(layers: &[DenseLayer]) -> Result<OutputHead, ModelLoadError> {
    let Some(last) = layers.last() else {
        return Err(ModelLoadError::Empty);
    };

    let mut width = FEATURE_COUNT;
    for (idx, layer) in layers.iter().enumerate() {
        if layer.output_dim() == 0 {
            return Err(ModelLoadError::Shape {
                layer: idx,
                detail: "no output units".to_string(),
            });
        }
        if let Some(row) = layer.weights.iter().position(|r| r.len() != width) {
            return Err(ModelLoadError::Shape {
                layer: idx,
                detail: format!(
                    "weight row {row} has {} inputs, expected {width}",
                    layer.weights[row].len()
                ),
            });
        }
        if layer.bias.len() != layer.output_dim() {
            return Err(ModelLoadError::Shape {
                layer: idx,
                detail: format!(
                    "bias has {} entries for {} units",
                    layer.bias.len(),
                    layer.output_dim()
                ),
            });
        }
        let finite = layer
            .weights
            .iter()
            .flatten()
            .chain(layer.bias.iter())
            .all(|w| w.is_finite());
        if !finite {
            return Err(ModelLoadError::NonFinite { layer: idx });
        }
        width = layer.output_dim();
    }

    match (last.output_dim(), last.activation) {
        (1, Activation::Sigmoid) => Ok(OutputHead::Sigmoid),
        (2, Activation::Softmax) => Ok(OutputHead::Softmax2),
        (units, activation) => Err(ModelLoadError::UnsupportedHead { units, activation }),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/tests.rs"]
mod tests;
