//! Affine scaler for the five continuous columns.
//!
//! The artifact is produced at training time; loading is all-or-nothing and
//! a loaded [`Scaler`] is never mutated.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::read_to_string_maybe_gz;
use crate::schema::{FEATURE_COUNT, Feature, FeatureVector, SCALED_COLUMNS, SCALED_COUNT};

#[derive(Debug, Error)]
pub enum ScalerLoadError {
    #[error("cannot read scaler artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed scaler artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scaler columns {got:?} do not match the scaled columns {expected:?}")]
    ColumnMismatch {
        expected: Vec<&'static str>,
        got: Vec<String>,
    },
    #[error("scaler column `{0}` listed more than once")]
    DuplicateColumn(String),
    #[error("scaler has {columns} columns but {means} means and {scales} scales")]
    LengthMismatch {
        columns: usize,
        means: usize,
        scales: usize,
    },
    #[error("scaler column `{column}` has unusable scale {scale}")]
    InvalidScale { column: &'static str, scale: f64 },
    #[error("scaler column `{column}` has non-finite mean {mean}")]
    InvalidMean { column: &'static str, mean: f64 },
}

/// On-disk form: parallel arrays keyed by column name.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerArtifact {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineParams {
    pub mean: f64,
    pub scale: f64,
}

/// Post-scaling model input: five transformed columns and eight raw
/// passthrough columns, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledVector {
    values: [f64; FEATURE_COUNT],
}

impl ScaledVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    /// Indexed like [`SCALED_COLUMNS`].
    params: [AffineParams; SCALED_COUNT],
}

impl Scaler {
    pub fn from_file(path: &Path) -> Result<Self, ScalerLoadError> {
        let content = read_to_string_maybe_gz(path).map_err(|source| ScalerLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scaler = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), columns = SCALED_COUNT, "scaler loaded");
        Ok(scaler)
    }

    pub fn from_json(json: &str) -> Result<Self, ScalerLoadError> {
        let artifact: ScalerArtifact = serde_json::from_str(json)?;
        Self::from_artifact(&artifact)
    }

    /// Maps the artifact's columns onto the canonical scaled columns. The
    /// artifact may list them in any order, but must list each exactly once.
    pub fn from_artifact(artifact: &ScalerArtifact) -> Result<Self, ScalerLoadError> {
        let n = artifact.columns.len();
        if artifact.mean.len() != n || artifact.scale.len() != n {
            return Err(ScalerLoadError::LengthMismatch {
                columns: n,
                means: artifact.mean.len(),
                scales: artifact.scale.len(),
            });
        }

        let mut slots: [Option<AffineParams>; SCALED_COUNT] = [None; SCALED_COUNT];
        for (i, name) in artifact.columns.iter().enumerate() {
            let Some(slot) = SCALED_COLUMNS.iter().position(|f| f.name() == name) else {
                return Err(column_mismatch(artifact));
            };
            if slots[slot].is_some() {
                return Err(ScalerLoadError::DuplicateColumn(name.clone()));
            }
            slots[slot] = Some(AffineParams {
                mean: artifact.mean[i],
                scale: artifact.scale[i],
            });
        }

        let mut params = [AffineParams {
            mean: 0.0,
            scale: 1.0,
        }; SCALED_COUNT];
        for (slot, feature) in SCALED_COLUMNS.iter().enumerate() {
            let Some(p) = slots[slot] else {
                return Err(column_mismatch(artifact));
            };
            if !p.mean.is_finite() {
                return Err(ScalerLoadError::InvalidMean {
                    column: feature.name(),
                    mean: p.mean,
                });
            }
            if !p.scale.is_finite() || p.scale == 0.0 {
                return Err(ScalerLoadError::InvalidScale {
                    column: feature.name(),
                    scale: p.scale,
                });
            }
            params[slot] = p;
        }

        Ok(Self { params })
    }

    /// The fixed set of columns this scaler transforms.
    pub fn fit_columns() -> &'static [Feature; SCALED_COUNT] {
        &SCALED_COLUMNS
    }

    pub fn params(&self, feature: Feature) -> Option<AffineParams> {
        SCALED_COLUMNS
            .iter()
            .position(|f| *f == feature)
            .map(|slot| self.params[slot])
    }

    /// `x' = (x - mean) / scale` on the scaled columns; every other position
    /// is copied through unchanged.
    pub fn transform(&self, vector: &FeatureVector) -> ScaledVector {
        let mut values = *vector.values();
        for (feature, p) in SCALED_COLUMNS.iter().zip(self.params.iter()) {
            let idx = feature.index();
            values[idx] = (values[idx] - p.mean) / p.scale;
        }
        ScaledVector { values }
    }
}

fn column_mismatch(artifact: &ScalerArtifact) -> ScalerLoadError {
    ScalerLoadError::ColumnMismatch {
        expected: SCALED_COLUMNS.iter().map(|f| f.name()).collect(),
        got: artifact.columns.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scaler/tests.rs"]
mod tests;
