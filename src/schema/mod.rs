//! Feature schema: the canonical ordered list of the thirteen clinical
//! measurements, their domains, and validation of raw inputs into an
//! order-fixed [`FeatureVector`].
//!
//! Scaler, model and rule checks all index features through [`Feature`],
//! so the column order is defined exactly once, here.

pub mod domains;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub use domains::FeatureDomain;

/// Number of features the scaler and model were fit against.
pub const FEATURE_COUNT: usize = 13;

/// Number of continuous columns passed through the affine scaler.
pub const SCALED_COUNT: usize = 5;

/// Raw caller input: feature name to an untyped JSON value.
pub type RawInputs = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

/// Canonical feature order. Position in this array is the column index.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Age,
    Feature::Sex,
    Feature::Cp,
    Feature::Trestbps,
    Feature::Chol,
    Feature::Fbs,
    Feature::Restecg,
    Feature::Thalach,
    Feature::Exang,
    Feature::Oldpeak,
    Feature::Slope,
    Feature::Ca,
    Feature::Thal,
];

/// Columns the scaler transforms, fixed by how the model was trained.
pub const SCALED_COLUMNS: [Feature; SCALED_COUNT] = [
    Feature::Age,
    Feature::Trestbps,
    Feature::Chol,
    Feature::Thalach,
    Feature::Oldpeak,
];

impl Feature {
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Sex => "sex",
            Feature::Cp => "cp",
            Feature::Trestbps => "trestbps",
            Feature::Chol => "chol",
            Feature::Fbs => "fbs",
            Feature::Restecg => "restecg",
            Feature::Thalach => "thalach",
            Feature::Exang => "exang",
            Feature::Oldpeak => "oldpeak",
            Feature::Slope => "slope",
            Feature::Ca => "ca",
            Feature::Thal => "thal",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        FEATURE_ORDER.iter().copied().find(|f| f.name() == name)
    }

    pub fn domain(self) -> FeatureDomain {
        domains::domain_of(self)
    }

    pub fn is_scaled(self) -> bool {
        SCALED_COLUMNS.contains(&self)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn feature_names() -> [&'static str; FEATURE_COUNT] {
    FEATURE_ORDER.map(Feature::name)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("missing field `{field}` (expected {expected})")]
    Missing {
        field: &'static str,
        expected: FeatureDomain,
    },
    #[error("field `{field}` out of range: got {got}, expected {expected}")]
    OutOfRange {
        field: &'static str,
        expected: FeatureDomain,
        got: f64,
    },
    #[error("field `{field}` has the wrong kind: got {got}, expected {expected}")]
    WrongKind {
        field: &'static str,
        expected: FeatureDomain,
        got: String,
    },
    #[error("unknown field `{field}`")]
    Unknown { field: String },
}

impl SchemaViolation {
    pub fn field(&self) -> &str {
        match self {
            SchemaViolation::Missing { field, .. }
            | SchemaViolation::OutOfRange { field, .. }
            | SchemaViolation::WrongKind { field, .. } => field,
            SchemaViolation::Unknown { field } => field,
        }
    }
}

/// Validated measurements in canonical order and real-world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

/// Validates all thirteen fields and returns them in canonical order.
///
/// Unknown keys are rejected before any field is checked, then fields are
/// checked in canonical order; the first violation wins.
pub fn validate(raw: &RawInputs) -> Result<FeatureVector, SchemaViolation> {
    if let Some(unknown) = raw.keys().find(|k| Feature::from_name(k).is_none()) {
        return Err(SchemaViolation::Unknown {
            field: unknown.clone(),
        });
    }

    let mut values = [0.0f64; FEATURE_COUNT];
    for feature in FEATURE_ORDER {
        let domain = feature.domain();
        let value = match raw.get(feature.name()) {
            None | Some(Value::Null) => {
                return Err(SchemaViolation::Missing {
                    field: feature.name(),
                    expected: domain,
                });
            }
            Some(value) => value,
        };
        values[feature.index()] = domain.coerce(feature.name(), value)?;
    }

    Ok(FeatureVector { values })
}

#[cfg(test)]
#[path = "../../tests/src_inline/schema/tests.rs"]
mod tests;
