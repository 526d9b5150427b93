use serde_json::Value;

use crate::schema::{Feature, RawInputs};

/// Fields the simplified (patient-facing) form asks for.
pub const SIMPLIFIED_FIELDS: [Feature; 8] = [
    Feature::Age,
    Feature::Sex,
    Feature::Cp,
    Feature::Trestbps,
    Feature::Chol,
    Feature::Fbs,
    Feature::Thalach,
    Feature::Exang,
];

/// Values the simplified form supplies for the fields it does not collect.
pub const HEALTHY_DEFAULTS: [(Feature, f64); 5] = [
    (Feature::Restecg, 0.0),
    (Feature::Oldpeak, 0.0),
    (Feature::Slope, 2.0),
    (Feature::Ca, 0.0),
    (Feature::Thal, 2.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// All thirteen fields come from the caller.
    Full,
    /// Eight fields from the caller, the rest from [`HEALTHY_DEFAULTS`].
    Simplified,
}

/// Builds the raw input mapping for a form. Both forms end in the same
/// schema validation; the simplified one only fills fields left absent.
pub fn assemble(kind: FormKind, mut collected: RawInputs) -> RawInputs {
    if kind == FormKind::Simplified {
        for (feature, default) in HEALTHY_DEFAULTS {
            collected
                .entry(feature.name().to_string())
                .or_insert_with(|| default_value(feature, default));
        }
    }
    collected
}

/// Interprets a command-line value: numbers stay numbers, `true`/`false`
/// become booleans, anything else is passed on as text for the schema to
/// judge.
pub fn raw_value_from_arg(arg: &str) -> Value {
    let trimmed = arg.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(x) = trimmed.parse::<f64>() {
        if x.is_finite() {
            return Value::from(x);
        }
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(trimmed.to_string()),
    }
}

fn default_value(feature: Feature, default: f64) -> Value {
    if feature.is_scaled() {
        Value::from(default)
    } else {
        Value::from(default as i64)
    }
}
