use std::fmt;

use serde_json::Value;

use crate::schema::{Feature, SchemaViolation};

/// Declared domain of a single feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDomain {
    /// Continuous measurement in a closed range.
    Range { min: f64, max: f64 },
    /// Ordinal or categorical code; only the listed integers are valid.
    Codes(&'static [u8]),
    /// 0/1 flag. Besides 0, 1 and JSON booleans, the listed words are
    /// accepted case-insensitively and mapped to the paired value.
    Flag { words: &'static [(&'static str, u8)] },
}

const YES_NO: &[(&str, u8)] = &[("yes", 1), ("no", 0)];
const MALE_FEMALE: &[(&str, u8)] = &[("male", 1), ("female", 0)];

pub fn domain_of(feature: Feature) -> FeatureDomain {
    match feature {
        Feature::Age => FeatureDomain::Range {
            min: 1.0,
            max: 120.0,
        },
        Feature::Sex => FeatureDomain::Flag { words: MALE_FEMALE },
        Feature::Cp => FeatureDomain::Codes(&[0, 1, 2, 3]),
        Feature::Trestbps => FeatureDomain::Range {
            min: 80.0,
            max: 200.0,
        },
        Feature::Chol => FeatureDomain::Range {
            min: 100.0,
            max: 600.0,
        },
        Feature::Fbs => FeatureDomain::Flag { words: YES_NO },
        Feature::Restecg => FeatureDomain::Codes(&[0, 1, 2]),
        Feature::Thalach => FeatureDomain::Range {
            min: 60.0,
            max: 220.0,
        },
        Feature::Exang => FeatureDomain::Flag { words: YES_NO },
        Feature::Oldpeak => FeatureDomain::Range { min: 0.0, max: 6.2 },
        Feature::Slope => FeatureDomain::Codes(&[0, 1, 2]),
        Feature::Ca => FeatureDomain::Codes(&[0, 1, 2, 3, 4]),
        Feature::Thal => FeatureDomain::Codes(&[0, 1, 2, 3]),
    }
}

impl FeatureDomain {
    pub fn coerce(&self, field: &'static str, value: &Value) -> Result<f64, SchemaViolation> {
        match *self {
            FeatureDomain::Range { min, max } => {
                let x = finite_number(field, *self, value)?;
                if x < min || x > max {
                    return Err(SchemaViolation::OutOfRange {
                        field,
                        expected: *self,
                        got: x,
                    });
                }
                Ok(x)
            }
            FeatureDomain::Codes(codes) => {
                let x = finite_number(field, *self, value)?;
                check_code(field, *self, codes, x)
            }
            FeatureDomain::Flag { words } => match value {
                Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
                Value::String(s) => {
                    let lower = s.trim().to_ascii_lowercase();
                    words
                        .iter()
                        .find(|(w, _)| *w == lower)
                        .map(|(_, code)| f64::from(*code))
                        .ok_or_else(|| wrong_kind(field, *self, value))
                }
                _ => {
                    let x = finite_number(field, *self, value)?;
                    check_code(field, *self, &[0, 1], x)
                }
            },
        }
    }
}

impl fmt::Display for FeatureDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureDomain::Range { min, max } => write!(f, "a number in [{min}, {max}]"),
            FeatureDomain::Codes(codes) => {
                f.write_str("one of {")?;
                for (i, c) in codes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("}")
            }
            FeatureDomain::Flag { words } => {
                f.write_str("a 0/1 flag")?;
                for (w, code) in words.iter() {
                    write!(f, ", \"{w}\"={code}")?;
                }
                Ok(())
            }
        }
    }
}

fn finite_number(
    field: &'static str,
    domain: FeatureDomain,
    value: &Value,
) -> Result<f64, SchemaViolation> {
    match value.as_f64() {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(wrong_kind(field, domain, value)),
    }
}

fn check_code(
    field: &'static str,
    domain: FeatureDomain,
    codes: &[u8],
    x: f64,
) -> Result<f64, SchemaViolation> {
    if x.fract() != 0.0 {
        return Err(SchemaViolation::WrongKind {
            field,
            expected: domain,
            got: format!("non-integral number {x}"),
        });
    }
    if codes.iter().any(|&c| f64::from(c) == x) {
        Ok(x)
    } else {
        Err(SchemaViolation::OutOfRange {
            field,
            expected: domain,
            got: x,
        })
    }
}

fn wrong_kind(field: &'static str, domain: FeatureDomain, value: &Value) -> SchemaViolation {
    let got = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    };
    SchemaViolation::WrongKind {
        field,
        expected: domain,
        got,
    }
}
