use serde_json::{Value, json};

use crate::schema::RawInputs;

/// Quick-load demo patients. Each call builds a fresh mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Older patient with hypertension, high cholesterol and ST depression.
    HighRisk,
    /// Middle-aged patient with unremarkable vitals.
    Healthy,
    /// Young patient with textbook-low values.
    DemoLow,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::HighRisk => "high-risk",
            Preset::Healthy => "healthy",
            Preset::DemoLow => "demo-low",
        }
    }

    pub fn raw_inputs(self) -> RawInputs {
        let value = match self {
            Preset::HighRisk => json!({
                "age": 65, "sex": 1, "cp": 0, "trestbps": 160, "chol": 300,
                "fbs": 1, "restecg": 2, "thalach": 100, "exang": 1,
                "oldpeak": 2.5, "slope": 1, "ca": 2, "thal": 1
            }),
            Preset::Healthy => json!({
                "age": 50, "sex": 1, "cp": 2, "trestbps": 120, "chol": 200,
                "fbs": 0, "restecg": 0, "thalach": 160, "exang": 0,
                "oldpeak": 0.0, "slope": 0, "ca": 0, "thal": 1
            }),
            Preset::DemoLow => json!({
                "age": 25, "sex": 1, "cp": 0, "trestbps": 110, "chol": 150,
                "fbs": 0, "restecg": 0, "thalach": 175, "exang": 0,
                "oldpeak": 0.0, "slope": 2, "ca": 0, "thal": 2
            }),
        };
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => RawInputs::new(),
        }
    }
}
