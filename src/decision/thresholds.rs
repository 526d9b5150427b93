#[derive(Debug, Clone, PartialEq)]
pub struct DecisionThresholds {
    /// Model-only cut-off; HIGH_RISK requires probability strictly above it.
    pub probability: f64,
    /// Resting blood pressure, mmHg, inclusive.
    pub resting_bp: f64,
    /// Serum cholesterol, mg/dl, inclusive.
    pub cholesterol: f64,
    /// ST depression, inclusive.
    pub oldpeak: f64,
}

impl DecisionThresholds {
    pub fn clinical_v1() -> Self {
        Self {
            probability: 0.5,
            resting_bp: 160.0,
            cholesterol: 280.0,
            oldpeak: 2.5,
        }
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self::clinical_v1()
    }
}
