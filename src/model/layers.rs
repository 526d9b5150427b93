use serde::{Deserialize, Serialize};

use super::math::{dot, sigmoid, softmax_in_place};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    Softmax,
}

/// Fully-connected layer. `weights` is row-major: one row per output unit,
/// each row as long as the layer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn input_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_dim(&self) -> usize {
        self.weights.len()
    }

    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| dot(row, input) + b)
            .collect();
        match self.activation {
            Activation::Linear => {}
            Activation::Relu => out.iter_mut().for_each(|x| *x = x.max(0.0)),
            Activation::Tanh => out.iter_mut().for_each(|x| *x = x.tanh()),
            Activation::Sigmoid => out.iter_mut().for_each(|x| *x = sigmoid(*x)),
            Activation::Softmax => softmax_in_place(&mut out),
        }
        out
    }
}
