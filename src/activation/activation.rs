use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetworkError;

/// Scalar nonlinearity applied by every neuron of a network.
///
/// Only functions whose derivative can be written in terms of their own
/// output are supported: backpropagation evaluates `derivative()` on the
/// neuron's stored output, not on its weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    /// Applies the activation to a pre-activation weighted sum.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Derivative expressed in terms of the activation's output `value`.
    pub fn derivative(&self, value: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => value * (1.0 - value),
            ActivationFunction::Tanh => 1.0 - value * value,
        }
    }

    /// Name used in snapshots and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
        }
    }

    /// Open interval `(lo, hi)` every output of this activation lies in.
    pub fn range(&self) -> (f64, f64) {
        match self {
            ActivationFunction::Sigmoid => (0.0, 1.0),
            ActivationFunction::Tanh => (-1.0, 1.0),
        }
    }

    /// Resolves a name such as `"tanh"` or `"Sigmoid"` (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, NetworkError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "tanh" => Ok(ActivationFunction::Tanh),
            _ => Err(NetworkError::UnknownActivation(name.to_string())),
        }
    }
}

impl FromStr for ActivationFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationFunction::from_name(s)
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
