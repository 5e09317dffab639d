use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NetworkError, Result};

/// How a freshly constructed neuron fills its weight vector.
///
/// - `Independent` — one uniform draw in `[0, 1)` per weight.
/// - `SharedDraw`  — a single draw copied into every weight of the neuron.
///   All incoming weights of a neuron start equal. Hidden neurons fed by the
///   same inputs then only differ through their bias, which slows learning;
///   use it to reproduce runs of networks that were initialized this way.
///
/// The bias is always drawn on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    #[default]
    Independent,
    SharedDraw,
}

/// A single scalar unit: weights, bias and the last value it produced.
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    value: Option<f64>,
    learning_rate: f64,
    activation: ActivationFunction,
}

impl Neuron {
    pub fn new(num_inputs: usize, learning_rate: f64, activation: ActivationFunction) -> Neuron {
        Neuron::with_rng(
            num_inputs,
            learning_rate,
            activation,
            WeightInit::default(),
            &mut rand::thread_rng(),
        )
    }

    pub fn with_rng<R: Rng + ?Sized>(
        num_inputs: usize,
        learning_rate: f64,
        activation: ActivationFunction,
        init: WeightInit,
        rng: &mut R,
    ) -> Neuron {
        let weights = match init {
            WeightInit::Independent => (0..num_inputs).map(|_| rng.gen::<f64>()).collect(),
            WeightInit::SharedDraw => vec![rng.gen::<f64>(); num_inputs],
        };
        let bias = rng.gen::<f64>();

        Neuron {
            weights,
            bias,
            value: None,
            learning_rate,
            activation,
        }
    }

    /// `bias + Σ inputs[k] * weights[k]`
    pub fn weighted_sum(&self, inputs: &[f64]) -> Result<f64> {
        check_len("neuron inputs", self.weights.len(), inputs.len())?;
        Ok(inputs.iter()
            .zip(self.weights.iter())
            .fold(self.bias, |acc, (x, w)| acc + x * w))
    }

    /// Stores `activation(weighted_sum(inputs))` as this neuron's value.
    pub fn compute_output(&mut self, inputs: &[f64]) -> Result<()> {
        let sum = self.weighted_sum(inputs)?;
        self.value = Some(self.activation.function(sum));
        Ok(())
    }

    /// Halved squared error `0.5 * (expected - value)²` of the current value.
    pub fn compute_error(&self, expected: f64) -> Result<f64> {
        let difference = expected - self.current_value()?;
        Ok(0.5 * difference * difference)
    }

    /// Sets the value directly. Only input-layer neurons are driven this way.
    pub fn set_value(&mut self, value: f64) {
        self.value = Some(value);
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        check_len("neuron weights", self.weights.len(), weights.len())?;
        self.weights = weights;
        Ok(())
    }

    /// One gradient-descent step for this neuron.
    ///
    /// `expected` is the target value when `is_output_layer` is true, and the
    /// accumulated partial derivative handed back by the next layer otherwise.
    ///
    /// Returns one partial per input, computed from the weights as they were
    /// before this step. The bias is nudged once per input with a tenth of the
    /// learning rate.
    pub fn compute_backpropagation(
        &mut self,
        inputs: &[f64],
        expected: f64,
        is_output_layer: bool,
    ) -> Result<Vec<f64>> {
        check_len("neuron inputs", self.weights.len(), inputs.len())?;
        let value = self.current_value()?;

        let mut delta = self.activation.derivative(value);
        if is_output_layer {
            delta *= -(expected - value);
        } else {
            delta *= expected;
        }

        let mut partials = Vec::with_capacity(self.weights.len());
        for (weight, input) in self.weights.iter_mut().zip(inputs.iter()) {
            let gradient = delta * input;
            partials.push(delta * *weight);
            *weight -= self.learning_rate * gradient;
            self.bias -= self.learning_rate / 10.0 * delta;
        }

        Ok(partials)
    }

    fn current_value(&self) -> Result<f64> {
        self.value.ok_or(NetworkError::MissingOutput)
    }

    /// Last computed (or directly set) value, `None` before the first one.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    pub fn num_inputs(&self) -> usize {
        self.weights.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }
}

/// Compact dump used when inspecting a network: `(w=[..], b=.., v=..)`.
impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(w=[")?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:.3}", w)?;
        }
        write!(f, "], b={:.3}, v=", self.bias)?;
        match self.value {
            Some(v) => write!(f, "{:.3})", v),
            None => f.write_str("-)"),
        }
    }
}
