use std::fmt;

use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NetworkError, Result};
use crate::neuron::neuron::{Neuron, WeightInit};

/// A fully connected layer: every neuron reads the same input vector.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new(
        size: usize,
        inputs_per_neuron: usize,
        activation: ActivationFunction,
        learning_rate: f64,
    ) -> Layer {
        Layer::with_rng(
            size,
            inputs_per_neuron,
            activation,
            learning_rate,
            WeightInit::default(),
            &mut rand::thread_rng(),
        )
    }

    pub fn with_rng<R: Rng + ?Sized>(
        size: usize,
        inputs_per_neuron: usize,
        activation: ActivationFunction,
        learning_rate: f64,
        init: WeightInit,
        rng: &mut R,
    ) -> Layer {
        let neurons = (0..size)
            .map(|_| Neuron::with_rng(inputs_per_neuron, learning_rate, activation, init, &mut *rng))
            .collect();
        Layer { neurons }
    }

    /// Runs the forward step of every neuron on `inputs`.
    pub fn compute_outputs(&mut self, inputs: &[f64]) -> Result<()> {
        for neuron in &mut self.neurons {
            neuron.compute_output(inputs)?;
        }
        Ok(())
    }

    /// Assigns `inputs[k]` to neuron `k`. Used for the input layer only.
    pub fn set_inputs(&mut self, inputs: &[f64]) -> Result<()> {
        check_len("layer inputs", self.neurons.len(), inputs.len())?;
        for (neuron, &value) in self.neurons.iter_mut().zip(inputs.iter()) {
            neuron.set_value(value);
        }
        Ok(())
    }

    pub fn get_outputs(&self) -> Result<Vec<f64>> {
        self.neurons.iter()
            .map(|neuron| neuron.value().ok_or(NetworkError::MissingOutput))
            .collect()
    }

    /// Per-neuron squared errors against `expected`.
    pub fn compute_error(&self, expected: &[f64]) -> Result<Vec<f64>> {
        check_len("layer targets", self.neurons.len(), expected.len())?;
        self.neurons.iter()
            .zip(expected.iter())
            .map(|(neuron, &e)| neuron.compute_error(e))
            .collect()
    }

    /// Backward step for every neuron; returns the element-wise sum of their
    /// partials, one entry per input. That sum is the `expected` signal for the
    /// previous layer.
    pub fn compute_backpropagation(
        &mut self,
        inputs: &[f64],
        expected: &[f64],
        is_output_layer: bool,
    ) -> Result<Vec<f64>> {
        check_len("layer backpropagation signal", self.neurons.len(), expected.len())?;

        let mut results = vec![0.0; inputs.len()];
        for (neuron, &e) in self.neurons.iter_mut().zip(expected.iter()) {
            let partials = neuron.compute_backpropagation(inputs, e, is_output_layer)?;
            for (acc, p) in results.iter_mut().zip(partials) {
                *acc += p;
            }
        }
        Ok(results)
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    /// Weights per neuron (0 for the input layer).
    pub fn inputs_per_neuron(&self) -> usize {
        self.neurons.first().map(Neuron::num_inputs).unwrap_or(0)
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    /// Weight vectors of every neuron, in order.
    pub fn weights(&self) -> Vec<Vec<f64>> {
        self.neurons.iter().map(|n| n.weights().to_vec()).collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, neuron) in self.neurons.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", neuron)?;
        }
        Ok(())
    }
}
