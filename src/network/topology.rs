use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Layer sizes of a network, input layer first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    #[serde(default)]
    pub hidden: Vec<usize>,
    pub outputs: usize,
}

impl Topology {
    pub fn new(inputs: usize, hidden: &[usize], outputs: usize) -> Topology {
        Topology { inputs, hidden: hidden.to_vec(), outputs }
    }

    /// Sizes of every layer: `[inputs, hidden.., outputs]`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden.len() + 2);
        sizes.push(self.inputs);
        sizes.extend_from_slice(&self.hidden);
        sizes.push(self.outputs);
        sizes
    }

    pub fn num_layers(&self) -> usize {
        self.hidden.len() + 2
    }

    /// Rejects layers without neurons.
    pub fn validate(&self) -> Result<()> {
        if self.inputs == 0 {
            return Err(NetworkError::InvalidTopology("input layer must have at least one neuron".into()));
        }
        if self.outputs == 0 {
            return Err(NetworkError::InvalidTopology("output layer must have at least one neuron".into()));
        }
        if let Some(i) = self.hidden.iter().position(|&size| size == 0) {
            return Err(NetworkError::InvalidTopology(format!("hidden layer {} has no neurons", i)));
        }
        Ok(())
    }
}
