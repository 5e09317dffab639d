pub mod neuron;

pub use neuron::{Neuron, WeightInit};
