pub mod error;
pub mod activation;
pub mod neuron;
pub mod layers;
pub mod network;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use activation::activation::ActivationFunction;
pub use neuron::neuron::{Neuron, WeightInit};
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::snapshot::NetworkSnapshot;
pub use network::topology::Topology;
pub use train::loop_fn::train_loop;
pub use train::trainer::{evaluate, train_network};
pub use train::{Dataset, Sample, TrainConfig, NetworkConfig, RunConfig, TrainStep, TrainSummary};
