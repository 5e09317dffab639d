use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::activation::activation::ActivationFunction;
use crate::error::{check_len, NetworkError, Result};
use crate::layers::dense::Layer;
use crate::network::snapshot::NetworkSnapshot;
use crate::network::topology::Topology;
use crate::neuron::neuron::WeightInit;

/// A stack of layers: input layer, zero or more hidden layers, output layer.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    activation: ActivationFunction,
    learning_rate: f64,
}

impl Network {
    /// Builds a network with random weights drawn from the thread RNG.
    pub fn new(
        num_inputs: usize,
        num_outputs: usize,
        hidden: &[usize],
        activation: ActivationFunction,
        learning_rate: f64,
    ) -> Result<Network> {
        Network::with_rng(
            Topology::new(num_inputs, hidden, num_outputs),
            activation,
            learning_rate,
            WeightInit::default(),
            &mut rand::thread_rng(),
        )
    }

    pub fn with_rng<R: Rng + ?Sized>(
        topology: Topology,
        activation: ActivationFunction,
        learning_rate: f64,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Network> {
        topology.validate()?;
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(NetworkError::InvalidTopology(format!(
                "learning rate must be a positive number, got {}",
                learning_rate
            )));
        }

        let sizes = topology.layer_sizes();
        let mut layers = Vec::with_capacity(sizes.len());
        layers.push(Layer::with_rng(sizes[0], 0, activation, learning_rate, init, rng));
        for pair in sizes.windows(2) {
            layers.push(Layer::with_rng(pair[1], pair[0], activation, learning_rate, init, rng));
        }

        debug!(?sizes, %activation, learning_rate, ?init, "built network");
        Ok(Network { layers, activation, learning_rate })
    }

    /// Rebuilds a network from an exported snapshot.
    ///
    /// Topology is inferred from the weight structure. Biases are not stored in
    /// snapshots, so the restored neurons keep freshly drawn biases.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Network> {
        Network::from_snapshot_with_rng(snapshot, &mut rand::thread_rng())
    }

    pub fn from_snapshot_with_rng<R: Rng + ?Sized>(
        snapshot: &NetworkSnapshot,
        rng: &mut R,
    ) -> Result<Network> {
        let topology = snapshot.topology()?;
        let activation = ActivationFunction::from_name(&snapshot.activation)?;
        if !snapshot.learning_rate.is_finite() || snapshot.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidSnapshot(format!(
                "learning rate must be a positive number, got {}",
                snapshot.learning_rate
            )));
        }

        let mut network = Network::with_rng(
            topology,
            activation,
            snapshot.learning_rate,
            WeightInit::default(),
            rng,
        )?;
        for (layer, layer_weights) in network.layers.iter_mut().zip(&snapshot.weights).skip(1) {
            for (neuron, weights) in layer.neurons_mut().iter_mut().zip(layer_weights) {
                neuron.set_weights(weights.clone())?;
            }
        }

        debug!(layers = network.layers.len(), "restored network from snapshot; biases re-drawn");
        Ok(network)
    }

    pub fn from_json(json: &str) -> Result<Network> {
        Network::from_snapshot(&NetworkSnapshot::from_json(json)?)
    }

    pub fn set_inputs(&mut self, inputs: &[f64]) -> Result<()> {
        check_len("network inputs", self.num_inputs(), inputs.len())?;
        self.layers[0].set_inputs(inputs)
    }

    /// Forward pass over layers `1..N`; returns the output layer's values.
    pub fn feed_forward(&mut self) -> Result<Vec<f64>> {
        for i in 1..self.layers.len() {
            let inputs = self.layers[i - 1].get_outputs()?;
            self.layers[i].compute_outputs(&inputs)?;
        }
        self.outputs()
    }

    /// Sum of the output layer's halved squared errors.
    pub fn compute_error(&self, expected: &[f64]) -> Result<f64> {
        check_len("network targets", self.num_outputs(), expected.len())?;
        Ok(self.output_layer().compute_error(expected)?.iter().sum())
    }

    /// Backward pass from the output layer down to layer 1.
    ///
    /// The output layer receives the target vector; every earlier layer receives
    /// the summed partials returned by the layer after it.
    pub fn backpropagation(&mut self, expected: &[f64]) -> Result<()> {
        check_len("network targets", self.num_outputs(), expected.len())?;

        let last = self.layers.len() - 1;
        let mut signal = expected.to_vec();
        for i in (1..=last).rev() {
            let inputs = self.layers[i - 1].get_outputs()?;
            signal = self.layers[i].compute_backpropagation(&inputs, &signal, i == last)?;
        }
        Ok(())
    }

    /// `set_inputs` followed by `feed_forward`. Does not touch weights.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        self.set_inputs(inputs)?;
        self.feed_forward()
    }

    /// One online training step on a single example.
    ///
    /// Returns the prediction made before the update and the error of that
    /// prediction against `target`.
    pub fn train_step(&mut self, inputs: &[f64], target: &[f64]) -> Result<(Vec<f64>, f64)> {
        check_len("network targets", self.num_outputs(), target.len())?;
        let prediction = self.predict(inputs)?;
        self.backpropagation(target)?;
        let error = self.compute_error(target)?;
        Ok((prediction, error))
    }

    pub fn export(&self) -> NetworkSnapshot {
        let (min_weight, max_weight) = self.weight_range();
        NetworkSnapshot {
            weights: self.layers.iter().map(Layer::weights).collect(),
            min_weight,
            max_weight,
            activation: self.activation.name().to_string(),
            learning_rate: self.learning_rate,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        self.export().to_json()
    }

    /// Smallest and largest weight over every non-input neuron.
    pub fn weight_range(&self) -> (f64, f64) {
        self.layers.iter()
            .skip(1)
            .flat_map(|layer| layer.neurons().iter())
            .flat_map(|neuron| neuron.weights().iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| (lo.min(w), hi.max(w)))
    }

    /// Biases per layer (the input layer's are never used).
    pub fn biases(&self) -> Vec<Vec<f64>> {
        self.layers.iter()
            .map(|layer| layer.neurons().iter().map(|n| n.bias()).collect())
            .collect()
    }

    /// Overwrites every bias, e.g. to carry full state across a snapshot.
    pub fn set_biases(&mut self, biases: &[Vec<f64>]) -> Result<()> {
        check_len("network bias layers", self.layers.len(), biases.len())?;
        for (layer, layer_biases) in self.layers.iter().zip(biases) {
            check_len("layer biases", layer.size(), layer_biases.len())?;
        }
        for (layer, layer_biases) in self.layers.iter_mut().zip(biases) {
            for (neuron, &bias) in layer.neurons_mut().iter_mut().zip(layer_biases) {
                neuron.set_bias(bias);
            }
        }
        Ok(())
    }

    /// Current values of the output layer.
    pub fn outputs(&self) -> Result<Vec<f64>> {
        self.output_layer().get_outputs()
    }

    pub fn topology(&self) -> Topology {
        let sizes: Vec<usize> = self.layers.iter().map(Layer::size).collect();
        let last = sizes.len() - 1;
        Topology::new(sizes[0], &sizes[1..last], sizes[last])
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn num_inputs(&self) -> usize {
        self.layers[0].size()
    }

    pub fn num_outputs(&self) -> usize {
        self.output_layer().size()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Writes the exported snapshot to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.export())?;
        Ok(())
    }

    /// Restores a network from a file written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let snapshot: NetworkSnapshot = serde_json::from_reader(reader)?;
        Network::from_snapshot(&snapshot)
    }
}

/// One line per layer, input layer first.
impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", layer)?;
        }
        Ok(())
    }
}
