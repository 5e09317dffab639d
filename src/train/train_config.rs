use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::Network;
use crate::network::topology::Topology;
use crate::neuron::neuron::WeightInit;
use crate::train::step::TrainStep;

/// Hyperparameters for building a network, kept apart from how it is trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    pub activation: ActivationFunction,
    pub hidden: Vec<usize>,
    pub learning_rate: f64,
    pub weight_init: WeightInit,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            activation: ActivationFunction::Tanh,
            hidden: vec![3],
            learning_rate: 0.5,
            weight_init: WeightInit::Independent,
        }
    }
}

impl NetworkConfig {
    pub fn build<R: Rng + ?Sized>(&self, inputs: usize, outputs: usize, rng: &mut R) -> Result<Network> {
        Network::with_rng(
            Topology::new(inputs, &self.hidden, outputs),
            self.activation,
            self.learning_rate,
            self.weight_init,
            rng,
        )
    }
}

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`    — number of online steps before the loop returns
/// - `step_delay_ms` — pause between steps so a UI thread reading
///                     `progress_tx` keeps up; `0` runs flat out
/// - `log_every`     — emit a progress log line every N steps (`0` disables)
/// - `emit_snapshot` — attach a full weight snapshot to every `TrainStep`
/// - `progress_tx`   — optional channel; one `TrainStep` per step. If the
///                     receiver is dropped the loop stops.
/// - `stop_flag`     — optional atomic flag checked before every step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainConfig {
    pub iterations: usize,
    pub step_delay_ms: u64,
    pub log_every: usize,
    pub emit_snapshot: bool,
    #[serde(skip)]
    pub progress_tx: Option<mpsc::Sender<TrainStep>>,
    #[serde(skip)]
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            iterations: 10_000_000,
            step_delay_ms: 3,
            log_every: 300,
            emit_snapshot: true,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

impl TrainConfig {
    /// A config that runs `iterations` steps without pausing or reporting.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            step_delay_ms: 0,
            log_every: 0,
            emit_snapshot: false,
            progress_tx: None,
            stop_flag: None,
        }
    }
}

/// Everything the CLI reads from a JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunConfig {
    pub network: NetworkConfig,
    pub train: TrainConfig,
    /// Largest digit of the addition task; also the normalization bound.
    pub max_digit: usize,
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkConfig::default(),
            train: TrainConfig::default(),
            max_digit: 9,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn load_json(path: &str) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let cfg: RunConfig = serde_json::from_str(
            r#"{"network":{"activation":"sigmoid","hidden":[3,6,3]},"train":{"iterations":10}}"#,
        ).unwrap();
        assert_eq!(cfg.network.activation, ActivationFunction::Sigmoid);
        assert_eq!(cfg.network.hidden, vec![3, 6, 3]);
        assert_eq!(cfg.network.learning_rate, 0.5);
        assert_eq!(cfg.network.weight_init, WeightInit::Independent);
        assert_eq!(cfg.train.iterations, 10);
        assert_eq!(cfg.train.step_delay_ms, 3);
        assert_eq!(cfg.max_digit, 9);
        assert!(cfg.train.progress_tx.is_none());
    }

    #[test]
    fn test_default_runs_ten_million_steps() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.iterations, 10_000_000);
        assert_eq!(cfg.step_delay_ms, 3);
        assert_eq!(cfg.log_every, 300);
    }

    #[test]
    fn test_weight_init_names() {
        let cfg: NetworkConfig = serde_json::from_str(r#"{"weightInit":"shared_draw"}"#).unwrap();
        assert_eq!(cfg.weight_init, WeightInit::SharedDraw);
    }

    #[test]
    fn test_build_network() {
        let cfg = NetworkConfig { hidden: vec![4, 2], ..NetworkConfig::default() };
        let net = cfg.build(2, 1, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(net.topology(), Topology::new(2, &[4, 2], 1));
        assert_eq!(net.activation(), ActivationFunction::Tanh);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("scalar_nn_run_config_test.json");
        let path = path.to_str().unwrap();
        let cfg = RunConfig { max_digit: 5, seed: Some(42), ..RunConfig::default() };
        cfg.save_json(path).unwrap();

        let loaded = RunConfig::load_json(path).unwrap();
        assert_eq!(loaded.max_digit, 5);
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.network, cfg.network);
        std::fs::remove_file(path).unwrap();
    }
}
