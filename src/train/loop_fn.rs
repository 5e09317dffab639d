use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{NetworkError, Result};
use crate::network::network::Network;
use crate::train::dataset::Dataset;
use crate::train::step::{TrainStep, TrainSummary};
use crate::train::train_config::TrainConfig;

/// Continuously trains `network` online, cycling through `dataset` in order.
///
/// Each step is one forward pass, one backward pass and an immediate weight
/// update on sample `iteration % dataset.len()`.
///
/// # Early termination
/// The loop returns before `config.iterations` steps if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// Engine errors (shape mismatches between the dataset and the network) abort
/// the run and are returned as-is.
pub fn train_loop(network: &mut Network, dataset: &Dataset, config: &TrainConfig) -> Result<TrainSummary> {
    if dataset.is_empty() {
        return Err(NetworkError::InvalidDataset("dataset has no samples".into()));
    }

    let n = dataset.len();
    let delay = Duration::from_millis(config.step_delay_ms);
    // Error of the latest step on each sample, for the windowed mean.
    let mut recent = vec![0.0; n];
    let mut completed = 0;
    let mut last_error = 0.0;
    let mut stopped_early = false;

    for iteration in 0..config.iterations {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                debug!(iteration, "stop flag set");
                stopped_early = true;
                break;
            }
        }

        let sample = &dataset.samples[iteration % n];
        let (prediction, error) = network.train_step(&sample.inputs, &sample.target)?;
        recent[iteration % n] = error;
        last_error = error;
        completed += 1;

        if let Some(ref tx) = config.progress_tx {
            let step = TrainStep {
                network: config.emit_snapshot.then(|| network.export()),
                inputs: dataset.denormalize(&sample.inputs),
                output: dataset.denormalize(&prediction),
                iteration,
                error,
            };
            if tx.send(step).is_err() {
                debug!(iteration, "progress receiver dropped");
                stopped_early = completed < config.iterations;
                break;
            }
        }

        if config.log_every > 0 && iteration % config.log_every == 0 {
            info!(iteration, error, mean_error = window_mean(&recent, completed), "training");
        }

        if !delay.is_zero() && completed < config.iterations {
            thread::sleep(delay);
        }
    }

    let summary = TrainSummary {
        iterations: completed,
        last_error,
        mean_error: window_mean(&recent, completed),
        stopped_early,
    };
    info!(
        iterations = summary.iterations,
        mean_error = summary.mean_error,
        stopped_early = summary.stopped_early,
        "training finished"
    );
    Ok(summary)
}

/// Mean of the filled part of the per-sample error window.
fn window_mean(recent: &[f64], completed: usize) -> f64 {
    let filled = completed.min(recent.len());
    if filled == 0 {
        return 0.0;
    }
    recent[..filled].iter().sum::<f64>() / filled as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    use crate::activation::activation::ActivationFunction;
    use crate::network::topology::Topology;
    use crate::neuron::neuron::WeightInit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network(seed: u64) -> Network {
        Network::with_rng(
            Topology::new(2, &[3], 1),
            ActivationFunction::Tanh,
            0.5,
            WeightInit::Independent,
            &mut StdRng::seed_from_u64(seed),
        ).unwrap()
    }

    #[test]
    fn test_runs_requested_iterations() {
        let ds = Dataset::addition(9).unwrap();
        let mut net = network(1);
        let summary = train_loop(&mut net, &ds, &TrainConfig::new(120)).unwrap();
        assert_eq!(summary.iterations, 120);
        assert!(!summary.stopped_early);
        assert!(summary.mean_error >= 0.0);
    }

    #[test]
    fn test_emits_steps_in_raw_units() {
        let ds = Dataset::addition(9).unwrap();
        let mut net = network(2);
        let (tx, rx) = mpsc::channel();
        let config = TrainConfig {
            progress_tx: Some(tx),
            emit_snapshot: true,
            ..TrainConfig::new(60)
        };
        train_loop(&mut net, &ds, &config).unwrap();
        drop(config);

        let steps: Vec<TrainStep> = rx.iter().collect();
        assert_eq!(steps.len(), 60);
        assert_eq!(steps[0].iteration, 0);
        assert_eq!(steps[0].inputs, vec![0.0, 0.0]);
        // Sample order wraps after 55 pairs.
        assert_eq!(steps[55].inputs, steps[0].inputs);
        let snap = steps[59].network.as_ref().unwrap();
        assert_eq!(snap.activation, "tanh");
        assert_eq!(snap.weights.len(), 3);
    }

    #[test]
    fn test_stops_when_receiver_dropped() {
        let ds = Dataset::addition(9).unwrap();
        let mut net = network(3);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let config = TrainConfig { progress_tx: Some(tx), ..TrainConfig::new(1000) };
        let summary = train_loop(&mut net, &ds, &config).unwrap();
        assert_eq!(summary.iterations, 1);
        assert!(summary.stopped_early);
    }

    #[test]
    fn test_honours_stop_flag() {
        let ds = Dataset::addition(9).unwrap();
        let mut net = network(4);
        let flag = Arc::new(AtomicBool::new(true));
        let config = TrainConfig { stop_flag: Some(flag), ..TrainConfig::new(1000) };
        let before = net.export();
        let summary = train_loop(&mut net, &ds, &config).unwrap();
        assert_eq!(summary.iterations, 0);
        assert!(summary.stopped_early);
        assert_eq!(net.export(), before);
    }

    #[test]
    fn test_rejects_mismatched_dataset() {
        let ds = Dataset::addition(9).unwrap();
        let mut net = Network::new(3, 1, &[2], ActivationFunction::Tanh, 0.5).unwrap();
        assert!(matches!(
            train_loop(&mut net, &ds, &TrainConfig::new(5)),
            Err(NetworkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_window_mean() {
        assert_eq!(window_mean(&[0.0; 4], 0), 0.0);
        assert_eq!(window_mean(&[2.0, 4.0, 0.0, 0.0], 2), 3.0);
        assert_eq!(window_mean(&[1.0, 2.0, 3.0], 10), 2.0);
    }
}
