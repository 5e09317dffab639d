use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use scalar_nn::{evaluate, train_loop, Dataset, NetworkConfig, RunConfig, TrainConfig, WeightInit};

#[test]
fn test_train_loop_learns_addition() {
    let dataset = Dataset::addition(9).unwrap();
    let cfg = NetworkConfig { learning_rate: 0.1, ..NetworkConfig::default() };
    let mut net = cfg.build(2, 1, &mut StdRng::seed_from_u64(77)).unwrap();

    let initial = evaluate(&mut net, &dataset.samples).unwrap();
    let summary = train_loop(&mut net, &dataset, &TrainConfig::new(dataset.len() * 400)).unwrap();
    let trained = evaluate(&mut net, &dataset.samples).unwrap();

    assert_eq!(summary.iterations, dataset.len() * 400);
    assert!(trained < initial, "error went from {} to {}", initial, trained);
}

#[test]
fn test_shared_draw_network_still_trains() {
    let dataset = Dataset::addition(9).unwrap();
    let cfg = NetworkConfig {
        learning_rate: 0.1,
        weight_init: WeightInit::SharedDraw,
        ..NetworkConfig::default()
    };
    let mut net = cfg.build(2, 1, &mut StdRng::seed_from_u64(78)).unwrap();

    let initial = evaluate(&mut net, &dataset.samples).unwrap();
    train_loop(&mut net, &dataset, &TrainConfig::new(dataset.len() * 200)).unwrap();
    assert!(evaluate(&mut net, &dataset.samples).unwrap() < initial);
}

#[test]
fn test_stop_from_consumer_thread() {
    let dataset = Dataset::addition(9).unwrap();
    let mut net = RunConfig::default().network.build(2, 1, &mut StdRng::seed_from_u64(1)).unwrap();

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let config = TrainConfig {
        progress_tx: Some(tx),
        stop_flag: Some(stop.clone()),
        ..TrainConfig::new(usize::MAX)
    };

    let handle = thread::spawn(move || train_loop(&mut net, &dataset, &config).unwrap());

    let mut seen = 0;
    for step in rx {
        assert_eq!(step.iteration, seen);
        assert!(step.error >= 0.0);
        seen += 1;
        if seen == 500 {
            stop.store(true, Ordering::Relaxed);
        }
    }

    let summary = handle.join().unwrap();
    assert!(summary.stopped_early);
    assert_eq!(summary.iterations, seen);
    assert!(seen >= 500);
}
