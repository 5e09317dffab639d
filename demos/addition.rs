use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use scalar_nn::{train_loop, ActivationFunction, Dataset, Network, TrainConfig};

// Trains on a background thread and watches the step stream, the way a UI
// would: print every 300th step and stop the trainer once it has done enough.
fn main() {
    let dataset = Dataset::addition(9).expect("valid dataset");
    let mut network = Network::new(2, 1, &[3, 3], ActivationFunction::Tanh, 0.5).expect("valid topology");

    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let config = TrainConfig {
        progress_tx: Some(tx),
        stop_flag: Some(stop.clone()),
        emit_snapshot: true,
        ..TrainConfig::new(200_000)
    };

    let trainer = {
        let dataset = dataset.clone();
        thread::spawn(move || {
            let summary = train_loop(&mut network, &dataset, &config).expect("training failed");
            (network, summary)
        })
    };

    for step in rx {
        if step.iteration % 300 == 0 {
            let range = step.network.as_ref()
                .map(|n| format!("[{:.3}, {:.3}]", n.min_weight, n.max_weight))
                .unwrap_or_default();
            println!(
                "Epoch: {:07}  {} + {} -> {:.2}  error = {:.6}  weights {}",
                step.iteration, step.inputs[0], step.inputs[1], step.output[0], step.error, range
            );
        }
        if step.iteration >= 60_000 {
            stop.store(true, Ordering::Relaxed);
        }
    }

    let (mut network, summary) = trainer.join().expect("trainer thread panicked");
    println!("stopped after {} steps, mean error {:.6}", summary.iterations, summary.mean_error);

    for (a, b) in [(1.0, 2.0), (4.0, 4.0), (0.0, 9.0), (5.0, 3.0)] {
        let out = network.predict(&dataset.normalize(&[a, b])).expect("prediction failed");
        println!("{} + {} = {:.0}", a, b, dataset.denormalize(&out)[0]);
    }
}
