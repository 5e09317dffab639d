use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scalar_nn::{train_loop, ActivationFunction, Dataset, Network, RunConfig, WeightInit};

#[derive(Parser)]
#[command(name = "scalar-nn", version, about = "Train a tiny feed-forward network to add digits")]
pub enum Cli {
    /// Train a network online on the single-digit addition task.
    Train {
        #[arg(long, short)]
        /// JSON run config; command line flags override its values.
        config: Option<PathBuf>,

        #[arg(long, short)]
        /// Activation function: `sigmoid` or `tanh`.
        activation: Option<ActivationFunction>,

        #[arg(long, value_delimiter = ',')]
        /// Hidden layer sizes, e.g. `3,6,3`.
        hidden: Option<Vec<usize>>,

        #[arg(long, short)]
        learning_rate: Option<f64>,

        #[arg(long, short)]
        /// Number of online training steps.
        iterations: Option<usize>,

        #[arg(long)]
        /// Pause between steps in milliseconds.
        step_delay_ms: Option<u64>,

        #[arg(long)]
        /// Largest digit of the task (also the normalization bound).
        max_digit: Option<usize>,

        #[arg(long)]
        /// Start every neuron with all incoming weights equal.
        shared_init: bool,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, short)]
        /// Write the trained weights to this JSON file.
        save: Option<PathBuf>,
    },

    /// Load a saved snapshot and add digits with it.
    Predict {
        #[arg(long, short)]
        model: PathBuf,

        #[arg(long, value_delimiter = ',')]
        /// Raw digits, one per model input, e.g. `3,4`.
        inputs: Vec<f64>,

        #[arg(long, default_value_t = 9)]
        max_digit: usize,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Self::Train {
                config,
                activation,
                hidden,
                learning_rate,
                iterations,
                step_delay_ms,
                max_digit,
                shared_init,
                seed,
                save,
            } => {
                let mut run = match config {
                    Some(path) => RunConfig::load_json(&path.to_string_lossy())
                        .with_context(|| format!("failed to read config {}", path.display()))?,
                    None => RunConfig::default(),
                };

                if let Some(activation) = activation { run.network.activation = activation; }
                if let Some(hidden) = hidden { run.network.hidden = hidden; }
                if let Some(rate) = learning_rate { run.network.learning_rate = rate; }
                if let Some(n) = iterations { run.train.iterations = n; }
                if let Some(ms) = step_delay_ms { run.train.step_delay_ms = ms; }
                if let Some(d) = max_digit { run.max_digit = d; }
                if shared_init { run.network.weight_init = WeightInit::SharedDraw; }
                if seed.is_some() { run.seed = seed; }

                train(&run, save)
            }

            Self::Predict { model, inputs, max_digit } => {
                let mut network = Network::load_json(&model.to_string_lossy())
                    .with_context(|| format!("failed to load model {}", model.display()))?;
                warn!("snapshots carry no biases; restored biases are random");

                ensure!(max_digit >= 1, "--max-digit must be at least 1");
                ensure!(
                    inputs.len() == network.num_inputs(),
                    "model expects {} inputs, got {}",
                    network.num_inputs(),
                    inputs.len()
                );

                let scale = max_digit as f64;
                let scaled: Vec<f64> = inputs.iter().map(|x| x / scale).collect();
                let sum = network.predict(&scaled)?[0] * scale;

                println!("{}", format_sum(&inputs, sum));
                Ok(())
            }
        }
    }
}

fn train(run: &RunConfig, save: Option<PathBuf>) -> anyhow::Result<()> {
    let mut rng = match run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let dataset = Dataset::addition(run.max_digit)?;
    let mut network = run.network.build(dataset.input_size(), dataset.output_size(), &mut rng)?;

    info!(
        activation = %run.network.activation,
        hidden = ?run.network.hidden,
        learning_rate = run.network.learning_rate,
        samples = dataset.len(),
        "starting training"
    );

    let summary = train_loop(&mut network, &dataset, &run.train)?;

    let mut correct = 0;
    for sample in &dataset.samples {
        let raw: Vec<f64> = dataset.denormalize(&sample.inputs).iter().map(|x| x.round()).collect();
        let predicted = dataset.denormalize(&network.predict(&sample.inputs)?)[0].round();
        let expected = raw[0] + raw[1];
        let mark = if predicted == expected { correct += 1; "" } else { "  <- wrong" };
        println!("{} + {} = {}{}", raw[0], raw[1], predicted, mark);
    }
    println!(
        "{}/{} correct after {} steps (max digit {}), mean error {:.6}",
        correct,
        dataset.len(),
        summary.iterations,
        run.max_digit,
        summary.mean_error
    );

    if let Some(path) = save {
        network.save_json(&path.to_string_lossy())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved snapshot");
    }

    Ok(())
}

/// `a + b = rounded (raw)`, for however many addends the model takes.
fn format_sum(inputs: &[f64], sum: f64) -> String {
    let addends: Vec<String> = inputs.iter().map(f64::to_string).collect();
    format!("{} = {} ({:.4})", addends.join(" + "), sum.round(), sum)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Cli::parse().execute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sum() {
        assert_eq!(format_sum(&[3.0, 4.0], 6.9712), "3 + 4 = 7 (6.9712)");
        assert_eq!(format_sum(&[5.0], 4.5), "5 = 5 (4.5000)");
    }

    #[test]
    fn test_predict_accepts_single_input_model() {
        let dir = std::env::temp_dir().join(format!("scalar-nn-predict-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let model = dir.join("one_input.json");
        std::fs::write(
            &model,
            r#"{"weights":[[[]],[[0.5]]],"minWeight":0.5,"maxWeight":0.5,"activation":"tanh","learningRate":0.5}"#,
        ).unwrap();

        let predict = Cli::Predict { model: model.clone(), inputs: vec![4.0], max_digit: 9 };
        assert!(predict.execute().is_ok());

        let mismatched = Cli::Predict { model, inputs: vec![1.0, 2.0], max_digit: 9 };
        assert!(mismatched.execute().is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
