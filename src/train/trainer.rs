use crate::error::Result;
use crate::network::network::Network;
use crate::train::dataset::Sample;

/// One online pass over `samples` in order; returns the mean pre-update error.
pub fn train_network(network: &mut Network, samples: &[Sample]) -> Result<f64> {
    let mut total_error = 0.0;

    for sample in samples {
        let (_, error) = network.train_step(&sample.inputs, &sample.target)?;
        total_error += error;
    }

    Ok(total_error / samples.len().max(1) as f64)
}

/// Mean error over `samples` without updating any weight.
pub fn evaluate(network: &mut Network, samples: &[Sample]) -> Result<f64> {
    let mut total_error = 0.0;

    for sample in samples {
        network.predict(&sample.inputs)?;
        total_error += network.compute_error(&sample.target)?;
    }

    Ok(total_error / samples.len().max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::topology::Topology;
    use crate::neuron::neuron::WeightInit;
    use crate::train::dataset::Dataset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluate_leaves_weights_alone() {
        let ds = Dataset::addition(3).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let mut net = Network::with_rng(
            Topology::new(2, &[3], 1),
            ActivationFunction::Sigmoid,
            0.5,
            WeightInit::Independent,
            &mut rng,
        ).unwrap();
        let before = net.export();
        let err = evaluate(&mut net, &ds.samples).unwrap();
        assert!(err >= 0.0);
        assert_eq!(net.export(), before);
    }

    #[test]
    fn test_training_reduces_dataset_error() {
        let ds = Dataset::addition(9).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut net = Network::with_rng(
            Topology::new(2, &[3], 1),
            ActivationFunction::Tanh,
            0.1,
            WeightInit::Independent,
            &mut rng,
        ).unwrap();

        let initial = evaluate(&mut net, &ds.samples).unwrap();
        for _ in 0..300 {
            train_network(&mut net, &ds.samples).unwrap();
        }
        let trained = evaluate(&mut net, &ds.samples).unwrap();
        assert!(trained < initial, "error went from {} to {}", initial, trained);
    }
}
