use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::network::topology::Topology;

/// Serializable view of a network's weights and hyperparameters.
///
/// This is the JSON document exchanged with renderers, persistence and
/// cross-thread messaging:
///
/// ```json
/// {"weights":[[[],[]],[[w,w],[w,w],[w,w]],[[w,w,w]]],
///  "minWeight":0.1,"maxWeight":0.9,"activation":"tanh","learningRate":0.5}
/// ```
///
/// `weights[0]` holds one empty array per input neuron. Biases are not part of
/// the format, so a restored network starts with fresh random biases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// Per layer → per neuron → per incoming connection.
    pub weights: Vec<Vec<Vec<f64>>>,
    /// Smallest weight over every non-input neuron, for display scaling.
    pub min_weight: f64,
    pub max_weight: f64,
    pub activation: String,
    pub learning_rate: f64,
}

impl NetworkSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<NetworkSnapshot> {
        Ok(serde_json::from_str(json)?)
    }

    /// Infers the layer sizes from the shape of `weights`.
    ///
    /// The input size is taken from the first non-input layer's first weight
    /// vector; every other layer must agree with it.
    pub fn topology(&self) -> Result<Topology> {
        let layers = &self.weights;
        if layers.len() < 2 {
            return Err(NetworkError::InvalidSnapshot(format!(
                "expected at least 2 layers, found {}",
                layers.len()
            )));
        }

        let inputs = layers[1]
            .first()
            .map(Vec::len)
            .ok_or_else(|| NetworkError::InvalidSnapshot("layer 1 has no neurons".into()))?;
        if inputs == 0 {
            return Err(NetworkError::InvalidSnapshot("layer 1 neurons have no weights".into()));
        }
        if layers[0].len() != inputs {
            return Err(NetworkError::InvalidSnapshot(format!(
                "input layer has {} neurons but layer 1 expects {} inputs",
                layers[0].len(),
                inputs
            )));
        }
        if layers[0].iter().any(|w| !w.is_empty()) {
            return Err(NetworkError::InvalidSnapshot("input layer neurons must not carry weights".into()));
        }

        for i in 1..layers.len() {
            if layers[i].is_empty() {
                return Err(NetworkError::InvalidSnapshot(format!("layer {} has no neurons", i)));
            }
            let fan_in = layers[i - 1].len();
            if let Some(j) = layers[i].iter().position(|w| w.len() != fan_in) {
                return Err(NetworkError::InvalidSnapshot(format!(
                    "neuron {} of layer {} has {} weights, expected {}",
                    j,
                    i,
                    layers[i][j].len(),
                    fan_in
                )));
            }
        }

        let last = layers.len() - 1;
        let hidden: Vec<usize> = layers[1..last].iter().map(Vec::len).collect();
        Ok(Topology::new(inputs, &hidden, layers[last].len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2-3-3-1 tanh network with every weight set to 1.
    const PRESET: &str = r#"{"weights":[[[],[]],[[1,1],[1,1],[1,1]],[[1,1,1],[1,1,1],[1,1,1]],[[1,1,1]]],"minWeight":1,"maxWeight":1,"activation":"tanh","learningRate":0.5}"#;

    #[test]
    fn test_parse_preset() {
        let snap = NetworkSnapshot::from_json(PRESET).unwrap();
        assert_eq!(snap.activation, "tanh");
        assert_eq!(snap.learning_rate, 0.5);
        assert_eq!(snap.min_weight, 1.0);
        assert_eq!(snap.topology().unwrap(), Topology::new(2, &[3, 3], 1));
    }

    #[test]
    fn test_field_names() {
        let snap = NetworkSnapshot {
            weights: vec![vec![vec![]], vec![vec![0.5]]],
            min_weight: 0.5,
            max_weight: 0.5,
            activation: "sigmoid".into(),
            learning_rate: 0.1,
        };
        let json = snap.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"weights":[[[]],[[0.5]]],"minWeight":0.5,"maxWeight":0.5,"activation":"sigmoid","learningRate":0.1}"#
        );
    }

    #[test]
    fn test_topology_without_hidden_layers() {
        let snap = NetworkSnapshot::from_json(
            r#"{"weights":[[[],[]],[[0.1,0.2]]],"minWeight":0.1,"maxWeight":0.2,"activation":"tanh","learningRate":0.5}"#,
        ).unwrap();
        assert_eq!(snap.topology().unwrap(), Topology::new(2, &[], 1));
    }

    #[test]
    fn test_rejects_malformed_weights() {
        let base = NetworkSnapshot::from_json(PRESET).unwrap();

        let mut single = base.clone();
        single.weights.truncate(1);
        assert!(matches!(single.topology(), Err(NetworkError::InvalidSnapshot(_))));

        let mut ragged = base.clone();
        ragged.weights[2][1].push(1.0);
        assert!(matches!(ragged.topology(), Err(NetworkError::InvalidSnapshot(msg)) if msg.contains("layer 2")));

        let mut empty_layer = base.clone();
        empty_layer.weights[2].clear();
        assert!(empty_layer.topology().is_err());

        let mut weighted_input = base;
        weighted_input.weights[0][0].push(1.0);
        assert!(weighted_input.topology().is_err());
    }
}
