use serde::{Serialize, Deserialize};

use crate::network::snapshot::NetworkSnapshot;

/// Message emitted by `train_loop` after every online step.
///
/// `inputs` and `output` are in raw (denormalized) units. Receivers use this to
/// redraw the network, update a prediction table and plot the error curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkSnapshot>,
    pub inputs: Vec<f64>,
    pub output: Vec<f64>,
    /// 0-based, increases by one per step.
    pub iteration: usize,
    /// Error of the prediction made before this step's update.
    pub error: f64,
}

/// Outcome of a finished (or stopped) `train_loop` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainSummary {
    /// Steps actually completed.
    pub iterations: usize,
    pub last_error: f64,
    /// Mean error over the most recent pass through the dataset.
    pub mean_error: f64,
    pub stopped_early: bool,
}
