use thiserror::Error;

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Everything that can go wrong when building, running or restoring a network.
///
/// All of these are caller or configuration errors; the engine is deterministic
/// given its inputs and weights, so none of them are worth retrying.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// A vector handed to the engine does not match the layer it is meant for.
    #[error("shape mismatch in {context}: expected {expected} values, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown activation function `{0}` (expected `sigmoid` or `tanh`)")]
    UnknownActivation(String),

    /// The snapshot's weight structure cannot describe a network.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// A neuron value was read before `set_inputs` / `feed_forward` produced one.
    #[error("neuron output requested before it was computed")]
    MissingOutput,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn shape(context: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::ShapeMismatch { context, expected, actual }
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::shape(context, expected, actual))
    }
}
