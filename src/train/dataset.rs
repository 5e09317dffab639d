use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// One normalized training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub inputs: Vec<f64>,
    pub target: Vec<f64>,
}

/// Training examples plus the bound they were normalized by.
///
/// The engine only ever sees normalized values; `scale` lets callers map
/// inputs and predictions back to their raw range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    pub scale: f64,
}

impl Dataset {
    /// Single-digit addition: every pair `(a, b)` with `a + b <= max_digit`,
    /// inputs `[a, b] / max_digit`, target `[(a + b) / max_digit]`.
    pub fn addition(max_digit: usize) -> Result<Dataset> {
        if max_digit == 0 {
            return Err(NetworkError::InvalidDataset("max_digit must be at least 1".into()));
        }
        let scale = max_digit as f64;
        let mut samples = Vec::new();
        for a in 0..=max_digit {
            for b in 0..=max_digit - a {
                samples.push(Sample {
                    inputs: vec![a as f64 / scale, b as f64 / scale],
                    target: vec![(a + b) as f64 / scale],
                });
            }
        }
        Ok(Dataset { samples, scale })
    }

    pub fn normalize(&self, raw: &[f64]) -> Vec<f64> {
        raw.iter().map(|x| x / self.scale).collect()
    }

    pub fn denormalize(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|x| x * self.scale).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.samples.first().map(|s| s.inputs.len()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.samples.first().map(|s| s.target.len()).unwrap_or(0)
    }
}
