//! Dense feed-forward network loaded from a JSON artifact.
//!
//! The pre-trained classifier ships as a bundled artifact describing a
//! small fully-connected network: per-layer weight matrices, bias
//! vectors and activation tags, ending in a single-unit head that
//! produces the probability-like score. Loading validates the artifact
//! before it is ever allowed to serve inference; a malformed or
//! unreadable artifact refuses to load rather than panicking later.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend::InferenceBackend;
use crate::{ModelError, Result};

/// Activation function applied to a layer's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Pass-through.
    Linear,
    /// Rectified linear unit.
    Relu,
    /// Logistic sigmoid, used on the output head.
    Sigmoid,
    /// Hyperbolic tangent.
    Tanh,
}

impl Activation {
    /// Applies the activation to one pre-activation value.
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Tanh => x.tanh(),
        }
    }
}

/// One fully-connected layer: `outputs = activation(weights · inputs + biases)`.
///
/// `weights` is row-major, one row per output unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weight matrix, `weights[output][input]`.
    pub weights: Vec<Vec<f64>>,
    /// Bias vector, one entry per output unit.
    pub biases: Vec<f64>,
    /// Activation applied after the affine transform.
    pub activation: Activation,
}

/// Pre-trained dense network backend deserialized from a JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    /// Model name recorded in the artifact, used in logs.
    pub name: String,
    /// Number of input features the first layer expects.
    pub input_len: usize,
    /// Layers in forward order; the last layer has exactly one unit.
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Loads and validates an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LoadFailed`] when the file cannot be read
    /// and [`ModelError::InvalidArtifact`] when its contents do not
    /// describe a servable network.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ModelError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let network = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            name = %network.name,
            layers = network.layers.len(),
            "loaded dense network artifact"
        );
        Ok(network)
    }

    /// Parses and validates an artifact from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArtifact`] on malformed JSON or an
    /// inconsistent network description.
    pub fn from_json(json: &str) -> Result<Self> {
        let network: Self = serde_json::from_str(json).map_err(|e| ModelError::InvalidArtifact {
            message: e.to_string(),
        })?;
        network.validate()?;
        Ok(network)
    }

    /// Checks that the layer dimensions chain correctly, every weight
    /// is finite, and the network ends in a single-unit head.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArtifact`] describing the first
    /// inconsistency found.
    pub fn validate(&self) -> Result<()> {
        if self.input_len == 0 {
            return Err(invalid("input_len must be at least 1"));
        }
        if self.layers.is_empty() {
            return Err(invalid("network has no layers"));
        }

        let mut width = self.input_len;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(invalid(format!("layer {i} has no output units")));
            }
            if layer.biases.len() != layer.weights.len() {
                return Err(invalid(format!(
                    "layer {i}: {} bias entries for {} output units",
                    layer.biases.len(),
                    layer.weights.len()
                )));
            }
            for (unit, row) in layer.weights.iter().enumerate() {
                if row.len() != width {
                    return Err(invalid(format!(
                        "layer {i} unit {unit}: expected {width} weights, found {}",
                        row.len()
                    )));
                }
                if row.iter().any(|w| !w.is_finite()) {
                    return Err(invalid(format!("layer {i} unit {unit}: non-finite weight")));
                }
            }
            if layer.biases.iter().any(|b| !b.is_finite()) {
                return Err(invalid(format!("layer {i}: non-finite bias")));
            }
            width = layer.weights.len();
        }

        if width != 1 {
            return Err(invalid(format!(
                "final layer must have exactly 1 output unit, found {width}"
            )));
        }
        Ok(())
    }

    /// Runs the forward pass, returning the final layer's activations.
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut activations = input.to_vec();
        for layer in &self.layers {
            let mut next = Vec::with_capacity(layer.weights.len());
            for (row, bias) in layer.weights.iter().zip(&layer.biases) {
                let sum: f64 = row
                    .iter()
                    .zip(&activations)
                    .map(|(weight, value)| weight * value)
                    .sum();
                next.push(layer.activation.apply(sum + bias));
            }
            activations = next;
        }
        activations
    }
}

impl InferenceBackend for DenseNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_len(&self) -> usize {
        self.input_len
    }

    fn infer(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.input_len {
            return Err(ModelError::ShapeMismatch {
                expected: self.input_len,
                actual: features.len(),
            });
        }
        self.forward(features)
            .last()
            .copied()
            .ok_or_else(|| ModelError::Inference {
                message: "network produced no output".to_string(),
            })
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidArtifact {
        message: message.into(),
    }
}
