//! Genome interchange format
//!
//! A `GenomeRecord` is the plain-data form of a network: the declared size
//! sequence plus one `(weights, biases)` pair per layer. Loading checks the
//! record against the architecture the caller expects and refuses anything
//! that does not line up.

use serde::{Deserialize, Serialize};

use super::layer::{Activation, Layer};
use super::network::{Network, NetworkConfig};
use crate::error::{Result, SnakeError};

/// Parameters of one layer, weights row-major `output × input`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

/// Serializable snapshot of a network's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord {
    /// `[input, hidden.., output]`
    pub layer_sizes: Vec<usize>,
    pub layers: Vec<LayerRecord>,
}

impl GenomeRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Network {
    /// Snapshot this network's parameters
    pub fn to_record(&self) -> GenomeRecord {
        GenomeRecord {
            layer_sizes: self.layer_sizes(),
            layers: self
                .layers()
                .iter()
                .map(|layer| LayerRecord {
                    weights: layer.weights().iter().copied().collect(),
                    biases: layer.biases().to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuild a network from a record, validated against `config`
    pub fn from_record(config: &NetworkConfig, record: GenomeRecord) -> Result<Self> {
        let expected = config.layer_sizes();
        if record.layer_sizes != expected {
            return Err(SnakeError::ArchitectureMismatch {
                expected: format!("{:?}", expected),
                found: format!("{:?}", record.layer_sizes),
            });
        }

        if record.layers.len() != expected.len() - 1 {
            return Err(SnakeError::ArchitectureMismatch {
                expected: format!("{} layers", expected.len() - 1),
                found: format!("{} layers", record.layers.len()),
            });
        }

        let last = record.layers.len() - 1;
        let mut layers = Vec::with_capacity(record.layers.len());
        for (i, (layer, sizes)) in record.layers.into_iter().zip(expected.windows(2)).enumerate() {
            let activation = if i == last {
                Activation::Softmax
            } else {
                Activation::Relu
            };
            let (weight_len, bias_len) = (layer.weights.len(), layer.biases.len());
            let built = Layer::from_parts(sizes[0], sizes[1], layer.weights, layer.biases, activation)
                .ok_or_else(|| SnakeError::ArchitectureMismatch {
                    expected: format!(
                        "layer {}: {} weights, {} biases",
                        i,
                        sizes[0] * sizes[1],
                        sizes[1]
                    ),
                    found: format!("{} weights, {} biases", weight_len, bias_len),
                })?;
            layers.push(built);
        }

        Network::from_layers(layers)
    }
}
