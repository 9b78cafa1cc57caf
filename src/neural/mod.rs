//! Small feedforward networks used as evolvable snake controllers
//!
//! Provides:
//! - Fully connected layers with ReLU and softmax activations
//! - A network type that doubles as the genome (clone, mutate, crossover)
//! - A serde interchange record validated against the declared architecture

pub mod genome;
pub mod layer;
pub mod network;

pub use genome::{GenomeRecord, LayerRecord};
pub use layer::{Activation, Layer};
pub use network::{argmax, Network, NetworkConfig};
