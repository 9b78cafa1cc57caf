//! Feedforward controller network and its genetic operators
//!
//! # Architecture
//!
//! ```text
//! Input: [input_size]            (move-history features)
//!   ↓ Linear + ReLU              (one per hidden size)
//!   ↓ Linear + Softmax
//! Output: [output_size]          (Left, Right, Straight)
//! ```
//!
//! A `Network` is also the genome: its weights and biases are what
//! selection, crossover and mutation operate on. `Clone` is a deep copy, so a
//! child never aliases a parent's parameters.

use ndarray::ArrayView1;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use super::layer::{Activation, Layer};
use crate::error::{Result, SnakeError};
use crate::game::{Turn, HISTORY_FEATURES};

/// Declared architecture of a controller network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Length of the feature vector the network accepts
    pub input_size: usize,

    /// Width of every hidden layer, in order
    pub hidden_sizes: Vec<usize>,

    /// Number of outputs (one per egocentric action)
    pub output_size: usize,

    /// Standard deviation of the Gaussian noise added by mutation
    pub mutation_std_dev: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_size: HISTORY_FEATURES,
            hidden_sizes: vec![7],
            output_size: Turn::COUNT,
            mutation_std_dev: 0.1,
        }
    }
}

impl NetworkConfig {
    /// Full size sequence `[input, hidden.., output]`
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_sizes.len() + 2);
        sizes.push(self.input_size);
        sizes.extend_from_slice(&self.hidden_sizes);
        sizes.push(self.output_size);
        sizes
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(zero) = self.layer_sizes().iter().position(|&s| s == 0) {
            return Err(format!("layer {} has zero width", zero));
        }

        if !self.mutation_std_dev.is_finite() || self.mutation_std_dev < 0.0 {
            return Err(format!(
                "mutation_std_dev must be finite and non-negative, got {}",
                self.mutation_std_dev
            ));
        }

        Ok(())
    }

    /// Build a network with freshly sampled weights
    pub fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let sizes = self.layer_sizes();
        let last = sizes.len() - 2;
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation = if i == last {
                    Activation::Softmax
                } else {
                    Activation::Relu
                };
                Layer::random(pair[0], pair[1], activation, rng)
            })
            .collect();

        Network { layers }
    }
}

/// Stack of fully connected layers
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Assemble a network from prebuilt layers
    ///
    /// Fails when adjacent layers do not line up, or when the activations are
    /// not ReLU on every hidden layer and softmax on the output layer.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(SnakeError::ArchitectureMismatch {
                expected: "at least one layer".to_string(),
                found: "none".to_string(),
            });
        }

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(SnakeError::ArchitectureMismatch {
                    expected: format!("layer {} input of {}", i + 1, pair[0].output_size()),
                    found: format!("{}", pair[1].input_size()),
                });
            }
        }

        let last = layers.len() - 1;
        for (i, layer) in layers.iter().enumerate() {
            let expected = if i == last {
                Activation::Softmax
            } else {
                Activation::Relu
            };
            if layer.activation() != expected {
                return Err(SnakeError::ArchitectureMismatch {
                    expected: format!("{:?} activation on layer {}", expected, i),
                    found: format!("{:?}", layer.activation()),
                });
            }
        }

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// `(output_size, input_size)` of every layer
    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.layers.iter().map(Layer::shape).collect()
    }

    /// Size sequence `[input, hidden.., output]`
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![self.input_size()];
        sizes.extend(self.layers.iter().map(Layer::output_size));
        sizes
    }

    /// Total number of weights and biases
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights().len() + l.biases().len())
            .sum()
    }

    /// Run the input through every layer in order
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.input_size() {
            return Err(SnakeError::InvalidInputSize {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        let mut activations = ArrayView1::from(input).to_owned();
        for layer in &self.layers {
            activations = layer.forward(activations.view());
        }
        Ok(activations.to_vec())
    }

    /// Index of the strongest output
    pub fn decide(&self, input: &[f32]) -> Result<usize> {
        Ok(argmax(&self.forward(input)?))
    }

    /// Perturb each parameter with probability `rate`
    ///
    /// Each selected scalar gets `N(0, std_dev)` noise added. A rate of zero
    /// leaves the genome bitwise unchanged.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, std_dev: f32, rng: &mut R) {
        if rate <= 0.0 {
            return;
        }

        for layer in &mut self.layers {
            for param in layer.parameters_mut() {
                if rng.gen::<f32>() < rate {
                    let z: f32 = StandardNormal.sample(rng);
                    *param += z * std_dev;
                }
            }
        }
    }

    /// Uniform crossover: each child scalar comes from either parent on a coin flip
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Network, rng: &mut R) -> Result<Network> {
        if self.shapes() != other.shapes() {
            return Err(SnakeError::ShapeMismatch {
                left: self.shapes(),
                right: other.shapes(),
            });
        }

        let mut child = self.clone();
        for (child_layer, other_layer) in child.layers.iter_mut().zip(&other.layers) {
            let donor = other_layer
                .weights()
                .iter()
                .chain(other_layer.biases().iter());
            for (param, theirs) in child_layer.parameters_mut().zip(donor) {
                if rng.gen_bool(0.5) {
                    *param = *theirs;
                }
            }
        }

        Ok(child)
    }
}

/// Index of the maximum value, lowest index on ties
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn identity_network() -> Network {
        let hidden = Layer::from_parts(
            2,
            2,
            vec![1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0],
            Activation::Relu,
        )
        .unwrap();
        let output = Layer::from_parts(
            2,
            2,
            vec![1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0],
            Activation::Softmax,
        )
        .unwrap();
        Network::from_layers(vec![hidden, output]).unwrap()
    }

    fn small_config() -> NetworkConfig {
        NetworkConfig {
            input_size: 6,
            hidden_sizes: vec![5, 4],
            output_size: 3,
            mutation_std_dev: 0.1,
        }
    }

    #[test]
    fn test_identity_forward() {
        let network = identity_network();
        let output = network.forward(&[1.0, -1.0]).unwrap();

        assert!((output[0] - 0.731_058_6).abs() < 1e-5);
        assert!((output[1] - 0.268_941_4).abs() < 1e-5);
        assert!((output.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(network.decide(&[1.0, -1.0]).unwrap(), 0);
    }

    #[test]
    fn test_invalid_input_size() {
        let network = identity_network();
        let err = network.forward(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            SnakeError::InvalidInputSize {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_default_architecture() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let network = NetworkConfig::default().init(&mut rng);

        assert_eq!(network.layer_sizes(), vec![HISTORY_FEATURES, 7, 3]);
        assert_eq!(network.layers()[0].activation(), Activation::Relu);
        assert_eq!(network.layers()[1].activation(), Activation::Softmax);

        let output = network.forward(&vec![0.5; HISTORY_FEATURES]).unwrap();
        assert_eq!(output.len(), 3);
        assert!(output.iter().all(|&p| p >= 0.0));
        assert!((output.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_argmax_ties_pick_lowest() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let parent = small_config().init(&mut rng);
        let mut child = parent.clone();

        child.mutate(1.0, 0.5, &mut rng);

        assert_ne!(child, parent);
        assert_eq!(parent.shapes(), child.shapes());
    }

    #[test]
    fn test_mutate_zero_rate_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let original = small_config().init(&mut rng);
        let mut mutated = original.clone();

        mutated.mutate(0.0, 0.1, &mut rng);

        for (a, b) in original.layers().iter().zip(mutated.layers()) {
            let bits_a: Vec<u32> = a.weights().iter().map(|w| w.to_bits()).collect();
            let bits_b: Vec<u32> = b.weights().iter().map(|w| w.to_bits()).collect();
            assert_eq!(bits_a, bits_b);

            let bias_bits_a: Vec<u32> = a.biases().iter().map(|b| b.to_bits()).collect();
            let bias_bits_b: Vec<u32> = b.biases().iter().map(|b| b.to_bits()).collect();
            assert_eq!(bias_bits_a, bias_bits_b);
        }
    }

    #[test]
    fn test_mutate_full_rate_touches_every_parameter() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let original = small_config().init(&mut rng);
        let mut mutated = original.clone();

        mutated.mutate(1.0, 0.1, &mut rng);

        let changed = original
            .layers()
            .iter()
            .zip(mutated.layers())
            .flat_map(|(a, b)| {
                a.weights()
                    .iter()
                    .chain(a.biases())
                    .zip(b.weights().iter().chain(b.biases()))
            })
            .filter(|(x, y)| x != y)
            .count();
        assert_eq!(changed, original.parameter_count());
    }

    #[test]
    fn test_self_crossover_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let parent = small_config().init(&mut rng);

        for _ in 0..5 {
            let child = parent.crossover(&parent, &mut rng).unwrap();
            assert_eq!(child, parent);
        }
    }

    #[test]
    fn test_crossover_takes_genes_from_both_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let a = small_config().init(&mut rng);
        let b = small_config().init(&mut rng);

        let child = a.crossover(&b, &mut rng).unwrap();

        let mut from_a = 0;
        let mut from_b = 0;
        for ((ca, la), lb) in child.layers().iter().zip(a.layers()).zip(b.layers()) {
            for ((c, x), y) in ca.weights().iter().zip(la.weights()).zip(lb.weights()) {
                assert!(c == x || c == y);
                if c == x {
                    from_a += 1;
                }
                if c == y {
                    from_b += 1;
                }
            }
        }
        assert!(from_a > 0);
        assert!(from_b > 0);
    }

    #[test]
    fn test_crossover_shape_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let a = small_config().init(&mut rng);
        let b = NetworkConfig::default().init(&mut rng);

        let err = a.crossover(&b, &mut rng).unwrap_err();
        assert!(matches!(err, SnakeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_layers_rejects_misaligned_stack() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let first = Layer::random(4, 3, Activation::Relu, &mut rng);
        let second = Layer::random(5, 2, Activation::Softmax, &mut rng);

        assert!(matches!(
            Network::from_layers(vec![first, second]),
            Err(SnakeError::ArchitectureMismatch { .. })
        ));
    }

    #[test]
    fn test_from_layers_enforces_activation_layout() {
        let identity = |activation| {
            Layer::from_parts(2, 2, vec![1.0, 0.0, 0.0, 1.0], vec![0.0, 0.0], activation).unwrap()
        };

        // Softmax hidden layer feeding a ReLU output
        assert!(matches!(
            Network::from_layers(vec![identity(Activation::Softmax), identity(Activation::Relu)]),
            Err(SnakeError::ArchitectureMismatch { .. })
        ));

        // A lone ReLU layer would map [2, -1] to [2, 0], which sums to 2
        assert!(matches!(
            Network::from_layers(vec![identity(Activation::Relu)]),
            Err(SnakeError::ArchitectureMismatch { .. })
        ));

        let single = Network::from_layers(vec![identity(Activation::Softmax)]).unwrap();
        let output = single.forward(&[2.0, -1.0]).unwrap();
        assert!((output.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_config_validation() {
        assert!(NetworkConfig::default().validate().is_ok());

        let mut config = NetworkConfig::default();
        config.hidden_sizes = vec![4, 0];
        assert!(config.validate().is_err());

        let mut config = NetworkConfig::default();
        config.mutation_std_dev = -1.0;
        assert!(config.validate().is_err());
    }
}
