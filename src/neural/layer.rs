//! A single fully connected layer: `activation(W · x + b)`

use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Activation applied to a layer's affine output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Elementwise `max(0, x)`
    Relu,
    /// Normalized exponential over the whole vector
    Softmax,
}

impl Activation {
    pub fn apply(&self, values: &mut Array1<f32>) {
        match self {
            Activation::Relu => relu(values),
            Activation::Softmax => softmax(values),
        }
    }
}

/// Rectified linear unit, in place
pub fn relu(values: &mut Array1<f32>) {
    values.mapv_inplace(|v| v.max(0.0));
}

/// Softmax, in place
///
/// The maximum logit is subtracted before exponentiating so large logits do
/// not overflow.
pub fn softmax(values: &mut Array1<f32>) {
    if values.is_empty() {
        return;
    }

    let max = values.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    values.mapv_inplace(|v| (v - max).exp());
    let sum = values.sum();
    *values /= sum;
}

/// Weight matrix, bias vector and activation of one layer
///
/// Weights are an `output_size × input_size` matrix, so row `j` holds the
/// incoming weights of output neuron `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    weights: Array2<f32>,
    biases: Array1<f32>,
    activation: Activation,
}

impl Layer {
    /// He-initialized layer: Gaussian weights scaled by `sqrt(2 / input_size)`, zero biases
    pub fn random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let scale = (2.0 / input_size.max(1) as f32).sqrt();
        let weights = Array2::from_shape_simple_fn((output_size, input_size), || {
            let z: f32 = StandardNormal.sample(&mut *rng);
            z * scale
        });

        Self {
            weights,
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Build a layer from explicit parameters, weights given row-major
    ///
    /// Returns `None` when the matrix or bias lengths disagree with the
    /// declared sizes.
    pub fn from_parts(
        input_size: usize,
        output_size: usize,
        weights: Vec<f32>,
        biases: Vec<f32>,
        activation: Activation,
    ) -> Option<Self> {
        if biases.len() != output_size {
            return None;
        }
        let weights = Array2::from_shape_vec((output_size, input_size), weights).ok()?;

        Some(Self {
            weights,
            biases: Array1::from(biases),
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// `(output_size, input_size)`
    pub fn shape(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Mutable view over every weight (row-major) followed by every bias
    pub(crate) fn parameters_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.weights.iter_mut().chain(self.biases.iter_mut())
    }

    /// Forward pass; the caller guarantees `input.len() == input_size`
    pub fn forward(&self, input: ArrayView1<f32>) -> Array1<f32> {
        debug_assert_eq!(input.len(), self.input_size());

        let mut output = self.weights.dot(&input) + &self.biases;
        self.activation.apply(&mut output);
        output
    }
}
