use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer: `a = f(x · W + b)`.
///
/// `weights` is `input_size × size`; `biases` holds `size` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vec<f32>,
    pub activation: ActivationFunction,
}

impl Layer {
    /// Fresh layer with zero biases and weights drawn for `activation`
    /// (He for the ReLU family, Xavier otherwise).
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        let weights = match activation {
            ActivationFunction::ReLU | ActivationFunction::LeakyReLU { .. } => {
                Matrix::he(input_size, size)
            }
            _ => Matrix::xavier(input_size, size),
        };
        Layer { weights, biases: vec![0.0; size], activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Checks that weights and biases agree with each other.
    pub fn validate(&self) -> Result<(), String> {
        if !self.weights.is_consistent() {
            return Err(format!(
                "weights declare {}x{} but hold {} values",
                self.weights.rows, self.weights.cols, self.weights.data.len()
            ));
        }
        if self.biases.len() != self.size() {
            return Err(format!(
                "{} biases for {} outputs", self.biases.len(), self.size()
            ));
        }
        Ok(())
    }

    pub fn feed_from(&self, input: &[f32], threads: usize) -> Vec<f32> {
        let mut z = self.weights.vec_mul(input, threads);
        for (v, b) in z.iter_mut().zip(&self.biases) {
            *v += b;
        }
        self.activation.apply(&mut z);
        z
    }
}
