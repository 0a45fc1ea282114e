use super::*;
use crate::error::{Error, Result};

/// A fully-connected layer applied to every frame independently. There is no
/// bias.
pub struct DenseLayer {
    /// (num_out, num_in)
    weights: Array2<f32>,
}

impl DenseLayer {
    pub fn new(input_dim: usize, output_dim: usize, weights: Vec<f32>) -> Result<DenseLayer> {
        debug!(
            "Create dense-layer with input-size: {}, output-size: {}.",
            input_dim, output_dim
        );
        trace!(
            "\t↳ input: {0}, output: {1}, weights-size: {0}x{1} = {2}.",
            input_dim,
            output_dim,
            input_dim * output_dim
        );
        if weights.len() != input_dim * output_dim {
            return Err(Error::LengthMismatch {
                what: "dense weights".into(),
                expected: input_dim * output_dim,
                actual: weights.len(),
            });
        }
        let weights = Array2::from_shape_vec((output_dim, input_dim), weights)
            .map_err(|e| Error::Dimension(e.to_string()))?;
        Ok(DenseLayer { weights })
    }
    pub fn weights(&self) -> ArrayView2<f32> {
        self.weights.view()
    }
}

impl Layer for DenseLayer {
    fn num_in(&self) -> usize {
        self.weights.ncols()
    }
    fn num_out(&self) -> usize {
        self.weights.nrows()
    }
    fn name(&self) -> &'static str {
        "dense"
    }
}

impl WeightedLayer for DenseLayer {
    fn num_weights(&self) -> usize {
        self.weights.len()
    }
}

impl ComputeOnHost for DenseLayer {
    /// Maps (frames, num_in) to (frames, num_out).
    fn compute(&self, input: ArrayView2<f32>) -> Array2<f32> {
        input.dot(&self.weights.t())
    }
}
