mod birnn;
mod conv;
mod dense;

pub use self::birnn::*;
pub use self::conv::*;
pub use self::dense::*;
use ndarray::{Array2, ArrayView2};

/// Describes a layer of the speech network.
pub trait Layer {
    /// Gets the number of values per frame in the input
    fn num_in(&self) -> usize;
    /// Gets the number of values per frame in the output
    fn num_out(&self) -> usize;
    fn name(&self) -> &'static str;
}

pub trait WeightedLayer: Layer {
    fn num_weights(&self) -> usize;
}

/// Runs a layer on the host.
pub trait ComputeOnHost: Layer {
    fn compute(&self, input: ArrayView2<f32>) -> Array2<f32>;
}
