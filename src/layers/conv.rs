use super::*;
use crate::error::{Error, Result};
use crate::geometry::{conv_output_frames, ConvKernelShape};
use ndarray::s;

/// A 2-D convolution over a spectrogram that covers every frequency bin at
/// once, so the output has a height of one and slides along time only.
pub struct ConvLayer {
    shape: ConvKernelShape,
    stride: usize,
    pad: usize,
    /// (out_channels, in_channels * kernel_h * kernel_w)
    weights: Array2<f32>,
}

impl ConvLayer {
    /// Creates a convolutional layer from channel-major `weights`. The bias is
    /// zero.
    pub fn new(
        shape: ConvKernelShape,
        stride: usize,
        pad: usize,
        weights: Vec<f32>,
    ) -> Result<ConvLayer> {
        debug!(
            "Create conv-layer with kernel-shape: {:?}, stride: {}, padding: {}.",
            shape.as_tuple(),
            stride,
            pad
        );
        trace!(
            "\t↳ filter-size: {0}, weights-size: {0}x{1} = {2}.",
            shape.filter_elems(),
            shape.out_channels(),
            shape.num_elems()
        );
        if shape.in_channels() != 1 {
            return Err(Error::Dimension(format!(
                "convolution over a spectrogram takes one input plane, got {}",
                shape.in_channels()
            )));
        }
        if stride == 0 {
            return Err(Error::Dimension("convolution stride must be positive".into()));
        }
        if weights.len() != shape.num_elems() {
            return Err(Error::LengthMismatch {
                what: "convolution weights".into(),
                expected: shape.num_elems(),
                actual: weights.len(),
            });
        }
        let weights = Array2::from_shape_vec((shape.out_channels(), shape.filter_elems()), weights)
            .map_err(|e| Error::Dimension(e.to_string()))?;
        Ok(ConvLayer {
            shape,
            stride,
            pad,
            weights,
        })
    }
    pub fn shape(&self) -> &ConvKernelShape {
        &self.shape
    }
    pub fn weights(&self) -> ArrayView2<f32> {
        self.weights.view()
    }
    pub fn output_frames(&self, frames: usize) -> usize {
        conv_output_frames(frames, self.shape.kernel_w(), self.stride, self.pad)
    }
}

impl Layer for ConvLayer {
    fn num_in(&self) -> usize {
        self.shape.kernel_h()
    }
    fn num_out(&self) -> usize {
        self.shape.out_channels()
    }
    fn name(&self) -> &'static str {
        "conv"
    }
}

impl WeightedLayer for ConvLayer {
    fn num_weights(&self) -> usize {
        self.weights.len()
    }
}

impl ComputeOnHost for ConvLayer {
    /// Maps (freq_bins, frames) to (out_channels, output frames).
    fn compute(&self, input: ArrayView2<f32>) -> Array2<f32> {
        let (bins, frames) = input.dim();
        let kernel_w = self.shape.kernel_w();
        debug_assert_eq!(bins, self.shape.kernel_h());

        let mut padded = Array2::<f32>::zeros((bins, frames + 2 * self.pad));
        padded
            .slice_mut(s![.., self.pad..self.pad + frames])
            .assign(&input);

        // Unroll every receptive field into a column, in (kernel_h, kernel_w)-order
        let out_frames = self.output_frames(frames);
        let mut columns = Array2::<f32>::zeros((bins * kernel_w, out_frames));
        for t in 0..out_frames {
            let start = t * self.stride;
            let window = padded.slice(s![.., start..start + kernel_w]);
            for (dst, &src) in columns.column_mut(t).iter_mut().zip(window.iter()) {
                *dst = src;
            }
        }
        self.weights.dot(&columns)
    }
}
