#[cfg(test)]
mod test;
mod weights;

pub use self::weights::*;
use crate::convert::split_gate_blocks;
use crate::error::{Error, Result};
use crate::geometry::{ConvKernelShape, SpectrogramGeometry};
use crate::layers::*;
use crate::math::{clamp, verify};
use ndarray::{Array2, ArrayView2};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq)]
pub struct HyperParams {
    /// Rows of the input spectrogram; also the height of the convolution kernel
    pub freq_bins: usize,
    pub conv_kernel_w: usize,
    pub conv_stride: usize,
    pub conv_pad: usize,
    /// Number of convolution filters, and both input and hidden size of every
    /// recurrent layer
    pub hidden_size: usize,
    pub rnn_depth: usize,
    pub num_output_classes: usize,
    /// Upper bound of the clipped ReLU
    pub clamp_max: f32,
}

pub const DEFAULT_HYPER_PARAMS: HyperParams = HyperParams {
    freq_bins: 13,
    conv_kernel_w: 11,
    conv_stride: 3,
    conv_pad: 5,
    hidden_size: 1152,
    rnn_depth: 1,
    num_output_classes: 29,
    clamp_max: 20f32,
};

impl Default for HyperParams {
    fn default() -> HyperParams {
        DEFAULT_HYPER_PARAMS
    }
}

impl HyperParams {
    pub fn conv_shape(&self) -> ConvKernelShape {
        ConvKernelShape::new(self.hidden_size, 1, self.freq_bins, self.conv_kernel_w)
    }
    /// Number of exported values per bidirectional recurrent layer.
    pub fn birnn_num_weights(&self) -> usize {
        2 * (self.hidden_size + self.hidden_size + 1) * self.hidden_size
    }
}

/// Conv -> clamp -> recurrent stack -> dense -> clamp -> dense, evaluated on
/// the host.
pub struct SpeechNetwork {
    params: HyperParams,
    conv: ConvLayer,
    birnn: Vec<BiRnnLayer>,
    fc1: DenseLayer,
    fc2: DenseLayer,
}

impl SpeechNetwork {
    pub fn new(params: HyperParams, weights: Weights) -> Result<SpeechNetwork> {
        let Weights {
            conv,
            birnn,
            fc1,
            fc2,
        } = weights;
        let hidden = params.hidden_size;

        if birnn.len() != params.rnn_depth {
            return Err(Error::Dimension(format!(
                "expected {} recurrent layers, got weights for {}",
                params.rnn_depth,
                birnn.len()
            )));
        }
        let conv = ConvLayer::new(params.conv_shape(), params.conv_stride, params.conv_pad, conv)?;
        let birnn = birnn
            .iter()
            .map(|converted| {
                let tensors = split_gate_blocks(converted, hidden)?;
                BiRnnLayer::new(tensors, params.clamp_max)
            })
            .collect::<Result<Vec<_>>>()?;
        let fc1 = DenseLayer::new(hidden, hidden, fc1)?;
        let fc2 = DenseLayer::new(hidden, params.num_output_classes, fc2)?;

        {
            let mut layers = vec![&conv as &dyn Layer];
            layers.extend(birnn.iter().map(|l| l as &dyn Layer));
            layers.push(&fc1);
            layers.push(&fc2);
            verify_network_dimensions(&layers)?;
        }
        info!(
            "Created network with {} recurrent layer(s), {} weights in total",
            birnn.len(),
            conv.num_weights()
                + birnn.iter().map(|l| l.num_weights()).sum::<usize>()
                + fc1.num_weights()
                + fc2.num_weights()
        );

        Ok(SpeechNetwork {
            params,
            conv,
            birnn,
            fc1,
            fc2,
        })
    }

    pub fn params(&self) -> &HyperParams {
        &self.params
    }

    /// Runs a forward pass over a flat (freq_bins, frames) spectrogram and
    /// returns (output frames, classes) flattened row-major.
    pub fn predict(&self, input: &[f32]) -> Result<Vec<f32>> {
        let geometry = SpectrogramGeometry::from_len(self.params.freq_bins, input.len())
            .ok_or_else(|| {
                Error::Dimension(format!(
                    "{} input values do not form whole frames of {} bins",
                    input.len(),
                    self.params.freq_bins
                ))
            })?;
        if self.conv.output_frames(geometry.frames()) == 0 {
            return Err(Error::Dimension(format!(
                "{} frames are too few for a kernel of width {}",
                geometry.frames(),
                self.params.conv_kernel_w
            )));
        }
        let input = ArrayView2::from_shape((geometry.freq_bins(), geometry.frames()), input)
            .map_err(|e| Error::Dimension(e.to_string()))?;

        let start_time = Instant::now();

        let mut fm = self.conv.compute(input);
        clamp(&mut fm, 0f32, self.params.clamp_max);
        // (channels, frames) -> (frames, channels)
        let mut seq: Array2<f32> = fm.t().to_owned();
        trace!("conv output: {:?}", seq.dim());

        for layer in &self.birnn {
            seq = layer.compute(seq.view());
        }

        let mut hidden = self.fc1.compute(seq.view());
        clamp(&mut hidden, 0f32, self.params.clamp_max);
        let output = self.fc2.compute(hidden.view());

        debug!(
            "Forward pass over {} frames took {:?}",
            geometry.frames(),
            start_time.elapsed()
        );
        Ok(output.iter().cloned().collect())
    }
}

/// Checks that the output of every layer fits the input of the next.
pub fn verify_network_dimensions(layers: &[&dyn Layer]) -> Result<()> {
    for pair in layers.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.num_out() != next.num_in() {
            return Err(Error::Dimension(format!(
                "{} outputs {} values per frame, but {} takes {}",
                prev.name(),
                prev.num_out(),
                next.name(),
                next.num_in()
            )));
        }
    }
    Ok(())
}

/// Runs `network` on `input` and compares the result to `reference`. Returns
/// the total absolute difference.
pub fn evaluate(network: &SpeechNetwork, input: &[f32], reference: &[f32]) -> Result<f32> {
    let output = network.predict(input)?;
    let total_diff = verify(&output, reference)?;
    info!(
        "Output matches reference over {} values, total absolute difference: {}",
        output.len(),
        total_diff
    );
    Ok(total_diff)
}
