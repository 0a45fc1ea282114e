use super::HyperParams;
use crate::convert::{to_channel_major, to_gate_block_layout, to_group_major};
use crate::error::Result;
use crate::util::read_f32_lines_checked;
use std::path::Path;

pub const CONV_WEIGHTS_FILE: &str = "conv.txt";
pub const FC1_WEIGHTS_FILE: &str = "fc1.txt";
pub const FC2_WEIGHTS_FILE: &str = "fc2.txt";

/// Name of the weight file of the `idx`th recurrent layer.
pub fn birnn_weights_file(idx: usize) -> String {
    format!("birnn{}.txt", idx)
}

/// Parameters of every layer, already converted into the layout of the
/// layer they are injected into.
#[derive(Clone, Debug)]
pub struct Weights {
    pub conv: Vec<f32>,
    pub birnn: Vec<Vec<f32>>,
    pub fc1: Vec<f32>,
    pub fc2: Vec<f32>,
}

impl Weights {
    /// Loads the exported weight files from `dir` and converts them.
    pub fn load<P: AsRef<Path>>(dir: P, params: &HyperParams) -> Result<Weights> {
        let dir = dir.as_ref();
        let hidden = params.hidden_size;
        info!("Loading weights from {}", dir.display());

        // The exporter stores the kernel with the output channel varying fastest
        let conv = to_channel_major(
            &read_f32_lines_checked(dir.join(CONV_WEIGHTS_FILE), params.conv_shape().num_elems())?,
            hidden,
        )?;

        let birnn = (0..params.rnn_depth)
            .map(|idx| -> Result<Vec<f32>> {
                let path = dir.join(birnn_weights_file(idx));
                let exported = read_f32_lines_checked(&path, params.birnn_num_weights())?;
                debug!("Converting recurrent layer {} from {}", idx, path.display());
                Ok(to_gate_block_layout(&exported, hidden)?)
            })
            .collect::<Result<Vec<_>>>()?;

        let fc1 = to_group_major(
            &read_f32_lines_checked(dir.join(FC1_WEIGHTS_FILE), hidden * hidden)?,
            hidden,
        )?;
        let fc2 = to_group_major(
            &read_f32_lines_checked(
                dir.join(FC2_WEIGHTS_FILE),
                hidden * params.num_output_classes,
            )?,
            hidden,
        )?;

        Ok(Weights {
            conv,
            birnn,
            fc1,
            fc2,
        })
    }
}
