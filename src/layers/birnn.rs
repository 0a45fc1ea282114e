use super::*;
use crate::convert::{DirectionTensors, GateTensors};
use crate::error::{Error, Result};
use crate::math::{add_assign, clamp, mtx_mul};
use ndarray::Axis;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// A bidirectional vanilla recurrent layer. Each direction computes
/// `h_t = clamp(U x_t + W h_prev + b, 0, clamp_max)` and the two directions
/// are summed per frame.
pub struct BiRnnLayer {
    n_in: usize,
    n_out: usize,
    clamp_max: f32,
    forward: DirectionTensors<f32>,
    backward: DirectionTensors<f32>,
}

impl BiRnnLayer {
    /// Creates the layer from the six tensors of a gate-block layout. `U` is
    /// read as a row-major (n_out, n_in) matrix and `W` as (n_out, n_out).
    pub fn new(tensors: GateTensors<f32>, clamp_max: f32) -> Result<BiRnnLayer> {
        let GateTensors {
            n_in,
            n_out,
            forward,
            backward,
        } = tensors;
        debug!(
            "Create birnn-layer with input-size: {}, hidden-size: {}.",
            n_in, n_out
        );
        for (dir, t) in &[("forward", &forward), ("backward", &backward)] {
            if t.u.len() != n_in * n_out || t.w.len() != n_out * n_out || t.bias.len() != n_out {
                return Err(Error::Dimension(format!(
                    "{} recurrent tensors have sizes U: {}, W: {}, bias: {} for n_in = {}, n_out = {}",
                    dir,
                    t.u.len(),
                    t.w.len(),
                    t.bias.len(),
                    n_in,
                    n_out
                )));
            }
        }
        Ok(BiRnnLayer {
            n_in,
            n_out,
            clamp_max,
            forward,
            backward,
        })
    }

    fn run_direction(&self, input: ArrayView2<f32>, direction: Direction) -> Array2<f32> {
        let params = match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        let frames = input.nrows();
        let mut output = Array2::<f32>::zeros((frames, self.n_out));
        let mut hidden = vec![0f32; self.n_out];

        let order: Box<dyn Iterator<Item = usize>> = match direction {
            Direction::Forward => Box::new(0..frames),
            Direction::Backward => Box::new((0..frames).rev()),
        };
        for t in order {
            let x_t = input.index_axis(Axis(0), t).to_vec();
            let mut h = mtx_mul(&params.u, &x_t, self.n_out, self.n_in, 1);
            add_assign(&mut h, &mtx_mul(&params.w, &hidden, self.n_out, self.n_out, 1));
            add_assign(&mut h, &params.bias);
            clamp(&mut h, 0f32, self.clamp_max);

            for (dst, &src) in output.row_mut(t).iter_mut().zip(&h) {
                *dst = src;
            }
            hidden = h;
        }
        output
    }
}

impl Layer for BiRnnLayer {
    fn num_in(&self) -> usize {
        self.n_in
    }
    fn num_out(&self) -> usize {
        self.n_out
    }
    fn name(&self) -> &'static str {
        "birnn"
    }
}

impl WeightedLayer for BiRnnLayer {
    fn num_weights(&self) -> usize {
        [&self.forward, &self.backward]
            .iter()
            .map(|t| t.u.len() + t.w.len() + t.bias.len())
            .sum()
    }
}

impl ComputeOnHost for BiRnnLayer {
    /// Maps (frames, n_in) to (frames, n_out).
    fn compute(&self, input: ArrayView2<f32>) -> Array2<f32> {
        let mut output = self.run_direction(input.view(), Direction::Forward);
        output += &self.run_direction(input, Direction::Backward);
        output
    }
}
