//! Re-ordering of weights exported by the external training pipeline into the
//! parameter layout of the inference layers.
//!
//! Every exported array is a sequence of equal-width row-groups. The
//! converters only move values around: each output value is a copy of exactly
//! one input value and the output is as long as the input.
#[cfg(test)]
mod test;

use crate::error::ConvertError;
use itertools::iproduct;
use std::ops::Range;
use std::slice::ChunksExact;

/// A partition of a flat array into contiguous row-groups of `width` values.
#[derive(Debug)]
pub struct RowGroups<'a, T> {
    data: &'a [T],
    width: usize,
}

impl<'a, T> RowGroups<'a, T> {
    pub fn new(data: &'a [T], width: usize) -> Result<RowGroups<'a, T>, ConvertError> {
        if width == 0 {
            return Err(ConvertError::ZeroWidth);
        }
        if data.len() % width != 0 {
            return Err(ConvertError::NotDivisible {
                len: data.len(),
                width,
            });
        }
        Ok(RowGroups { data, width })
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn num_groups(&self) -> usize {
        self.data.len() / self.width
    }
    /// Returns the `idx`th group. Panics if `idx >= self.num_groups()`.
    pub fn group(&self, idx: usize) -> &'a [T] {
        self.span(idx..idx + 1)
    }
    /// Returns the consecutive groups in `groups` as one flat slice.
    pub fn span(&self, groups: Range<usize>) -> &'a [T] {
        &self.data[groups.start * self.width..groups.end * self.width]
    }
    pub fn iter(&self) -> ChunksExact<'a, T> {
        self.data.chunks_exact(self.width)
    }
}

/// Transposes a `num_groups x channel_size` matrix: all values of channel 0
/// come first (in group order), then all values of channel 1 and so on.
///
/// Used for convolution kernels, which the exporter stores with the output
/// channel varying fastest.
pub fn to_channel_major<T: Copy>(origin: &[T], channel_size: usize) -> Result<Vec<T>, ConvertError> {
    let groups = RowGroups::new(origin, channel_size)?;
    Ok(iproduct!(0..channel_size, 0..groups.num_groups())
        .map(|(c, g)| groups.group(g)[c])
        .collect())
}

/// Re-flattens the groups in group order, which leaves the values where they
/// were. Used for linear layers; fails on the same malformed inputs as
/// [`to_channel_major`].
pub fn to_group_major<T: Copy>(origin: &[T], channel_size: usize) -> Result<Vec<T>, ConvertError> {
    let groups = RowGroups::new(origin, channel_size)?;
    Ok(iproduct!(0..groups.num_groups(), 0..channel_size)
        .map(|(g, c)| groups.group(g)[c])
        .collect())
}

/// Re-orders the parameters of one bidirectional recurrent layer with
/// `n_in == n_out` from the exporter's interleaved order into
/// forward (U, W, bias) followed by backward (U, W, bias).
pub fn to_gate_block_layout<T: Copy>(origin: &[T], n_out: usize) -> Result<Vec<T>, ConvertError> {
    GateBlocks::new(n_out, n_out)?.reorder(origin)
}

/// Slices an array already in gate-block layout into the six per-direction
/// tensors of the recurrent layer.
pub fn split_gate_blocks<T: Copy>(
    converted: &[T],
    n_out: usize,
) -> Result<GateTensors<T>, ConvertError> {
    GateBlocks::new(n_out, n_out)?.split(converted)
}

/// One of the six parameter tensors of a bidirectional recurrent layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateBlock {
    ForwardU,
    ForwardW,
    ForwardBias,
    BackwardU,
    BackwardW,
    BackwardBias,
}

impl GateBlock {
    /// The blocks in the order of the converted layout.
    pub const OUTPUT_ORDER: [GateBlock; 6] = [
        GateBlock::ForwardU,
        GateBlock::ForwardW,
        GateBlock::ForwardBias,
        GateBlock::BackwardU,
        GateBlock::BackwardW,
        GateBlock::BackwardBias,
    ];
}

/// Describes the row-group layout of an exported bidirectional recurrent
/// layer. Every row-group is `n_out` wide; the exporter stores
///
/// ```text
/// [ U fwd (n_in) | U bwd (n_in) | W fwd (n_out) | W bwd (n_out) | b fwd (1) | b bwd (1) ]
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GateBlocks {
    n_in: usize,
    n_out: usize,
}

impl GateBlocks {
    /// The exported layout is only known for square recurrent layers, so
    /// `n_in != n_out` is rejected rather than guessed at.
    pub fn new(n_in: usize, n_out: usize) -> Result<GateBlocks, ConvertError> {
        if n_in != n_out {
            return Err(ConvertError::MismatchedGateSizes { n_in, n_out });
        }
        if n_out == 0 {
            return Err(ConvertError::ZeroWidth);
        }
        Ok(GateBlocks { n_in, n_out })
    }
    pub fn n_in(&self) -> usize {
        self.n_in
    }
    pub fn n_out(&self) -> usize {
        self.n_out
    }
    pub fn num_groups(&self) -> usize {
        2 * (self.n_in + self.n_out + 1)
    }
    pub fn num_weights(&self) -> usize {
        self.num_groups() * self.n_out
    }
    /// The range of exported row-groups that holds `block`.
    pub fn source_range(&self, block: GateBlock) -> Range<usize> {
        let (n_in, n_out, last) = (self.n_in, self.n_out, self.num_groups());
        match block {
            GateBlock::ForwardU => 0..n_in,
            GateBlock::BackwardU => n_in..2 * n_in,
            GateBlock::ForwardW => 2 * n_in..2 * n_in + n_out,
            GateBlock::BackwardW => 2 * n_in + n_out..2 * n_in + 2 * n_out,
            GateBlock::ForwardBias => last - 2..last - 1,
            GateBlock::BackwardBias => last - 1..last,
        }
    }
    /// Number of values in `block`.
    pub fn block_len(&self, block: GateBlock) -> usize {
        let groups = self.source_range(block);
        (groups.end - groups.start) * self.n_out
    }
    pub fn reorder<T: Copy>(&self, origin: &[T]) -> Result<Vec<T>, ConvertError> {
        let groups = RowGroups::new(origin, self.n_out)?;
        self.check_group_count(groups.num_groups())?;
        Ok(GateBlock::OUTPUT_ORDER
            .iter()
            .flat_map(|&block| groups.span(self.source_range(block)))
            .cloned()
            .collect())
    }
    pub fn split<T: Copy>(&self, converted: &[T]) -> Result<GateTensors<T>, ConvertError> {
        let groups = RowGroups::new(converted, self.n_out)?;
        self.check_group_count(groups.num_groups())?;

        let mut rest = converted;
        let mut take = |block: GateBlock| {
            let (head, tail) = rest.split_at(self.block_len(block));
            rest = tail;
            head.to_vec()
        };
        let forward = DirectionTensors {
            u: take(GateBlock::ForwardU),
            w: take(GateBlock::ForwardW),
            bias: take(GateBlock::ForwardBias),
        };
        let backward = DirectionTensors {
            u: take(GateBlock::BackwardU),
            w: take(GateBlock::BackwardW),
            bias: take(GateBlock::BackwardBias),
        };
        Ok(GateTensors {
            n_in: self.n_in,
            n_out: self.n_out,
            forward,
            backward,
        })
    }
    fn check_group_count(&self, actual: usize) -> Result<(), ConvertError> {
        if actual != self.num_groups() {
            return Err(ConvertError::GroupCountMismatch {
                width: self.n_out,
                expected: self.num_groups(),
                actual,
            });
        }
        Ok(())
    }
}

/// The input weight `u` (`n_in * n_out`), recurrent weight `w`
/// (`n_out * n_out`) and `bias` (`n_out`) of one direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionTensors<T> {
    pub u: Vec<T>,
    pub w: Vec<T>,
    pub bias: Vec<T>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateTensors<T> {
    pub n_in: usize,
    pub n_out: usize,
    pub forward: DirectionTensors<T>,
    pub backward: DirectionTensors<T>,
}
