#[cfg(test)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod convert;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod math;
pub mod network;
pub mod util;

pub use crate::convert::{to_channel_major, to_gate_block_layout, to_group_major};
pub use crate::error::{ConvertError, Error, Result, ValidationError};
pub use crate::network::{evaluate, HyperParams, SpeechNetwork, Weights, DEFAULT_HYPER_PARAMS};
