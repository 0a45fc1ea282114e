use std::io;
use std::path::PathBuf;

/// Precondition violations of the weight layout converters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("row-group width must be positive")]
    ZeroWidth,
    #[error("cannot partition {len} values into row-groups of width {width}")]
    NotDivisible { len: usize, width: usize },
    #[error("recurrent gate layout requires n_in == n_out, got n_in = {n_in}, n_out = {n_out}")]
    MismatchedGateSizes { n_in: usize, n_out: usize },
    #[error("expected {expected} row-groups of width {width}, got {actual}")]
    GroupCountMismatch {
        width: usize,
        expected: usize,
        actual: usize,
    },
}

/// A forward-pass output that disagrees with its reference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("output has {actual} values, reference has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("output[{index}] = {observed} is not within tolerance of reference {expected}")]
    OutOfTolerance {
        index: usize,
        observed: f32,
        expected: f32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("\"{}\":{line}: cannot parse \"{token}\" as a float", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },
    #[error("expected {expected} values in {what}, but {actual} were read")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },
    #[error("dimension mismatch: {0}")]
    Dimension(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;
