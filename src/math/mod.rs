
use crate::error::ValidationError;
use num_traits::{Float, NumAssign, Zero};

/// Absolute tolerance used when the reference value is exactly zero.
pub const ABSOLUTE_MARGIN: f32 = 1e-2;
/// Relative tolerance used for every other reference value.
pub const RELATIVE_MARGIN: f32 = 1e-1;

/// Limits every value into [min, max], e.g. `clamp(&mut feature_map, 0., 20.)`
/// for a clipped ReLU.
pub fn clamp<'a, T, I>(values: I, min: T, max: T)
where
    T: Float + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    for x in values {
        *x = x.max(min).min(max);
    }
}

/// Multiplies the row-major `m_dim x n_dim` matrix `a` with the row-major
/// `n_dim x k_dim` matrix `b`.
pub fn mtx_mul<T>(a: &[T], b: &[T], m_dim: usize, n_dim: usize, k_dim: usize) -> Vec<T>
where
    T: NumAssign + Zero + Copy,
{
    debug_assert_eq!(a.len(), m_dim * n_dim);
    debug_assert_eq!(b.len(), n_dim * k_dim);
    let mut c_mul = vec![Zero::zero(); m_dim * k_dim];
    for i in 0..m_dim {
        for z in 0..n_dim {
            let a_iz = a[i * n_dim + z];
            for j in 0..k_dim {
                c_mul[i * k_dim + j] += a_iz * b[z * k_dim + j];
            }
        }
    }
    c_mul
}

pub fn add_assign<T>(dst: &mut [T], src: &[T])
where
    T: NumAssign + Copy,
{
    debug_assert_eq!(dst.len(), src.len());
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s;
    }
}

/// Returns true if `observed` is close enough to `expected`: within
/// [`ABSOLUTE_MARGIN`] if `expected` is zero, otherwise within
/// [`RELATIVE_MARGIN`] of `expected`.
pub fn is_within_tolerance(observed: f32, expected: f32) -> bool {
    let diff = (observed - expected).abs();
    if expected == 0f32 {
        diff <= ABSOLUTE_MARGIN
    } else {
        diff / expected.abs() <= RELATIVE_MARGIN
    }
}

/// Compares `output` to `reference` element by element and returns the total
/// absolute difference. Stops at the first element out of tolerance.
pub fn verify(output: &[f32], reference: &[f32]) -> Result<f32, ValidationError> {
    if output.len() != reference.len() {
        return Err(ValidationError::LengthMismatch {
            expected: reference.len(),
            actual: output.len(),
        });
    }
    let mut total_diff = 0f32;
    for (index, (&observed, &expected)) in output.iter().zip(reference).enumerate() {
        if !is_within_tolerance(observed, expected) {
            return Err(ValidationError::OutOfTolerance {
                index,
                observed,
                expected,
            });
        }
        total_diff += (observed - expected).abs();
    }
    Ok(total_diff)
}
