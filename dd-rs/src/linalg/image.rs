//! Grayscale image helpers for SVD compression.
//!
//! Images enter as row-major 8-bit pixels and leave the same way; everything
//! in between is plain `f64` matrix arithmetic.

use crate::kernel::ConfigError;
use crate::Result;
use nalgebra::{DMatrix, DVector};

/// Build a `rows x cols` matrix from row-major 8-bit grayscale pixels.
pub fn matrix_from_gray(rows: usize, cols: usize, pixels: &[u8]) -> Result<DMatrix<f64>> {
    let expected = rows * cols;
    if pixels.len() != expected {
        return Err(ConfigError::LengthMismatch {
            arg: "pixels",
            expected,
            got: pixels.len(),
        }
        .into());
    }
    Ok(DMatrix::from_row_iterator(
        rows,
        cols,
        pixels.iter().map(|&p| f64::from(p)),
    ))
}

/// Quantize a reconstruction back to row-major 8-bit pixels.
///
/// Values are clamped to `[0, 255]` and truncated towards zero; `NaN` maps
/// to `0`.
pub fn quantize_gray(matrix: &DMatrix<f64>) -> Vec<u8> {
    let mut out = Vec::with_capacity(matrix.len());
    for row in matrix.row_iter() {
        out.extend(row.iter().map(|&v| quantize_pixel(v)));
    }
    out
}

fn quantize_pixel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    num_traits::clamp(v, 0.0, 255.0) as u8
}

/// Cumulative sum of singular values normalized by the total.
///
/// The last entry is `1` unless every value is zero, in which case the raw
/// (all-zero) cumulative sum is returned.
pub fn cumulative_energy(singular_values: &DVector<f64>) -> Vec<f64> {
    let mut running = 0.0;
    let mut sums: Vec<f64> = singular_values
        .iter()
        .map(|s| {
            running += s;
            running
        })
        .collect();
    if running > 0.0 {
        for v in &mut sums {
            *v /= running;
        }
    }
    sums
}
