//! # dd-rs
//!
//! Numerical building blocks for data-driven modelling demonstrations:
//!
//! - [`linalg`]: thin SVD, rank-truncated reconstruction, SVD least squares
//!   and the image helpers used by SVD compression.
//! - [`signal`]: full-spectrum FFT, power spectral density, threshold
//!   denoising, spectral differentiation and Fourier series.
//! - [`stats`]: empirical quantiles, the truncation heuristic and simple
//!   linear regression.
//!
//! Every operation is a pure function of its inputs. Configuration is
//! validated up front through [`kernel::KernelLifecycle`]; runtime failures
//! are reported through [`Error`].

#![warn(missing_docs)]

/// Re-export of `nalgebra`, the matrix type used across [`linalg`].
pub use nalgebra as na;
/// Complex sample type used by [`signal`].
pub use rustfft::num_complex::Complex;

mod error;
pub use error::*;

pub mod kernel;

/// Dense linear algebra built on the thin SVD.
pub mod linalg;

/// Spectral transforms over uniformly sampled signals.
pub mod signal;

/// Small statistics helpers used to pick truncation points and fit lines.
pub mod stats;
