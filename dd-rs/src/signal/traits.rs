//! Trait interfaces for spectral capabilities.
//!
//! Every 1D kernel exposes a `*_into` entry point writing into a caller
//! buffer and a `*_alloc` entry point returning a fresh allocation.

use super::{DenoiseResult, FourierSeries};
use crate::kernel::{Read1D, Write1D};
use crate::{Complex, Result};

/// Full-spectrum discrete Fourier transform capability.
pub trait SpectralTransform1D {
    /// Unnormalized forward transform into a caller-provided buffer.
    fn forward_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<Complex<f64>> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized;

    /// Unnormalized forward transform and allocate output.
    fn forward_alloc<I>(&self, input: &I) -> Result<Vec<Complex<f64>>>
    where
        I: Read1D<Complex<f64>> + ?Sized;

    /// Unnormalized inverse transform into a caller-provided buffer.
    fn inverse_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<Complex<f64>> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized;

    /// Unnormalized inverse transform and allocate output.
    fn inverse_alloc<I>(&self, input: &I) -> Result<Vec<Complex<f64>>>
    where
        I: Read1D<Complex<f64>> + ?Sized;
}

/// PSD-threshold denoising capability.
pub trait Denoise1D {
    /// Write the filtered signal into a caller-provided buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized;

    /// Filter and return the intermediate spectra alongside the signal.
    fn run_alloc<I>(&self, input: &I) -> Result<DenoiseResult>
    where
        I: Read1D<f64> + ?Sized;
}

/// Derivative of periodic samples.
pub trait Differentiate1D<T> {
    /// Differentiate into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Differentiate and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>>
    where
        I: Read1D<T> + ?Sized;
}

/// Fourier series fit over one sampled period.
pub trait FourierSeriesFit1D {
    /// Fit coefficients to samples `f` taken at the uniformly spaced points `x`.
    fn run_alloc<I1, I2>(&self, x: &I1, f: &I2) -> Result<FourierSeries>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized;
}
