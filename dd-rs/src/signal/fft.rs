//! Full-spectrum FFT and the frequency-axis helpers built on it.

use super::traits::SpectralTransform1D;
use crate::kernel::{read_signal, write_exact, ConfigError, KernelLifecycle, Read1D, Write1D};
use crate::{Complex, Error, Result};
use core::f64::consts::PI;
use core::fmt;
use nalgebra::DMatrix;
use num_traits::Zero;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub use dd_rs_core::num_rs::{fftshift, ifftshift};

/// Constructor config for [`SpectralTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralConfig {
    /// Transform length; at least 2.
    pub len: usize,
}

/// Planned forward/inverse FFT pair of a fixed length.
///
/// Neither direction normalizes, so `inverse(forward(x)) == n * x`.
#[derive(Clone)]
pub struct SpectralTransform {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl SpectralTransform {
    /// Planned transform length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the planned length is zero; never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bind<'a, I>(&self, input: &'a I) -> Result<&'a [Complex<f64>]>
    where
        I: Read1D<Complex<f64>> + ?Sized,
    {
        let input = read_signal("input", input)?;
        if input.len() != self.len {
            return Err(Error::InvalidSignalLength {
                arg: "input",
                reason: "signal length must match the planned transform length",
                got: input.len(),
            });
        }
        Ok(input)
    }
}

impl KernelLifecycle for SpectralTransform {
    type Config = SpectralConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if config.len < dd_rs_core::num_rs::MIN_LEN {
            return Err(ConfigError::InvalidArgument {
                arg: "len",
                reason: "transform length must be at least 2",
            });
        }
        let mut planner = FftPlanner::<f64>::new();
        Ok(Self {
            len: config.len,
            forward: planner.plan_fft_forward(config.len),
            inverse: planner.plan_fft_inverse(config.len),
        })
    }
}

impl SpectralTransform1D for SpectralTransform {
    fn forward_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<Complex<f64>> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized,
    {
        let input = self.bind(input)?;
        let out = write_exact("out", out, self.len)?;
        out.copy_from_slice(input);
        self.forward.process(out);
        Ok(())
    }

    fn forward_alloc<I>(&self, input: &I) -> Result<Vec<Complex<f64>>>
    where
        I: Read1D<Complex<f64>> + ?Sized,
    {
        let mut buf = self.bind(input)?.to_vec();
        self.forward.process(&mut buf);
        Ok(buf)
    }

    fn inverse_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<Complex<f64>> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized,
    {
        let input = self.bind(input)?;
        let out = write_exact("out", out, self.len)?;
        out.copy_from_slice(input);
        self.inverse.process(out);
        Ok(())
    }

    fn inverse_alloc<I>(&self, input: &I) -> Result<Vec<Complex<f64>>>
    where
        I: Read1D<Complex<f64>> + ?Sized,
    {
        let mut buf = self.bind(input)?.to_vec();
        self.inverse.process(&mut buf);
        Ok(buf)
    }
}

fn plan(len: usize) -> Result<SpectralTransform> {
    if len < dd_rs_core::num_rs::MIN_LEN {
        return Err(Error::InvalidSignalLength {
            arg: "signal",
            reason: "signal length must be at least 2",
            got: len,
        });
    }
    Ok(SpectralTransform::try_new(SpectralConfig { len })?)
}

/// Unnormalized forward DFT, `X[k] = Σ x[n]·exp(-2πi·k·n/N)`.
pub fn forward(signal: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
    plan(signal.len())?.forward_alloc(signal)
}

/// Forward DFT of a real signal, lifted to complex first.
pub fn forward_real(signal: &[f64]) -> Result<Vec<Complex<f64>>> {
    forward(&to_complex(signal))
}

/// Unnormalized inverse DFT; divide by `N` once with [`normalize`].
pub fn inverse(coefficients: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
    plan(coefficients.len())?.inverse_alloc(coefficients)
}

/// Divide every value by the sequence length.
pub fn normalize(values: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let scale = 1.0 / values.len() as f64;
    values.iter().map(|v| *v * scale).collect()
}

/// Lift real samples to complex ones.
pub fn to_complex(signal: &[f64]) -> Vec<Complex<f64>> {
    signal.iter().map(|&re| Complex::new(re, 0.0)).collect()
}

/// Real parts of complex samples.
pub fn real_part(values: &[Complex<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.re).collect()
}

/// Power spectral density `|c_k|² / n` for every bin.
pub fn power_spectral_density(coefficients: &[Complex<f64>], n: usize) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(Error::InvalidArg {
            arg: "n",
            reason: "normalization length must be positive".to_string(),
        });
    }
    let coefficients = read_signal("coefficients", coefficients)?;
    let scale = n as f64;
    Ok(coefficients.iter().map(|c| c.norm_sqr() / scale).collect())
}

/// Sample frequency of every bin for spacing `d`, numpy's `fftfreq`.
pub fn fftfreq(n: usize, d: f64) -> Result<Vec<f64>> {
    Ok(dd_rs_core::num_rs::fftfreq(n, d)?)
}

/// Angular wavenumbers `2π·k/L` of every bin over a periodic domain of
/// length `length`.
pub fn wavenumbers(n: usize, length: f64) -> Result<Vec<f64>> {
    if !length.is_finite() || length <= 0.0 {
        return Err(Error::InvalidArg {
            arg: "length",
            reason: format!("domain length must be finite and > 0, got {length}"),
        });
    }
    if n < dd_rs_core::num_rs::MIN_LEN {
        return Err(Error::InvalidSignalLength {
            arg: "n",
            reason: "signal length must be at least 2",
            got: n,
        });
    }
    let scale = 2.0 * PI / length;
    (0..n)
        .map(|bin| frequency_index(bin, n).map(|k| k as f64 * scale))
        .collect()
}

/// Signed frequency index carried by `bin`.
pub fn frequency_index(bin: usize, n: usize) -> Result<isize> {
    Ok(dd_rs_core::num_rs::frequency_index(bin, n)?)
}

/// Bin carrying the signed frequency index `freq`.
pub fn bin_index(freq: isize, n: usize) -> Result<usize> {
    Ok(dd_rs_core::num_rs::bin_index(freq, n)?)
}

/// Bin shown at position `centered` of a zero-centred spectrum.
pub fn shift_index(centered: usize, n: usize) -> Result<usize> {
    Ok(dd_rs_core::num_rs::shift_index(centered, n)?)
}

/// Zero-centred position of `bin`.
pub fn unshift_index(bin: usize, n: usize) -> Result<usize> {
    Ok(dd_rs_core::num_rs::unshift_index(bin, n)?)
}

/// Dense DFT matrix `F[j][k] = ω^(j·k)` with `ω = exp(-2πi/n)`.
///
/// `F · x` equals [`forward`]`(x)`. Exponents are reduced modulo `n` before
/// evaluating the twiddle, which keeps large products exact.
pub fn dft_matrix(n: usize) -> Result<DMatrix<Complex<f64>>> {
    if n == 0 {
        return Err(Error::InvalidSignalLength {
            arg: "n",
            reason: "DFT size must be positive",
            got: n,
        });
    }
    let step = -2.0 * PI / n as f64;
    let mut f = DMatrix::from_element(n, n, Complex::zero());
    for j in 0..n {
        for k in 0..n {
            f[(j, k)] = Complex::from_polar(1.0, step * ((j * k) % n) as f64);
        }
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;

    fn ramp(n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|i| Complex::new((i as f64 * 0.37).sin() + 0.1 * i as f64, (i as f64).cos()))
            .collect()
    }

    #[test]
    fn round_trip_recovers_signal() {
        for n in [2usize, 7, 64, 100] {
            let x = ramp(n);
            let back = normalize(&inverse(&forward(&x).expect("valid")).expect("valid"));
            for (a, b) in x.iter().zip(back.iter()) {
                assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
                assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn pure_tone_peaks_at_its_bins() {
        let n = 100;
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 5.0 * i as f64 / n as f64).sin())
            .collect();
        let coeffs = forward_real(&signal).expect("valid");
        let psd = power_spectral_density(&coeffs, n).expect("valid");
        for (k, p) in psd.iter().enumerate() {
            if k == 5 || k == 95 {
                assert_abs_diff_eq!(*p, 25.0, epsilon = 1e-9);
            } else {
                assert!(*p < 1e-9, "unexpected power {p} at bin {k}");
            }
        }
        assert_eq!(frequency_index(95, n).expect("valid"), -5);
    }

    #[test]
    fn dense_matrix_matches_fft() {
        let n = 12;
        let x = ramp(n);
        let dense = dft_matrix(n).expect("valid") * DVector::from_column_slice(&x);
        let fast = forward(&x).expect("valid");
        for (a, b) in dense.iter().zip(fast.iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-9);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn short_signals_are_rejected() {
        for x in [vec![], vec![Complex::new(1.0, 0.0)]] {
            let got = x.len();
            assert!(matches!(
                forward(&x),
                Err(Error::InvalidSignalLength { got: g, .. }) if g == got
            ));
            assert!(matches!(
                inverse(&x),
                Err(Error::InvalidSignalLength { .. })
            ));
        }
        assert!(SpectralTransform::try_new(SpectralConfig { len: 1 }).is_err());
    }

    #[test]
    fn kernel_checks_bound_lengths() {
        let kernel = SpectralTransform::try_new(SpectralConfig { len: 4 }).expect("valid config");
        let x = ramp(5);
        assert!(matches!(
            kernel.forward_alloc(&x),
            Err(Error::InvalidSignalLength { got: 5, .. })
        ));

        let x = ramp(4);
        let mut out = vec![Complex::zero(); 3];
        assert!(matches!(
            kernel.forward_into(&x, &mut out),
            Err(Error::Config(ConfigError::LengthMismatch { .. }))
        ));

        let mut out = vec![Complex::zero(); 4];
        kernel.forward_into(&x, &mut out).expect("matching buffers");
        assert_eq!(out, kernel.forward_alloc(&x).expect("valid"));
    }

    #[test]
    fn wavenumbers_follow_frequency_indices() {
        let k = wavenumbers(4, 2.0 * PI).expect("valid");
        assert_eq!(k, vec![0.0, 1.0, -2.0, -1.0]);
        assert!(matches!(
            wavenumbers(4, 0.0),
            Err(Error::InvalidArg { arg: "length", .. })
        ));
        assert!(matches!(
            wavenumbers(1, 1.0),
            Err(Error::InvalidSignalLength { .. })
        ));
    }

    #[test]
    fn shifted_axis_is_ascending() {
        let n = 9;
        let freqs = fftfreq(n, 0.5).expect("valid");
        let shifted = fftshift(&freqs);
        assert!(shifted.windows(2).all(|w| w[0] < w[1]));
        for (i, f) in shifted.iter().enumerate() {
            let bin = shift_index(i, n).expect("valid");
            assert_eq!(freqs[bin], *f);
            assert_eq!(unshift_index(bin, n).expect("valid"), i);
        }
        assert_eq!(bin_index(-4, n).expect("valid"), 5);
    }
}
