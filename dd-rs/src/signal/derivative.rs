use super::fft::{normalize, to_complex, wavenumbers, SpectralConfig, SpectralTransform};
use super::traits::{Differentiate1D, SpectralTransform1D};
use crate::kernel::{
    read_signal, require_positive, write_exact, ConfigError, KernelLifecycle, Read1D, Write1D,
};
use crate::{Complex, Error, Result};

/// Multiply every bin by `i·κ_k`.
pub fn differentiate(coefficients: &[Complex<f64>], wavenumbers: &[f64]) -> Result<Vec<Complex<f64>>> {
    if coefficients.len() != wavenumbers.len() {
        return Err(Error::InvalidSignalLength {
            arg: "wavenumbers",
            reason: "wavenumbers must have one entry per coefficient",
            got: wavenumbers.len(),
        });
    }
    Ok(coefficients
        .iter()
        .zip(wavenumbers)
        .map(|(c, &k)| c * Complex::new(0.0, k))
        .collect())
}

/// Forward difference `(f[i+1] - f[i]) / dx`.
///
/// The last sample has no successor and repeats the previous difference.
pub fn finite_difference(f: &[f64], dx: f64) -> Result<Vec<f64>> {
    let f = read_signal("f", f)?;
    if !dx.is_finite() || dx <= 0.0 {
        return Err(Error::InvalidArg {
            arg: "dx",
            reason: format!("spacing must be finite and > 0, got {dx}"),
        });
    }
    let mut df: Vec<f64> = f.windows(2).map(|w| (w[1] - w[0]) / dx).collect();
    df.push(df[df.len() - 1]);
    Ok(df)
}

/// Constructor config for [`SpectralDerivativeKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralDerivativeConfig {
    /// Length of the periodic domain the samples cover.
    pub length: f64,
}

/// Spectral derivative of uniformly sampled periodic data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralDerivativeKernel {
    length: f64,
}

impl KernelLifecycle for SpectralDerivativeKernel {
    type Config = SpectralDerivativeConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        Ok(Self {
            length: require_positive("length", config.length)?,
        })
    }
}

impl SpectralDerivativeKernel {
    fn derivative(&self, samples: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
        let n = samples.len();
        let transform = SpectralTransform::try_new(SpectralConfig { len: n })?;
        let coefficients = transform.forward_alloc(samples)?;
        let kappa = wavenumbers(n, self.length)?;
        let scaled = differentiate(&coefficients, &kappa)?;
        Ok(normalize(&transform.inverse_alloc(&scaled)?))
    }
}

impl Differentiate1D<Complex<f64>> for SpectralDerivativeKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<Complex<f64>> + ?Sized,
        O: Write1D<Complex<f64>> + ?Sized,
    {
        let input = read_signal("input", input)?;
        let out = write_exact("out", out, input.len())?;
        out.copy_from_slice(&self.derivative(input)?);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<Complex<f64>>>
    where
        I: Read1D<Complex<f64>> + ?Sized,
    {
        self.derivative(read_signal("input", input)?)
    }
}

impl Differentiate1D<f64> for SpectralDerivativeKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let input = read_signal("input", input)?;
        let out = write_exact("out", out, input.len())?;
        for (dst, v) in out.iter_mut().zip(self.derivative(&to_complex(input))?) {
            *dst = v.re;
        }
        Ok(())
    }

    // Real input has conjugate-symmetric coefficients, so the imaginary part
    // of the result is rounding noise plus the Nyquist term.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = read_signal("input", input)?;
        Ok(self
            .derivative(&to_complex(input))?
            .into_iter()
            .map(|v| v.re)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f64::consts::PI;

    fn grid(n: usize, start: f64, length: f64) -> Vec<f64> {
        let dx = length / n as f64;
        (0..n).map(|i| start + i as f64 * dx).collect()
    }

    fn max_error(n: usize) -> f64 {
        let x = grid(n, 0.0, 2.0 * PI);
        let f: Vec<f64> = x.iter().map(|v| v.sin().exp()).collect();
        let kernel = SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: 2.0 * PI })
            .expect("valid config");
        let df: Vec<f64> = kernel.run_alloc(&f).expect("valid");
        x.iter()
            .zip(df.iter())
            .map(|(v, d)| (v.cos() * v.sin().exp() - d).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn sine_differentiates_to_cosine() {
        let n = 64;
        let x = grid(n, 0.0, 2.0 * PI);
        let f: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let kernel = SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: 2.0 * PI })
            .expect("valid config");
        let df: Vec<f64> = kernel.run_alloc(&f).expect("valid");
        for (v, d) in x.iter().zip(df.iter()) {
            assert_abs_diff_eq!(*d, v.cos(), epsilon = 1e-10);
        }
    }

    #[test]
    fn accuracy_improves_with_resolution() {
        let errors: Vec<f64> = [8, 16, 32].iter().map(|&n| max_error(n)).collect();
        assert!(errors[0] > errors[1] && errors[1] > errors[2], "{errors:?}");
        assert!(errors[2] < 1e-9, "{errors:?}");
    }

    #[test]
    fn complex_samples_keep_both_parts() {
        // f = exp(i·x) has derivative i·exp(i·x)
        let n = 16;
        let x = grid(n, 0.0, 2.0 * PI);
        let f: Vec<Complex<f64>> = x.iter().map(|&v| Complex::from_polar(1.0, v)).collect();
        let kernel = SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: 2.0 * PI })
            .expect("valid config");
        let mut df = vec![Complex::new(0.0, 0.0); n];
        kernel.run_into(&f, &mut df).expect("matching buffers");
        for (z, d) in f.iter().zip(df.iter()) {
            let expected = Complex::new(0.0, 1.0) * z;
            assert_abs_diff_eq!(d.re, expected.re, epsilon = 1e-10);
            assert_abs_diff_eq!(d.im, expected.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn gaussian_wave_packet_beats_finite_difference() {
        let (n, l) = (128, 30.0);
        let dx = l / n as f64;
        let x = grid(n, -l / 2.0, l);
        let f: Vec<f64> = x.iter().map(|v| v.cos() * (-v * v / 25.0).exp()).collect();
        let exact: Vec<f64> = x
            .iter()
            .zip(f.iter())
            .map(|(v, fv)| -(v.sin() * (-v * v / 25.0).exp() + 2.0 / 25.0 * v * fv))
            .collect();

        let kernel =
            SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: l }).expect("valid");
        let mut spectral = vec![0.0; n];
        kernel.run_into(&f, &mut spectral).expect("matching buffers");
        let fd = finite_difference(&f, dx).expect("valid");

        let err = |estimate: &[f64]| {
            estimate
                .iter()
                .zip(exact.iter())
                .map(|(a, e)| (a - e).abs())
                .fold(0.0, f64::max)
        };
        assert!(err(&spectral) < 1e-3);
        assert!(err(&spectral) < err(&fd));
    }

    #[test]
    fn finite_difference_repeats_last_step() {
        let df = finite_difference(&[0.0, 1.0, 3.0, 6.0], 0.5).expect("valid");
        assert_eq!(df, vec![2.0, 4.0, 6.0, 6.0]);
        assert!(finite_difference(&[1.0], 0.5).is_err());
        assert!(finite_difference(&[1.0, 2.0], 0.0).is_err());
    }

    #[test]
    fn mismatched_wavenumbers_are_rejected() {
        let coeffs = vec![Complex::new(1.0, 0.0); 4];
        assert!(matches!(
            differentiate(&coeffs, &[0.0, 1.0]),
            Err(Error::InvalidSignalLength { got: 2, .. })
        ));
        assert!(SpectralDerivativeKernel::try_new(SpectralDerivativeConfig { length: -1.0 }).is_err());
    }
}
