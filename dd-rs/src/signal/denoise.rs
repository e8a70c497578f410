use super::fft::{
    fftfreq, normalize, power_spectral_density, to_complex, SpectralConfig, SpectralTransform,
};
use super::traits::{Denoise1D, SpectralTransform1D};
use crate::kernel::{read_signal, write_exact, ConfigError, KernelLifecycle, Read1D, Write1D};
use crate::{Complex, Error, Result};
use num_traits::Zero;

/// Zero every coefficient whose PSD is not strictly above `threshold`.
///
/// `NaN` PSD entries compare false and are zeroed.
pub fn mask_by_threshold(
    coefficients: &[Complex<f64>],
    psd: &[f64],
    threshold: f64,
) -> Result<Vec<Complex<f64>>> {
    if coefficients.len() != psd.len() {
        return Err(Error::InvalidSignalLength {
            arg: "psd",
            reason: "psd must have one entry per coefficient",
            got: psd.len(),
        });
    }
    Ok(coefficients
        .iter()
        .zip(psd)
        .map(|(&c, &p)| if p > threshold { c } else { Complex::zero() })
        .collect())
}

/// Constructor config for [`DenoiseKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenoiseConfig {
    /// Bins with PSD at or below this are removed.
    pub threshold: f64,
    /// Sample spacing used for the reported frequency axis.
    pub sample_spacing: f64,
}

/// Output of [`DenoiseKernel::run_alloc`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenoiseResult {
    /// Filtered signal.
    pub filtered: Vec<f64>,
    /// Frequency of every bin, `fftfreq(n, sample_spacing)`.
    pub frequencies: Vec<f64>,
    /// PSD of the input.
    pub psd: Vec<f64>,
    /// PSD with removed bins set to zero.
    pub psd_clean: Vec<f64>,
    /// Number of bins kept.
    pub kept: usize,
}

/// Forward FFT, PSD threshold mask, inverse FFT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenoiseKernel {
    threshold: f64,
    sample_spacing: f64,
}

impl KernelLifecycle for DenoiseKernel {
    type Config = DenoiseConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if config.threshold.is_nan() {
            return Err(ConfigError::InvalidArgument {
                arg: "threshold",
                reason: "threshold must not be NaN",
            });
        }
        Ok(Self {
            threshold: config.threshold,
            sample_spacing: crate::kernel::require_positive(
                "sample_spacing",
                config.sample_spacing,
            )?,
        })
    }
}

impl DenoiseKernel {
    fn filter(&self, signal: &[f64]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let n = signal.len();
        let transform = SpectralTransform::try_new(SpectralConfig { len: n })?;
        let coefficients = transform.forward_alloc(&to_complex(signal))?;
        let psd = power_spectral_density(&coefficients, n)?;
        let masked = mask_by_threshold(&coefficients, &psd, self.threshold)?;
        let psd_clean = psd
            .iter()
            .map(|&p| if p > self.threshold { p } else { 0.0 })
            .collect();
        let filtered = normalize(&transform.inverse_alloc(&masked)?)
            .into_iter()
            .map(|v| v.re)
            .collect();
        Ok((filtered, psd, psd_clean))
    }
}

impl Denoise1D for DenoiseKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let input = read_signal("input", input)?;
        let out = write_exact("out", out, input.len())?;
        let (filtered, _, _) = self.filter(input)?;
        out.copy_from_slice(&filtered);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<DenoiseResult>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = read_signal("input", input)?;
        let (filtered, psd, psd_clean) = self.filter(input)?;
        let kept = psd.iter().filter(|&&p| p > self.threshold).count();
        tracing::debug!(
            n = input.len(),
            threshold = self.threshold,
            kept,
            "denoised signal"
        );
        Ok(DenoiseResult {
            filtered,
            frequencies: fftfreq(input.len(), self.sample_spacing)?,
            psd,
            psd_clean,
            kept,
        })
    }
}
