use super::traits::FourierSeriesFit1D;
use crate::kernel::{read_signal, require_positive, ConfigError, KernelLifecycle, Read1D};
use crate::{Error, Result};
use core::f64::consts::PI;

/// Constructor config for [`FourierSeriesKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierSeriesConfig {
    /// Half period `L`; samples cover `[-L, L)`.
    pub half_period: f64,
    /// Number of cosine/sine pairs fitted.
    pub terms: usize,
}

/// Fits the real Fourier series of one sampled period by rectangle-rule
/// inner products.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierSeriesKernel {
    half_period: f64,
    terms: usize,
}

impl KernelLifecycle for FourierSeriesKernel {
    type Config = FourierSeriesConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        Ok(Self {
            half_period: require_positive("half_period", config.half_period)?,
            terms: config.terms,
        })
    }
}

/// Real Fourier series
/// `a0/2 + Σ_k a_k·cos(πkx/L) + b_k·sin(πkx/L)` for `k = 1..=terms`.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierSeries {
    /// Half period `L`.
    pub half_period: f64,
    /// Constant coefficient; the series carries `a0 / 2`.
    pub a0: f64,
    /// `a_1..a_terms`.
    pub cosine: Vec<f64>,
    /// `b_1..b_terms`.
    pub sine: Vec<f64>,
}

impl FourierSeries {
    /// Number of complete cosine/sine pairs.
    pub fn terms(&self) -> usize {
        self.cosine.len().min(self.sine.len())
    }

    /// Series truncated to its first `terms` pairs, evaluated at `x`.
    pub fn evaluate_partial(&self, x: &[f64], terms: usize) -> Vec<f64> {
        let terms = terms.min(self.terms());
        x.iter()
            .map(|&xi| {
                (1..=terms).fold(self.a0 / 2.0, |acc, k| {
                    let phase = PI * k as f64 * xi / self.half_period;
                    acc + self.cosine[k - 1] * phase.cos() + self.sine[k - 1] * phase.sin()
                })
            })
            .collect()
    }

    /// Full series evaluated at `x`.
    pub fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        self.evaluate_partial(x, self.terms())
    }

    /// Every partial sum at `x`; entry `j` uses the first `j` pairs, so entry
    /// `0` is the constant term alone.
    pub fn partial_sums(&self, x: &[f64]) -> Vec<Vec<f64>> {
        let mut current = vec![self.a0 / 2.0; x.len()];
        let mut sums = Vec::with_capacity(self.terms() + 1);
        sums.push(current.clone());
        for k in 1..=self.terms() {
            let (a, b) = (self.cosine[k - 1], self.sine[k - 1]);
            for (value, &xi) in current.iter_mut().zip(x) {
                let phase = PI * k as f64 * xi / self.half_period;
                *value += a * phase.cos() + b * phase.sin();
            }
            sums.push(current.clone());
        }
        sums
    }

    /// Relative L2 error `‖f - S_j‖ / ‖f‖` of every partial sum `S_j`.
    pub fn relative_errors(&self, x: &[f64], f: &[f64]) -> Result<Vec<f64>> {
        if x.len() != f.len() {
            return Err(Error::InvalidSignalLength {
                arg: "f",
                reason: "samples must pair with the evaluation points",
                got: f.len(),
            });
        }
        let norm = l2_norm(f.iter().copied());
        if norm == 0.0 {
            return Err(Error::InvalidArg {
                arg: "f",
                reason: "relative error is undefined for an all-zero signal".to_string(),
            });
        }
        Ok(self
            .partial_sums(x)
            .iter()
            .map(|s| l2_norm(s.iter().zip(f).map(|(a, b)| a - b)) / norm)
            .collect())
    }
}

fn l2_norm(values: impl Iterator<Item = f64>) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}

impl FourierSeriesFit1D for FourierSeriesKernel {
    fn run_alloc<I1, I2>(&self, x: &I1, f: &I2) -> Result<FourierSeries>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
    {
        let x = read_signal("x", x)?;
        let f = read_signal("f", f)?;
        if x.len() != f.len() {
            return Err(Error::InvalidSignalLength {
                arg: "f",
                reason: "samples must pair with the sample points",
                got: f.len(),
            });
        }
        let h = x[1] - x[0];
        if !h.is_finite() || h <= 0.0 {
            return Err(Error::InvalidArg {
                arg: "x",
                reason: format!("sample points must increase uniformly, got step {h}"),
            });
        }

        let l = self.half_period;
        let weight = h / l;
        let project = |basis: fn(f64) -> f64, k: usize| {
            x.iter()
                .zip(f)
                .map(|(&xi, &fi)| fi * basis(PI * k as f64 * xi / l))
                .sum::<f64>()
                * weight
        };

        let a0 = f.iter().sum::<f64>() * weight;
        let cosine = (1..=self.terms).map(|k| project(f64::cos, k)).collect();
        let sine = (1..=self.terms).map(|k| project(f64::sin, k)).collect();
        tracing::trace!(samples = x.len(), terms = self.terms, a0, "fitted Fourier series");

        Ok(FourierSeries {
            half_period: l,
            a0,
            cosine,
            sine,
        })
    }
}
