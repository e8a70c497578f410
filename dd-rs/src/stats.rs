use crate::kernel::{read_signal, require_positive, ConfigError, KernelLifecycle, Read1D};
use crate::{Error, Result};
use core::cmp::Ordering;
use itertools::Itertools;

/// Truncation-point selection capability.
pub trait TruncationSelect1D {
    /// Select a truncation index from a sequence of approximation errors.
    fn run<I>(&self, errors: &I) -> Result<Option<usize>>
    where
        I: Read1D<f64> + ?Sized;
}

/// Lower empirical quantile of ascending `sorted` values.
///
/// Returns the first `sorted[i]` with `(i + 1) >= p * n`, so `p = 0.5` picks
/// the lower of the two middle values for even `n`.
pub fn empirical_quantile(sorted: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidArg {
            arg: "p",
            reason: format!("quantile must be in [0, 1], got {p}"),
        });
    }
    let target = p * sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .find(|(i, _)| (i + 1) as f64 >= target)
        .map(|(_, v)| *v)
        .ok_or_else(|| ConfigError::EmptyInput { arg: "sorted" }.into())
}

/// Lower empirical median of `values` in any order.
pub fn median(values: &[f64]) -> Result<f64> {
    let sorted = values
        .iter()
        .copied()
        .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .collect_vec();
    empirical_quantile(&sorted, 0.5)
}

/// Constructor config for [`TruncationKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncationConfig {
    /// Multiplier on `median(errors) * sqrt(len)`.
    pub scale: f64,
}

/// Picks the last index before the error curve drops to a noise floor.
///
/// The floor is `median(errors) * sqrt(len) * scale`. The selected index is
/// one before the first error at or below the floor, saturating at `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncationKernel {
    scale: f64,
}

impl KernelLifecycle for TruncationKernel {
    type Config = TruncationConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        Ok(Self {
            scale: require_positive("scale", config.scale)?,
        })
    }
}

impl TruncationKernel {
    /// Noise floor for `errors`.
    pub fn threshold(&self, errors: &[f64]) -> Result<f64> {
        Ok(median(errors)? * (errors.len() as f64).sqrt() * self.scale)
    }
}

impl TruncationSelect1D for TruncationKernel {
    fn run<I>(&self, errors: &I) -> Result<Option<usize>>
    where
        I: Read1D<f64> + ?Sized,
    {
        let errors = errors.read_slice()?;
        if errors.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "errors" }.into());
        }
        let threshold = self.threshold(errors)?;
        let index = errors
            .iter()
            .position(|&e| e <= threshold)
            .map(|i| i.saturating_sub(1));
        tracing::debug!(len = errors.len(), threshold, ?index, "selected truncation");
        Ok(index)
    }
}

/// Truncation index for `errors` with the given `scale`.
pub fn select_truncation(errors: &[f64], scale: f64) -> Result<Option<usize>> {
    TruncationKernel::try_new(TruncationConfig { scale })?.run(errors)
}

/// Closed-form fit of `y = alpha + beta * x`, returned as `(alpha, beta)`.
///
/// With `origin` set the line is forced through the origin and `alpha` is 0.
pub fn linear_regression(x: &[f64], y: &[f64], origin: bool) -> Result<(f64, f64)> {
    let x = read_signal("x", x)?;
    if x.len() != y.len() {
        return Err(Error::InvalidSignalLength {
            arg: "y",
            reason: "y must pair with x",
            got: y.len(),
        });
    }

    if origin {
        let sxx: f64 = x.iter().map(|v| v * v).sum();
        if sxx == 0.0 {
            return Err(degenerate());
        }
        let sxy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
        return Ok((0.0, sxy / sxx));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;
    let (sxx, sxy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxx, sxy), (a, b)| {
            let dx = a - x_mean;
            (sxx + dx * dx, sxy + dx * (b - y_mean))
        });
    if sxx == 0.0 {
        return Err(degenerate());
    }
    let beta = sxy / sxx;
    Ok((y_mean - beta * x_mean, beta))
}

fn degenerate() -> Error {
    Error::InvalidArg {
        arg: "x",
        reason: "x has no spread; the slope is undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn lower_empirical_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(empirical_quantile(&sorted, 0.0).expect("valid"), 1.0);
        assert_eq!(empirical_quantile(&sorted, 0.5).expect("valid"), 2.0);
        assert_eq!(empirical_quantile(&sorted, 0.51).expect("valid"), 3.0);
        assert_eq!(empirical_quantile(&sorted, 1.0).expect("valid"), 4.0);
        assert!(empirical_quantile(&sorted, 1.5).is_err());
        assert!(matches!(
            empirical_quantile(&[], 0.5),
            Err(Error::Config(ConfigError::EmptyInput { .. }))
        ));
        assert_eq!(median(&[5.0, 1.0, 3.0]).expect("valid"), 3.0);
    }

    #[test]
    fn truncation_picks_index_before_noise_floor() {
        let errs = [0.9, 0.5, 0.2, 0.05, 0.04, 0.03, 0.02, 0.01];
        assert_eq!(select_truncation(&errs, 1.0).expect("valid"), Some(2));
    }

    #[test]
    fn truncation_saturates_and_reports_absence() {
        let kernel = TruncationKernel::try_new(TruncationConfig { scale: 1.0 }).expect("valid");
        // every error is already below the floor
        assert_eq!(kernel.run(&[0.1, 0.1, 0.1, 0.1]).expect("valid"), Some(0));

        // a negative floor is never reached
        let errs = [-1.0, -2.0, -3.0];
        assert_eq!(kernel.run(&errs).expect("valid"), None);

        assert!(kernel.run(&[0.0f64; 0]).is_err());
        assert!(TruncationKernel::try_new(TruncationConfig { scale: 0.0 }).is_err());
    }

    #[test]
    fn regression_recovers_line() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.5 - 0.25 * v).collect();
        let (alpha, beta) = linear_regression(&x, &y, false).expect("valid");
        assert_abs_diff_eq!(alpha, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(beta, -0.25, epsilon = 1e-12);

        let (alpha, beta) = linear_regression(&x, &y, true).expect("valid");
        assert_eq!(alpha, 0.0);
        let sxy: f64 = x.iter().zip(&y).map(|(a, b)| a * b).sum();
        let sxx: f64 = x.iter().map(|a| a * a).sum();
        assert_abs_diff_eq!(beta, sxy / sxx, epsilon = 1e-12);
    }

    #[test]
    fn regression_rejects_degenerate_input() {
        assert!(linear_regression(&[2.0, 2.0], &[1.0, 3.0], false).is_err());
        assert!(linear_regression(&[0.0, 0.0], &[1.0, 3.0], true).is_err());
        assert!(matches!(
            linear_regression(&[1.0, 2.0], &[1.0], false),
            Err(Error::InvalidSignalLength { .. })
        ));
    }
}
