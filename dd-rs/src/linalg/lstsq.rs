use super::svd::{factorize, Svd};
use crate::kernel::{ConfigError, KernelLifecycle};
use crate::{Error, Result};
use nalgebra::{DMatrix, DVector};

/// Least-squares solve capability against a thin SVD.
pub trait LeastSquaresSolve2D {
    /// Solve `A·x ≈ b` for every column of `b`.
    fn run(&self, svd: &Svd, b: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Solve `A·x ≈ b` for a single right-hand side.
    fn run_vector(&self, svd: &Svd, b: &DVector<f64>) -> Result<DVector<f64>> {
        let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
        let x = self.run(svd, &rhs)?;
        Ok(DVector::from_column_slice(x.as_slice()))
    }
}

/// Constructor config for [`SvdSolveKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvdSolveConfig {
    /// Singular values at or below this are treated as zero. `None` uses
    /// [`Svd::default_tolerance`].
    pub tolerance: Option<f64>,
}

/// Pseudo-inverse solve `x = V·Σ⁻¹·Uᵗ·b`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SvdSolveKernel {
    tolerance: Option<f64>,
}

impl KernelLifecycle for SvdSolveKernel {
    type Config = SvdSolveConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if let Some(tolerance) = config.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(ConfigError::InvalidArgument {
                    arg: "tolerance",
                    reason: "tolerance must be finite and >= 0",
                });
            }
        }
        Ok(Self {
            tolerance: config.tolerance,
        })
    }
}

impl LeastSquaresSolve2D for SvdSolveKernel {
    fn run(&self, svd: &Svd, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let (m, _) = svd.shape();
        if b.nrows() != m {
            return Err(Error::DimensionMismatch {
                arg: "b",
                expected: (m, b.ncols()),
                got: b.shape(),
            });
        }

        let tolerance = self
            .tolerance
            .unwrap_or_else(|| svd.default_tolerance());
        let sigma = svd.singular_values();
        if let Some((index, &value)) = sigma.iter().enumerate().find(|(_, s)| **s <= tolerance) {
            return Err(Error::SingularMatrix {
                index,
                value,
                tolerance,
            });
        }
        tracing::debug!(rows = m, rhs = b.ncols(), tolerance, "solving least squares");

        let mut projected = svd.u().transpose() * b;
        for (i, s) in sigma.iter().enumerate() {
            projected.row_mut(i).unscale_mut(*s);
        }
        Ok(svd.v() * projected)
    }
}

/// Least-squares solution of `A·x ≈ b` with the default tolerance.
pub fn solve(svd: &Svd, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    SvdSolveKernel::default().run(svd, b)
}

/// Factorize `a` and solve `A·x ≈ b`.
pub fn lstsq(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let svd = factorize(a)?;
    solve(&svd, b)
}
