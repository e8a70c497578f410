use crate::kernel::{ConfigError, KernelLifecycle};
use crate::{Error, Result};
use core::cmp::Ordering;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};

/// Thin singular value decomposition `A = U·diag(Σ)·Vᵗ`.
///
/// For an `m x n` matrix with `k = min(m, n)`: `u` is `m x k`, `v` is `n x k`
/// and the `k` singular values are non-negative and sorted descending. The
/// signs of matching singular vector pairs are not unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd {
    u: DMatrix<f64>,
    singular_values: DVector<f64>,
    v: DMatrix<f64>,
}

impl Svd {
    /// Left singular vectors, `m x k`.
    pub fn u(&self) -> &DMatrix<f64> {
        &self.u
    }

    /// Right singular vectors, `n x k`.
    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }

    /// Singular values, descending.
    pub fn singular_values(&self) -> &DVector<f64> {
        &self.singular_values
    }

    /// Shape `(m, n)` of the factorized matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.u.nrows(), self.v.nrows())
    }

    /// Number of singular triplets, `min(m, n)`.
    pub fn k(&self) -> usize {
        self.singular_values.len()
    }

    /// Largest singular value.
    pub fn sigma_max(&self) -> f64 {
        self.singular_values[0]
    }

    /// Default solve tolerance, `f64::EPSILON * max(m, n) * sigma_max`.
    pub fn default_tolerance(&self) -> f64 {
        let (m, n) = self.shape();
        f64::EPSILON * m.max(n) as f64 * self.sigma_max()
    }

    /// Rank-`rank` reconstruction `U[:, :r] · diag(Σ[:r]) · V[:, :r]ᵗ`.
    pub fn reconstruct(&self, rank: usize) -> Result<DMatrix<f64>> {
        let k = self.k();
        if rank == 0 || rank > k {
            return Err(Error::InvalidArg {
                arg: "rank",
                reason: format!("rank must be in 1..={k}, got {rank}"),
            });
        }
        let mut scaled = self.u.columns(0, rank).into_owned();
        for j in 0..rank {
            scaled.column_mut(j).scale_mut(self.singular_values[j]);
        }
        Ok(scaled * self.v.columns(0, rank).transpose())
    }
}

/// 2D factorization capability.
pub trait Factorize2D {
    /// Factorize `a` into its thin SVD.
    fn run(&self, a: &DMatrix<f64>) -> Result<Svd>;
}

/// 2D low-rank approximation capability.
pub trait LowRankApprox2D {
    /// Factorize `a` and reconstruct it at the configured rank.
    fn run(&self, a: &DMatrix<f64>) -> Result<DMatrix<f64>>;

    /// Reconstruct an existing decomposition at the configured rank.
    fn run_svd(&self, svd: &Svd) -> Result<DMatrix<f64>>;
}

/// Constructor config for [`SvdKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvdConfig {
    /// Cap on implicit QR sweeps; `0` leaves the iteration unbounded.
    pub max_iterations: usize,
}

/// Thin SVD kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvdKernel {
    max_iterations: usize,
}

impl KernelLifecycle for SvdKernel {
    type Config = SvdConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        Ok(Self {
            max_iterations: config.max_iterations,
        })
    }
}

impl Factorize2D for SvdKernel {
    fn run(&self, a: &DMatrix<f64>) -> Result<Svd> {
        factorize_impl(a, self.max_iterations)
    }
}

/// Constructor config for [`TruncatedSvdKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedSvdConfig {
    /// Number of singular triplets kept.
    pub rank: usize,
    /// Cap on implicit QR sweeps; `0` leaves the iteration unbounded.
    pub max_iterations: usize,
}

/// Rank-truncated SVD reconstruction kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedSvdKernel {
    rank: usize,
    svd: SvdKernel,
}

impl TruncatedSvdKernel {
    /// Configured rank.
    pub fn rank(&self) -> usize {
        self.rank
    }
}

impl KernelLifecycle for TruncatedSvdKernel {
    type Config = TruncatedSvdConfig;

    fn try_new(config: Self::Config) -> core::result::Result<Self, ConfigError> {
        if config.rank == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "rank",
                reason: "rank must be at least 1",
            });
        }
        Ok(Self {
            rank: config.rank,
            svd: SvdKernel::try_new(SvdConfig {
                max_iterations: config.max_iterations,
            })?,
        })
    }
}

impl LowRankApprox2D for TruncatedSvdKernel {
    fn run(&self, a: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let svd = self.svd.run(a)?;
        self.run_svd(&svd)
    }

    fn run_svd(&self, svd: &Svd) -> Result<DMatrix<f64>> {
        svd.reconstruct(self.rank)
    }
}

fn factorize_impl(a: &DMatrix<f64>, max_iterations: usize) -> Result<Svd> {
    let (m, n) = a.shape();
    if m == 0 || n == 0 {
        return Err(Error::NotFactorizable {
            reason: "matrix must have at least one row and one column",
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(Error::NotFactorizable {
            reason: "matrix contains non-finite entries",
        });
    }
    tracing::debug!(rows = m, cols = n, max_iterations, "factorizing matrix");

    let svd = a
        .clone()
        .try_svd(true, true, f64::EPSILON, max_iterations)
        .ok_or(Error::NotFactorizable {
            reason: "singular value iteration did not converge",
        })?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(Error::NotFactorizable {
                reason: "singular vectors were not computed",
            })
        }
    };
    let sigma = svd.singular_values;
    let k = sigma.len();
    if sigma
        .iter()
        .chain(u.iter())
        .chain(v_t.iter())
        .any(|v| !v.is_finite())
    {
        return Err(Error::NotFactorizable {
            reason: "decomposition overflowed",
        });
    }

    // Stable sort keeps tied singular values in backend order.
    let order = (0..k)
        .sorted_by(|&i, &j| {
            sigma[j]
                .abs()
                .partial_cmp(&sigma[i].abs())
                .unwrap_or(Ordering::Equal)
        })
        .collect_vec();

    let mut u_sorted = DMatrix::zeros(m, k);
    let mut v_sorted = DMatrix::zeros(n, k);
    let mut values = DVector::zeros(k);
    for (dst, &src) in order.iter().enumerate() {
        let sign = if sigma[src] < 0.0 { -1.0 } else { 1.0 };
        values[dst] = sigma[src].abs();
        u_sorted.set_column(dst, &(u.column(src) * sign));
        v_sorted.set_column(dst, &v_t.row(src).transpose());
    }
    tracing::trace!(sigma_max = values[0], sigma_min = values[k - 1], "factorized");

    Ok(Svd {
        u: u_sorted,
        singular_values: values,
        v: v_sorted,
    })
}

/// Sweep cap used by [`factorize`], `6 * max(m, n)^2` as in LAPACK's `dbdsqr`.
pub fn default_max_iterations(rows: usize, cols: usize) -> usize {
    let d = rows.max(cols).max(1);
    6 * d * d
}

/// Thin SVD of `a`, capped at [`default_max_iterations`] sweeps.
///
/// Fails with [`Error::NotFactorizable`] for empty or non-finite input, when
/// the iteration does not converge within the cap, or when the decomposition
/// overflows. Use [`SvdKernel`] with `max_iterations: 0` for an unbounded
/// iteration.
pub fn factorize(a: &DMatrix<f64>) -> Result<Svd> {
    factorize_impl(a, default_max_iterations(a.nrows(), a.ncols()))
}

/// Rank-`rank` reconstruction of a decomposition; `1 <= rank <= svd.k()`.
pub fn reconstruct(svd: &Svd, rank: usize) -> Result<DMatrix<f64>> {
    svd.reconstruct(rank)
}

/// Frobenius norm of `a - b`.
pub fn frobenius_distance(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64> {
    if a.shape() != b.shape() {
        return Err(Error::DimensionMismatch {
            arg: "b",
            expected: a.shape(),
            got: b.shape(),
        });
    }
    Ok((a - b).norm())
}
