//! Cholesky factorization with diagonal jitter.

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, Dyn};

use crate::error::{Error, Result};

/// First jitter tried, relative to the mean diagonal entry.
const JITTER_START: f64 = 1e-10;
/// Largest jitter tried, relative to the mean diagonal entry.
const JITTER_MAX: f64 = 1e-2;

/// A Cholesky factor together with the diagonal term that was needed to get it.
pub(crate) struct Factorization {
    pub(crate) cholesky: Cholesky<f64, Dyn>,
    /// Zero when the matrix was positive definite as given.
    pub(crate) jitter: f64,
}

/// Factorize a symmetric matrix, adding diagonal jitter when it is not
/// numerically positive definite.
///
/// Jitter starts at `1e-10` times the mean diagonal and grows by 10× per
/// attempt up to `1e-2` times the mean diagonal.
///
/// # Errors
///
/// Returns `Error::NumericalFailure` if no jitter up to the maximum makes
/// the matrix factorizable.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn factorize(matrix: DMatrix<f64>) -> Result<Factorization> {
    if let Some(cholesky) = try_cholesky(matrix.clone()) {
        return Ok(Factorization {
            cholesky,
            jitter: 0.0,
        });
    }

    let n = matrix.nrows();
    let mean_diag = if n == 0 {
        1.0
    } else {
        (matrix.trace() / n as f64).abs().max(f64::MIN_POSITIVE)
    };

    let mut relative = JITTER_START;
    while relative <= JITTER_MAX * (1.0 + 1e-9) {
        let jitter = relative * mean_diag;
        let mut regularized = matrix.clone();
        for i in 0..n {
            regularized[(i, i)] += jitter;
        }
        if let Some(cholesky) = try_cholesky(regularized) {
            trace_warn!(jitter, size = n, "covariance matrix regularized");
            return Ok(Factorization { cholesky, jitter });
        }
        relative *= 10.0;
    }

    Err(Error::NumericalFailure(
        "covariance matrix is not positive definite even with maximum jitter",
    ))
}

/// Cholesky factor whose pivots are all finite and strictly positive.
fn try_cholesky(matrix: DMatrix<f64>) -> Option<Cholesky<f64, Dyn>> {
    let cholesky = Cholesky::new(matrix)?;
    let usable = cholesky
        .l_dirty()
        .diagonal()
        .iter()
        .all(|d| d.is_finite() && *d > 0.0);
    usable.then_some(cholesky)
}

/// Log-determinant of the factorized matrix: `2 Σ ln L_ii`.
pub(crate) fn log_det(cholesky: &Cholesky<f64, Dyn>) -> f64 {
    2.0 * cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>()
}
