//! MAP estimation of latent preference values.
//!
//! The model is a Bradley–Terry–Luce choice likelihood
//!
//! `P(chosen | set) = exp(y_c / s) / Σ_k exp(y_k / s)`
//!
//! with a zero-mean GP prior `y ~ N(0, C)`. The log posterior is concave in
//! `y`, so a damped Newton iteration converges to the unique maximizer.

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, DVector, Dyn};

use super::data::Comparison;
use crate::error::{Error, Result};

/// Maximum Newton iterations per fit.
const MAX_NEWTON_ITERS: usize = 100;
/// Maximum step halvings in the line search.
const MAX_HALVINGS: usize = 30;
/// Convergence threshold on the largest component of an accepted step.
const STEP_TOL: f64 = 1e-9;

/// Result of a MAP fit.
pub(crate) struct MapEstimate {
    pub(crate) latent: DVector<f64>,
    /// `log p(D | y) - ½ yᵀ C⁻¹ y` at the estimate.
    pub(crate) log_posterior: f64,
    pub(crate) iterations: usize,
}

/// Find the latent values maximizing the log posterior.
///
/// `cov` is the prior covariance `C` and `cholesky` its factorization.
///
/// # Errors
///
/// Returns `Error::NumericalFailure` if a Newton system cannot be solved.
pub(crate) fn estimate(
    comparisons: &[Comparison],
    cov: &DMatrix<f64>,
    cholesky: &Cholesky<f64, Dyn>,
    btl_scale: f64,
) -> Result<MapEstimate> {
    let n = cov.nrows();
    let mut y = DVector::zeros(n);
    let mut psi = log_posterior(comparisons, cholesky, &y, btl_scale);
    let mut iterations = 0;

    if n == 0 || comparisons.is_empty() {
        return Ok(MapEstimate {
            latent: y,
            log_posterior: psi,
            iterations,
        });
    }

    let identity = DMatrix::<f64>::identity(n, n);

    while iterations < MAX_NEWTON_ITERS {
        iterations += 1;
        let (grad, w) = likelihood_derivatives(comparisons, &y, btl_scale);

        // y_new = (C⁻¹ + W)⁻¹ (W y + ∇) = (I + C W)⁻¹ C (W y + ∇)
        let rhs = cov * (&w * &y + &grad);
        let system = &identity + cov * &w;
        let target = system
            .lu()
            .solve(&rhs)
            .ok_or(Error::NumericalFailure("Newton system is singular"))?;
        let step = target - &y;

        let mut alpha = 1.0;
        let mut accepted = false;
        for _ in 0..MAX_HALVINGS {
            let candidate = &y + &step * alpha;
            let candidate_psi = log_posterior(comparisons, cholesky, &candidate, btl_scale);
            if candidate_psi.is_finite() && candidate_psi >= psi {
                y = candidate;
                psi = candidate_psi;
                accepted = true;
                break;
            }
            alpha *= 0.5;
        }

        if !accepted || step.amax() * alpha < STEP_TOL {
            break;
        }
    }

    trace_debug!(iterations, log_posterior = psi, "latent values estimated");

    Ok(MapEstimate {
        latent: y,
        log_posterior: psi,
        iterations,
    })
}

/// Indices of a comparison's choice set, chosen point first.
fn choice_set(comparison: &Comparison) -> impl Iterator<Item = usize> + '_ {
    core::iter::once(comparison.chosen).chain(comparison.others.iter().copied())
}

/// Softmax of `y_k / s` over a choice set, computed stably.
fn choice_probabilities(comparison: &Comparison, y: &DVector<f64>, s: f64) -> Vec<(usize, f64)> {
    let max_z = choice_set(comparison)
        .map(|k| y[k] / s)
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<(usize, f64)> = choice_set(comparison)
        .map(|k| (k, (y[k] / s - max_z).exp()))
        .collect();
    let total: f64 = exps.iter().map(|(_, e)| e).sum();
    exps.into_iter().map(|(k, e)| (k, e / total)).collect()
}

/// `log p(D | y)` under the BTL model.
pub(crate) fn log_likelihood(comparisons: &[Comparison], y: &DVector<f64>, s: f64) -> f64 {
    comparisons
        .iter()
        .map(|comparison| {
            let max_z = choice_set(comparison)
                .map(|k| y[k] / s)
                .fold(f64::NEG_INFINITY, f64::max);
            let log_sum = max_z
                + choice_set(comparison)
                    .map(|k| (y[k] / s - max_z).exp())
                    .sum::<f64>()
                    .ln();
            y[comparison.chosen] / s - log_sum
        })
        .sum()
}

fn log_posterior(
    comparisons: &[Comparison],
    cholesky: &Cholesky<f64, Dyn>,
    y: &DVector<f64>,
    s: f64,
) -> f64 {
    let c_inv_y = cholesky.solve(y);
    log_likelihood(comparisons, y, s) - 0.5 * y.dot(&c_inv_y)
}

/// Gradient of `log p(D | y)` and the matrix `W = -∇² log p(D | y)`.
fn likelihood_derivatives(
    comparisons: &[Comparison],
    y: &DVector<f64>,
    s: f64,
) -> (DVector<f64>, DMatrix<f64>) {
    let n = y.len();
    let mut grad = DVector::zeros(n);
    let mut w = DMatrix::zeros(n, n);
    let inv_s = 1.0 / s;
    let inv_s2 = inv_s * inv_s;

    for comparison in comparisons {
        let probs = choice_probabilities(comparison, y, s);
        grad[comparison.chosen] += inv_s;
        for &(k, pk) in &probs {
            grad[k] -= pk * inv_s;
            w[(k, k)] += pk * inv_s2;
            for &(l, pl) in &probs {
                w[(k, l)] -= pk * pl * inv_s2;
            }
        }
    }

    (grad, w)
}
