//! Gaussian-process regression over latent preference values.
//!
//! The preference engine produces one latent value per data point; this
//! module interpolates those values over the whole domain. The posterior is
//! a pure function of the kernel, its hyperparameters, the noise variance and
//! the training data, so refitting with the same inputs always gives the same
//! predictions.

use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result, Warning};
use crate::kernel::{Kernel, KernelParams, kernel_matrix, kernel_vector};
use crate::linalg::factorize;

/// A fitted GP model ready for predictions.
#[derive(Clone, Debug)]
pub struct GaussianProcess {
    kernel: Kernel,
    params: KernelParams,
    /// Lower Cholesky factor L of K + σ²I (+ jitter).
    l: DMatrix<f64>,
    /// α = (K + σ²I)^{-1} y.
    alpha: DVector<f64>,
    x_train: Vec<Vec<f64>>,
    warnings: Vec<Warning>,
}

impl GaussianProcess {
    /// Fit a GP to `targets` observed at `points`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if `points` and `targets` differ in
    /// length, or if a point's length differs from the number of lengthscales.
    /// Returns `Error::NumericalFailure` if the covariance matrix cannot be
    /// factorized even with jitter.
    pub fn fit(
        kernel: Kernel,
        params: KernelParams,
        noise_variance: f64,
        points: &[Vec<f64>],
        targets: &[f64],
    ) -> Result<Self> {
        if points.len() != targets.len() {
            return Err(Error::DimensionMismatch {
                expected: points.len(),
                got: targets.len(),
            });
        }
        let dim = params.lengthscales.len();
        if let Some(bad) = points.iter().find(|p| p.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: bad.len(),
            });
        }

        let k = kernel_matrix(kernel, &params, points, noise_variance);
        let factorization = factorize(k)?;
        let mut warnings = Vec::new();
        if factorization.jitter > 0.0 {
            warnings.push(Warning::NumericalInstability {
                jitter: factorization.jitter,
            });
        }

        let y = DVector::from_column_slice(targets);
        let alpha = factorization.cholesky.solve(&y);
        let l = factorization.cholesky.unpack();

        Ok(Self {
            kernel,
            params,
            l,
            alpha,
            x_train: points.to_vec(),
            warnings,
        })
    }

    /// Predict mean and variance at a test point.
    ///
    /// `x` must have one component per lengthscale. With no training data
    /// this is the prior: mean 0 and variance `σ²`.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> (f64, f64) {
        debug_assert_eq!(x.len(), self.params.lengthscales.len(), "query dimension");
        let k_self = self.params.signal_variance;
        if self.x_train.is_empty() {
            return (0.0, k_self);
        }
        let k_star = kernel_vector(self.kernel, &self.params, x, &self.x_train);

        // Mean: k*^T α
        let mean = k_star.dot(&self.alpha);

        // Variance: k(x*, x*) - v^T v with v = L^{-1} k*
        let var = match self.l.solve_lower_triangular(&k_star) {
            Some(v) => (k_self - v.dot(&v)).max(0.0),
            None => 0.0,
        };

        (mean, var)
    }

    /// Predict only the posterior mean (skips the triangular solve).
    ///
    /// `x` must have one component per lengthscale.
    #[must_use]
    pub fn predict_mean(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.params.lengthscales.len(), "query dimension");
        if self.x_train.is_empty() {
            return 0.0;
        }
        kernel_vector(self.kernel, &self.params, x, &self.x_train).dot(&self.alpha)
    }

    /// The kernel hyperparameters this model was fitted with.
    #[must_use]
    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// The kernel this model was fitted with.
    #[must_use]
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Number of training points.
    #[must_use]
    pub fn n_train(&self) -> usize {
        self.x_train.len()
    }

    /// Warnings raised while fitting.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}
