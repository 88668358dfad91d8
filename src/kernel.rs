//! Covariance functions over the unit hypercube.
//!
//! Both kernels use ARD lengthscales (one per dimension) and a shared
//! signal variance:
//!
//! - [`Kernel::SquaredExponential`]: `k(x1, x2) = σ² exp(-r² / 2)`
//! - [`Kernel::Matern52`]: `k(x1, x2) = σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`
//!
//! where `r = sqrt(Σ ((x1_i - x2_i) / l_i)²)`.

use nalgebra::{DMatrix, DVector};

/// Precomputed √5 constant.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// The covariance function used by the preference model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kernel {
    /// ARD squared exponential (infinitely smooth).
    #[default]
    SquaredExponential,
    /// ARD Matérn 5/2 (twice differentiable).
    Matern52,
}

/// Hyperparameters shared by every [`Kernel`] variant.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelParams {
    /// Signal variance `σ²`, the kernel value at zero distance.
    pub signal_variance: f64,
    /// Per-dimension lengthscales `l_i`.
    pub lengthscales: Vec<f64>,
}

impl KernelParams {
    /// Creates parameters with the same lengthscale in every dimension.
    #[must_use]
    pub fn isotropic(signal_variance: f64, lengthscale: f64, dim: usize) -> Self {
        Self {
            signal_variance,
            lengthscales: vec![lengthscale; dim],
        }
    }
}

impl Kernel {
    /// Evaluates the kernel between two points.
    ///
    /// Both points must have one component per lengthscale.
    #[must_use]
    pub fn eval(self, params: &KernelParams, x1: &[f64], x2: &[f64]) -> f64 {
        debug_assert_eq!(x1.len(), params.lengthscales.len(), "point dimension");
        debug_assert_eq!(x2.len(), params.lengthscales.len(), "point dimension");
        let r_sq = scaled_sq_distance(x1, x2, &params.lengthscales);
        match self {
            Self::SquaredExponential => params.signal_variance * (-0.5 * r_sq).exp(),
            Self::Matern52 => {
                let sqrt5_r = SQRT_5 * r_sq.sqrt();
                params.signal_variance * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
            }
        }
    }
}

fn scaled_sq_distance(x1: &[f64], x2: &[f64], lengthscales: &[f64]) -> f64 {
    x1.iter()
        .zip(x2)
        .zip(lengthscales)
        .map(|((a, b), l)| {
            let diff = (a - b) / l;
            diff * diff
        })
        .sum()
}

/// Build the matrix `K + noise_var·I` over the given points.
pub(crate) fn kernel_matrix(
    kernel: Kernel,
    params: &KernelParams,
    x: &[Vec<f64>],
    noise_var: f64,
) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = kernel.eval(params, &x[i], &x[j]);
        if i == j { k + noise_var } else { k }
    })
}

/// Compute the kernel vector `k(x*, X)` for a test point.
pub(crate) fn kernel_vector(
    kernel: Kernel,
    params: &KernelParams,
    x_star: &[f64],
    x_train: &[Vec<f64>],
) -> DVector<f64> {
    DVector::from_fn(x_train.len(), |i, _| kernel.eval(params, x_star, &x_train[i]))
}
