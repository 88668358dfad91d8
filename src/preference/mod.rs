//! Preference model: from slider judgements to a posterior over preference.
//!
//! - [`data`] - Deduplicated points and "chosen beats others" comparisons
//! - [`map`] - MAP latent values under a BTL likelihood with a GP prior
//!
//! [`PreferenceModel::fit`] is a pure function of its inputs: the same
//! preference data and configuration always produce the same latent values
//! and the same surrogate.

mod data;
mod map;

pub use data::{Comparison, PreferenceData};

use nalgebra::DMatrix;

use crate::error::{Error, Result, Warning};
use crate::kernel::{Kernel, KernelParams, kernel_matrix};
use crate::linalg::{factorize, log_det};
use crate::surrogate::GaussianProcess;

/// Default kernel signal variance.
pub const DEFAULT_SIGNAL_VARIANCE: f64 = 0.5;
/// Default kernel lengthscale (all dimensions).
pub const DEFAULT_LENGTHSCALE: f64 = 0.5;
/// Default noise variance added to the kernel diagonal.
pub const DEFAULT_NOISE_VARIANCE: f64 = 0.005;
/// Default BTL temperature.
pub const DEFAULT_BTL_SCALE: f64 = 0.01;
/// Default variance of the log-normal hyperparameter priors.
pub const DEFAULT_PRIOR_VARIANCE: f64 = 0.1;

/// Multipliers of the configured signal variance tried during hyperparameter fitting.
const SIGNAL_VARIANCE_GRID: [f64; 3] = [0.5, 1.0, 2.0];
/// Multipliers of the configured lengthscale tried during hyperparameter fitting.
const LENGTHSCALE_GRID: [f64; 5] = [0.5, 0.75, 1.0, 1.5, 2.0];

/// Settings of the preference regressor.
#[derive(Clone, Debug, PartialEq)]
pub struct RegressorConfig {
    /// Covariance function.
    pub kernel: Kernel,
    /// Kernel signal variance, or the prior centre when fitting hyperparameters.
    pub signal_variance: f64,
    /// Kernel lengthscale, or the prior centre when fitting hyperparameters.
    pub lengthscale: f64,
    /// Observation noise variance on the latent values.
    pub noise_variance: f64,
    /// Temperature `s` of the BTL likelihood; smaller means more decisive judgements.
    pub btl_scale: f64,
    /// Select kernel hyperparameters by joint MAP instead of using them as given.
    pub fit_hyperparameters: bool,
    /// Variance (in log space) of the log-normal hyperparameter priors.
    pub prior_variance: f64,
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            signal_variance: DEFAULT_SIGNAL_VARIANCE,
            lengthscale: DEFAULT_LENGTHSCALE,
            noise_variance: DEFAULT_NOISE_VARIANCE,
            btl_scale: DEFAULT_BTL_SCALE,
            fit_hyperparameters: false,
            prior_variance: DEFAULT_PRIOR_VARIANCE,
        }
    }
}

impl RegressorConfig {
    /// Checks that every numeric setting is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidHyperparameter` naming the first bad setting.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("signal_variance", self.signal_variance),
            ("lengthscale", self.lengthscale),
            ("noise_variance", self.noise_variance),
            ("btl_scale", self.btl_scale),
            ("prior_variance", self.prior_variance),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidHyperparameter { name, value });
            }
        }
        Ok(())
    }
}

/// A fitted preference model.
#[derive(Clone, Debug)]
pub struct PreferenceModel {
    data: PreferenceData,
    latent: Vec<f64>,
    gp: GaussianProcess,
    iterations: usize,
    warnings: Vec<Warning>,
}

impl PreferenceModel {
    /// Fit latent preference values and the surrogate GP to `data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if a point does not have `dim`
    /// components, `Error::InvalidHyperparameter` for an invalid `config`,
    /// and `Error::NumericalFailure` if a covariance matrix or Newton system
    /// cannot be solved.
    pub fn fit(data: &PreferenceData, dim: usize, config: &RegressorConfig) -> Result<Self> {
        config.validate()?;
        if let Some(bad) = data.points().iter().find(|p| p.len() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: bad.len(),
            });
        }

        let grid: Vec<(f64, f64)> = if config.fit_hyperparameters {
            SIGNAL_VARIANCE_GRID
                .iter()
                .flat_map(|&sv| LENGTHSCALE_GRID.iter().map(move |&ls| (sv, ls)))
                .collect()
        } else {
            vec![(1.0, 1.0)]
        };

        let mut best: Option<(f64, KernelParams, map::MapEstimate, f64)> = None;
        for (sv_mult, ls_mult) in grid {
            let params = KernelParams::isotropic(
                config.signal_variance * sv_mult,
                config.lengthscale * ls_mult,
                dim,
            );
            let (estimate, jitter, score) = fit_latent(data, &params, config)?;
            let is_better = best.as_ref().is_none_or(|(s, ..)| score > *s);
            if is_better {
                best = Some((score, params, estimate, jitter));
            }
        }
        let (_, params, estimate, jitter) =
            best.ok_or(Error::Internal("hyperparameter grid is empty"))?;

        if config.fit_hyperparameters {
            trace_debug!(
                signal_variance = params.signal_variance,
                lengthscale = params.lengthscales.first().copied().unwrap_or_default(),
                "kernel hyperparameters selected"
            );
        }

        let latent: Vec<f64> = estimate.latent.iter().copied().collect();
        let gp = GaussianProcess::fit(
            config.kernel,
            params,
            config.noise_variance,
            data.points(),
            &latent,
        )?;

        let mut warnings = Vec::new();
        if jitter > 0.0 {
            warnings.push(Warning::NumericalInstability { jitter });
        }
        for w in gp.warnings() {
            if !warnings.contains(w) {
                warnings.push(w.clone());
            }
        }

        Ok(Self {
            data: data.clone(),
            latent,
            gp,
            iterations: estimate.iterations,
            warnings,
        })
    }

    /// The preference data the model was fitted to.
    #[must_use]
    pub fn data(&self) -> &PreferenceData {
        &self.data
    }

    /// MAP latent value of each data point, aligned with `data().points()`.
    #[must_use]
    pub fn latent(&self) -> &[f64] {
        &self.latent
    }

    /// Index of the data point with the largest latent value.
    ///
    /// Ties resolve to the earliest point.
    #[must_use]
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.latent.iter().enumerate() {
            if best.is_none_or(|(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        best.map(|(i, _)| i)
    }

    /// The data point with the largest latent value.
    #[must_use]
    pub fn best_point(&self) -> Option<&[f64]> {
        self.best_index().map(|i| self.data.points()[i].as_slice())
    }

    /// The largest latent value.
    #[must_use]
    pub fn best_value(&self) -> Option<f64> {
        self.best_index().map(|i| self.latent[i])
    }

    /// Posterior mean and variance of the preference at `x`.
    ///
    /// `x` must have the model's dimensionality.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> (f64, f64) {
        self.gp.predict(x)
    }

    /// Posterior mean of the preference at `x`.
    ///
    /// `x` must have the model's dimensionality.
    #[must_use]
    pub fn predict_mean(&self, x: &[f64]) -> f64 {
        self.gp.predict_mean(x)
    }

    /// The fitted surrogate.
    #[must_use]
    pub fn surrogate(&self) -> &GaussianProcess {
        &self.gp
    }

    /// The kernel hyperparameters in use.
    #[must_use]
    pub fn params(&self) -> &KernelParams {
        self.gp.params()
    }

    /// Newton iterations taken by the latent-value estimate.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Warnings raised while fitting.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// MAP latent values for one hyperparameter setting.
///
/// Returns the estimate, the jitter needed to factorize the prior covariance,
/// and the joint log posterior used to compare settings.
fn fit_latent(
    data: &PreferenceData,
    params: &KernelParams,
    config: &RegressorConfig,
) -> Result<(map::MapEstimate, f64, f64)> {
    let mut cov: DMatrix<f64> =
        kernel_matrix(config.kernel, params, data.points(), config.noise_variance);
    let factorization = factorize(cov.clone())?;
    if factorization.jitter > 0.0 {
        for i in 0..cov.nrows() {
            cov[(i, i)] += factorization.jitter;
        }
    }

    let estimate = map::estimate(
        data.comparisons(),
        &cov,
        &factorization.cholesky,
        config.btl_scale,
    )?;

    let lengthscale = params.lengthscales.first().copied().unwrap_or(config.lengthscale);
    let score = estimate.log_posterior - 0.5 * log_det(&factorization.cholesky)
        + log_normal_prior(params.signal_variance, config.signal_variance, config.prior_variance)
        + log_normal_prior(lengthscale, config.lengthscale, config.prior_variance);

    Ok((estimate, factorization.jitter, score))
}

/// Log density (up to a constant) of a log-normal prior centred on `center`.
fn log_normal_prior(value: f64, center: f64, variance: f64) -> f64 {
    let d = value.ln() - center.ln();
    -d * d / (2.0 * variance) - value.ln()
}
