use crate::acquisition::{
    AcquisitionConfig, AcquisitionFunction, DEFAULT_N_CANDIDATES, SliderOrigin, ensure_distinct,
};
use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::preference::{
    DEFAULT_BTL_SCALE, DEFAULT_LENGTHSCALE, DEFAULT_NOISE_VARIANCE, DEFAULT_PRIOR_VARIANCE,
    DEFAULT_SIGNAL_VARIANCE, RegressorConfig,
};
use crate::rng_util;
use crate::slider::Slider;

use super::Session;

/// A builder for constructing [`Session`] instances with a fluent API.
///
/// Created via [`Session::builder()`]. All options have sensible defaults:
///
/// | Option | Default |
/// |--------|---------|
/// | `seed` | random |
/// | `kernel` | [`Kernel::SquaredExponential`] |
/// | `signal_variance` | 0.5 |
/// | `lengthscale` | 0.5 |
/// | `noise_variance` | 0.005 |
/// | `btl_scale` | 0.01 |
/// | `fit_hyperparameters` | `false` |
/// | `acquisition` | [`AcquisitionFunction::ExpectedImprovement`] |
/// | `n_candidates` | 500 |
/// | `enlarge_slider` | `true` |
/// | `slider_origin` | [`SliderOrigin::BestObserved`] |
/// | `initial_slider` | two random points |
///
/// # Examples
///
/// ```
/// use sequential_line_search::Session;
/// use sequential_line_search::kernel::Kernel;
///
/// let session = Session::builder(3)
///     .seed(42)
///     .kernel(Kernel::Matern52)
///     .n_candidates(200)
///     .build()
///     .unwrap();
///
/// assert_eq!(session.dimension(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    dimension: usize,
    seed: Option<u64>,
    kernel: Option<Kernel>,
    signal_variance: Option<f64>,
    lengthscale: Option<f64>,
    noise_variance: Option<f64>,
    btl_scale: Option<f64>,
    fit_hyperparameters: Option<bool>,
    acquisition: Option<AcquisitionFunction>,
    n_candidates: Option<usize>,
    enlarge_slider: Option<bool>,
    slider_origin: Option<SliderOrigin>,
    initial_slider: Option<(Vec<f64>, Vec<f64>)>,
}

impl SessionBuilder {
    pub(super) fn new(dimension: usize) -> Self {
        Self {
            dimension,
            seed: None,
            kernel: None,
            signal_variance: None,
            lengthscale: None,
            noise_variance: None,
            btl_scale: None,
            fit_hyperparameters: None,
            acquisition: None,
            n_candidates: None,
            enlarge_slider: None,
            slider_origin: None,
            initial_slider: None,
        }
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the covariance function of the preference model.
    #[must_use]
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    /// Sets the kernel signal variance.
    ///
    /// Default: 0.5.
    #[must_use]
    pub fn signal_variance(mut self, v: f64) -> Self {
        self.signal_variance = Some(v);
        self
    }

    /// Sets the kernel lengthscale, shared by all dimensions.
    ///
    /// Default: 0.5.
    #[must_use]
    pub fn lengthscale(mut self, l: f64) -> Self {
        self.lengthscale = Some(l);
        self
    }

    /// Sets the noise variance added to the kernel diagonal.
    ///
    /// Larger values make the model more tolerant of inconsistent judgements.
    ///
    /// Default: 0.005.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = Some(v);
        self
    }

    /// Sets the temperature of the Bradley–Terry–Luce likelihood.
    ///
    /// Default: 0.01.
    #[must_use]
    pub fn btl_scale(mut self, s: f64) -> Self {
        self.btl_scale = Some(s);
        self
    }

    /// Selects kernel hyperparameters by joint MAP on every update, using the
    /// configured signal variance and lengthscale as prior centres.
    ///
    /// Default: `false`.
    #[must_use]
    pub fn fit_hyperparameters(mut self, fit: bool) -> Self {
        self.fit_hyperparameters = Some(fit);
        self
    }

    /// Sets the acquisition function used for the second slider end.
    #[must_use]
    pub fn acquisition(mut self, function: AcquisitionFunction) -> Self {
        self.acquisition = Some(function);
        self
    }

    /// Sets the number of random candidates per acquisition maximization.
    ///
    /// More candidates improve the quality of the acquisition maximum
    /// at the cost of more GP predictions per iteration.
    ///
    /// Default: 500.
    #[must_use]
    pub fn n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = Some(n);
        self
    }

    /// Whether presented sliders extend somewhat beyond the chosen ends.
    ///
    /// Default: `true`.
    #[must_use]
    pub fn enlarge_slider(mut self, enlarge: bool) -> Self {
        self.enlarge_slider = Some(enlarge);
        self
    }

    /// Sets where the first end of each new slider comes from.
    #[must_use]
    pub fn slider_origin(mut self, origin: SliderOrigin) -> Self {
        self.slider_origin = Some(origin);
        self
    }

    /// Uses the given points as the ends of the first slider instead of
    /// two random points.
    #[must_use]
    pub fn initial_slider(mut self, end_0: Vec<f64>, end_1: Vec<f64>) -> Self {
        self.initial_slider = Some((end_0, end_1));
        self
    }

    /// Builds the configured [`Session`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` for zero dimensions,
    /// `Error::InvalidHyperparameter` for unusable model or search settings,
    /// and `Error::DimensionMismatch` / `Error::OutOfDomain` for an invalid
    /// initial slider.
    pub fn build(self) -> Result<Session> {
        let dim = self.dimension;
        if dim == 0 {
            return Err(Error::InvalidDimension(dim));
        }

        let regressor = RegressorConfig {
            kernel: self.kernel.unwrap_or_default(),
            signal_variance: self.signal_variance.unwrap_or(DEFAULT_SIGNAL_VARIANCE),
            lengthscale: self.lengthscale.unwrap_or(DEFAULT_LENGTHSCALE),
            noise_variance: self.noise_variance.unwrap_or(DEFAULT_NOISE_VARIANCE),
            btl_scale: self.btl_scale.unwrap_or(DEFAULT_BTL_SCALE),
            fit_hyperparameters: self.fit_hyperparameters.unwrap_or(false),
            prior_variance: DEFAULT_PRIOR_VARIANCE,
        };
        regressor.validate()?;

        let acquisition = AcquisitionConfig {
            function: self.acquisition.unwrap_or_default(),
            n_candidates: self.n_candidates.unwrap_or(DEFAULT_N_CANDIDATES),
            origin: self.slider_origin.unwrap_or_default(),
            enlarge_slider: self.enlarge_slider.unwrap_or(true),
        };
        if acquisition.n_candidates == 0 {
            return Err(Error::InvalidHyperparameter {
                name: "n_candidates",
                value: 0.0,
            });
        }
        if let AcquisitionFunction::UpperConfidenceBound { kappa } = acquisition.function
            && (!kappa.is_finite() || kappa < 0.0)
        {
            return Err(Error::InvalidHyperparameter {
                name: "kappa",
                value: kappa,
            });
        }

        let mut rng = rng_util::make_rng(self.seed);
        let (end_0, end_1) = match self.initial_slider {
            Some((a, b)) => {
                check_point(&a, dim)?;
                check_point(&b, dim)?;
                (a, b)
            }
            None => (
                rng_util::unit_vector(&mut rng, dim),
                rng_util::unit_vector(&mut rng, dim),
            ),
        };
        let (end_1, _) = ensure_distinct(&end_0, end_1);
        let search_seed = rng.u64(..);

        let x_max = end_0.iter().zip(&end_1).map(|(a, b)| 0.5 * (a + b)).collect();
        let slider = Slider::new(end_0, end_1, acquisition.enlarge_slider);

        trace_info!(dimension = dim, "session created");

        Ok(Session {
            dim,
            regressor,
            acquisition,
            search_seed,
            observations: Vec::new(),
            slider,
            x_max,
            y_max: None,
            model: None,
            iteration: 0,
            warnings: Vec::new(),
        })
    }
}

/// Check that a user-supplied point has `dim` components, all in `[0, 1]`.
fn check_point(point: &[f64], dim: usize) -> Result<()> {
    if point.len() != dim {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: point.len(),
        });
    }
    if let Some((index, &value)) = point
        .iter()
        .enumerate()
        .find(|(_, v)| !(0.0..=1.0).contains(*v))
    {
        return Err(Error::OutOfDomain { index, value });
    }
    Ok(())
}
