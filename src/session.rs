//! The optimization session: slider in, slider out.

mod builder;

pub use builder::SessionBuilder;

use crate::acquisition::{self, AcquisitionConfig};
use crate::error::{Error, Result, Warning};
use crate::preference::{PreferenceData, PreferenceModel, RegressorConfig};
use crate::slider::{Observation, Slider};

/// State of one sequential line search.
///
/// A session owns everything an optimization needs: the dimensionality, the
/// append-only observation history, the current slider, the current best
/// estimate and the last fitted preference model. Each call to
/// [`proceed_optimization`](Self::proceed_optimization) either succeeds and
/// updates all of it, or fails and leaves the session exactly as it was.
///
/// # Examples
///
/// ```
/// use sequential_line_search::Session;
///
/// let target = [0.1, 0.2, 0.3];
/// let mut session = Session::builder(3).seed(7).n_candidates(100).build().unwrap();
///
/// for _ in 0..5 {
///     let a = session.parameters_from_slider(0.0).unwrap();
///     let b = session.parameters_from_slider(1.0).unwrap();
///
///     // Closest point to the target along the slider
///     let d: Vec<f64> = b.iter().zip(&a).map(|(b, a)| b - a).collect();
///     let proj: f64 = d.iter().zip(target.iter().zip(&a)).map(|(d, (t, a))| d * (t - a)).sum();
///     let len_sq: f64 = d.iter().map(|d| d * d).sum();
///
///     session.proceed_optimization((proj / len_sq).clamp(0.0, 1.0)).unwrap();
/// }
///
/// assert_eq!(session.x_max().len(), 3);
/// assert_eq!(session.n_observations(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    dim: usize,
    regressor: RegressorConfig,
    acquisition: AcquisitionConfig,
    /// Base seed of the per-iteration acquisition RNG.
    search_seed: u64,
    observations: Vec<Observation>,
    slider: Slider,
    x_max: Vec<f64>,
    y_max: Option<f64>,
    model: Option<PreferenceModel>,
    iteration: usize,
    warnings: Vec<Warning>,
}

impl Session {
    /// Creates a session over `[0, 1]^dimension` with default settings and a
    /// random seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::builder(dimension).build()
    }

    /// Creates a session with default settings and a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `dimension` is zero.
    pub fn with_seed(dimension: usize, seed: u64) -> Result<Self> {
        Self::builder(dimension).seed(seed).build()
    }

    /// Creates a builder for configuring a session.
    #[must_use]
    pub fn builder(dimension: usize) -> SessionBuilder {
        SessionBuilder::new(dimension)
    }

    /// The point at position `position` along the current slider.
    ///
    /// Position 0 is the slider's first end and position 1 its second end.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSliderValue` if `position` is outside `[0, 1]`.
    pub fn parameters_from_slider(&self, position: f64) -> Result<Vec<f64>> {
        check_position(position)?;
        Ok(self.slider.point_at(position))
    }

    /// Record the user's choice on the current slider and move to the next one.
    ///
    /// The choice becomes a new observation; the preference model is refitted
    /// on the full history, the best estimate is updated, and the acquisition
    /// step picks the next slider.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSliderValue` if `position` is outside `[0, 1]`,
    /// or `Error::NumericalFailure` if the model cannot be fitted. On error
    /// the session is unchanged.
    pub fn proceed_optimization(&mut self, position: f64) -> Result<()> {
        check_position(position)?;

        let mut observations = self.observations.clone();
        observations.push(Observation::new(self.slider.clone(), position));

        let data = PreferenceData::from_observations(&observations);
        let model = PreferenceModel::fit(&data, self.dim, &self.regressor)?;
        let x_max = model
            .best_point()
            .map(<[f64]>::to_vec)
            .ok_or(Error::Internal("no data points after an observation"))?;
        let y_max = model.best_value();

        let mut rng = self.iteration_rng();
        let slider = acquisition::next_slider(&model, &x_max, &self.acquisition, &mut rng);

        self.warnings = model.warnings().to_vec();
        self.observations = observations;
        self.slider = slider;
        self.x_max = x_max;
        self.y_max = y_max;
        self.model = Some(model);
        self.iteration += 1;

        trace_info!(
            iteration = self.iteration,
            points = data.len(),
            y_max = y_max.unwrap_or_default(),
            "iteration completed"
        );

        Ok(())
    }

    /// The current best estimate.
    ///
    /// Before the first observation this is the midpoint of the initial
    /// slider's chosen ends; afterwards it is the observed point with the
    /// largest latent preference value.
    #[must_use]
    pub fn x_max(&self) -> &[f64] {
        &self.x_max
    }

    /// Latent preference value of [`x_max`](Self::x_max), once there is data.
    #[must_use]
    pub fn y_max(&self) -> Option<f64> {
        self.y_max
    }

    /// Dimensionality of the search space.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of completed iterations.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Number of recorded observations.
    #[must_use]
    pub fn n_observations(&self) -> usize {
        self.observations.len()
    }

    /// All recorded observations, oldest first.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The slider currently offered to the user.
    #[must_use]
    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    /// The preference model from the latest update.
    #[must_use]
    pub fn model(&self) -> Option<&PreferenceModel> {
        self.model.as_ref()
    }

    /// Preference data built from the observation history.
    #[must_use]
    pub fn preference_data(&self) -> PreferenceData {
        PreferenceData::from_observations(&self.observations)
    }

    /// Warnings raised by the latest update.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The acquisition RNG for the upcoming iteration, a function of the
    /// session seed and the iteration count only.
    fn iteration_rng(&self) -> fastrand::Rng {
        let iteration = u64::try_from(self.iteration).unwrap_or(u64::MAX);
        fastrand::Rng::with_seed(
            self.search_seed ^ iteration.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15),
        )
    }
}

fn check_position(position: f64) -> Result<()> {
    if (0.0..=1.0).contains(&position) {
        Ok(())
    } else {
        Err(Error::InvalidSliderValue(position))
    }
}
