//! Choosing the next slider.
//!
//! One end of the next slider is the current best estimate (or the maximizer
//! of the posterior mean, see [`SliderOrigin`]); the other end maximizes an
//! acquisition function over `[0, 1]^D`. Maximization is a multi-start
//! search: `n_candidates` uniform random points, then a bounded compass
//! search from the best one.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `function` | Expected Improvement | Acquisition criterion |
//! | `n_candidates` | 500 | Random candidates per maximization |
//! | `origin` | best observed point | Where the slider's first end comes from |
//! | `enlarge_slider` | `true` | Present a slightly longer segment than the chosen ends |

use core::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::preference::PreferenceModel;
use crate::rng_util;
use crate::slider::Slider;

/// Default number of random candidates per maximization.
pub const DEFAULT_N_CANDIDATES: usize = 500;

/// Initial compass-search step.
const LOCAL_STEP_START: f64 = 0.1;
/// Compass search stops once the step falls below this.
const LOCAL_STEP_MIN: f64 = 1e-4;
/// Maximum function evaluations spent in compass search.
const LOCAL_MAX_EVALS: usize = 400;
/// Ends closer than this count as the same point.
const MIN_END_DISTANCE: f64 = 1e-6;

/// Criterion used to pick the second slider end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AcquisitionFunction {
    /// Expected improvement over the best latent value.
    #[default]
    ExpectedImprovement,
    /// Upper confidence bound `μ + κσ`.
    UpperConfidenceBound {
        /// Weight `κ` of the posterior standard deviation.
        kappa: f64,
    },
}

impl AcquisitionFunction {
    /// Score a point with posterior `mean` and standard deviation `std`.
    #[must_use]
    pub fn score(self, mean: f64, std: f64, f_best: f64) -> f64 {
        match self {
            Self::ExpectedImprovement => expected_improvement(mean, std, f_best),
            Self::UpperConfidenceBound { kappa } => mean + kappa * std,
        }
    }
}

/// Where the first end of each new slider comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliderOrigin {
    /// The observed point with the largest latent value.
    #[default]
    BestObserved,
    /// The maximizer of the posterior mean, searched from the best observed point.
    MeanMaximizer,
}

/// Settings of the acquisition step.
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionConfig {
    /// Criterion for the second slider end.
    pub function: AcquisitionFunction,
    /// Random candidates evaluated per maximization.
    pub n_candidates: usize,
    /// Source of the first slider end.
    pub origin: SliderOrigin,
    /// Whether sliders are enlarged beyond the chosen ends.
    pub enlarge_slider: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            function: AcquisitionFunction::default(),
            n_candidates: DEFAULT_N_CANDIDATES,
            origin: SliderOrigin::default(),
            enlarge_slider: true,
        }
    }
}

/// Standard normal density.
fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Standard normal distribution function, `Φ(x) = erfc(-x / √2) / 2`.
fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Expected improvement of a maximization problem.
///
/// `EI(x) = (mean - f_best) Φ(z) + std φ(z)`
/// where `z = (mean - f_best) / std`
#[must_use]
pub fn expected_improvement(mean: f64, std: f64, f_best: f64) -> f64 {
    if std < 1e-12 {
        return (mean - f_best).max(0.0);
    }
    let z = (mean - f_best) / std;
    let improvement = (mean - f_best) * norm_cdf(z) + std * norm_pdf(z);
    improvement.max(0.0)
}

// ---------------------------------------------------------------------------
// Bounded maximization
// ---------------------------------------------------------------------------

/// Maximize `f` over `[0, 1]^dim`.
///
/// Every point in `starts` and `n_candidates` uniform random points are
/// scored; compass search then refines the best of them.
pub(crate) fn maximize<F>(
    f: F,
    dim: usize,
    starts: &[Vec<f64>],
    n_candidates: usize,
    rng: &mut fastrand::Rng,
) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut best_x = vec![0.5; dim];
    let mut best_f = f64::NEG_INFINITY;

    let randoms = (0..n_candidates).map(|_| rng_util::unit_vector(rng, dim));
    for x in starts.iter().cloned().chain(randoms) {
        let fx = f(&x);
        if fx > best_f {
            best_f = fx;
            best_x = x;
        }
    }

    if !best_f.is_finite() {
        best_f = f(&best_x);
    }
    compass_search(&f, best_x, best_f)
}

/// Coordinate-wise pattern search inside the unit box.
fn compass_search<F>(f: &F, mut x: Vec<f64>, mut fx: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut step = LOCAL_STEP_START;
    let mut evals = 0;

    while step >= LOCAL_STEP_MIN && evals < LOCAL_MAX_EVALS {
        let mut improved = false;
        'dims: for i in 0..x.len() {
            for dir in [1.0, -1.0] {
                let moved = (x[i] + dir * step).clamp(0.0, 1.0);
                if (moved - x[i]).abs() < f64::EPSILON {
                    continue;
                }
                let mut candidate = x.clone();
                candidate[i] = moved;
                let fc = f(&candidate);
                evals += 1;
                if fc > fx {
                    x = candidate;
                    fx = fc;
                    improved = true;
                    break 'dims;
                }
            }
        }
        if !improved {
            step *= 0.5;
        }
    }

    x
}

// ---------------------------------------------------------------------------
// Slider selection
// ---------------------------------------------------------------------------

/// The corner of the unit box farthest from `a` in every coordinate.
#[must_use]
pub fn opposite_corner(a: &[f64]) -> Vec<f64> {
    a.iter().map(|&v| if v < 0.5 { 1.0 } else { 0.0 }).collect()
}

/// Replace `b` with the corner opposite `a` when the two are not distinct.
///
/// Returns the (possibly replaced) end and whether the fallback was used.
#[must_use]
pub fn ensure_distinct(a: &[f64], b: Vec<f64>) -> (Vec<f64>, bool) {
    let dist_sq: f64 = a.iter().zip(&b).map(|(x, y)| (x - y) * (x - y)).sum();
    if dist_sq.sqrt() < MIN_END_DISTANCE {
        (opposite_corner(a), true)
    } else {
        (b, false)
    }
}

/// Pick the next slider given a fitted model and the current best estimate.
pub(crate) fn next_slider(
    model: &PreferenceModel,
    x_max: &[f64],
    config: &AcquisitionConfig,
    rng: &mut fastrand::Rng,
) -> Slider {
    let dim = x_max.len();

    let origin = match config.origin {
        SliderOrigin::BestObserved => x_max.to_vec(),
        SliderOrigin::MeanMaximizer => maximize(
            |x| model.predict_mean(x),
            dim,
            &[x_max.to_vec()],
            config.n_candidates,
            rng,
        ),
    };

    let f_best = model.best_value().unwrap_or(0.0);
    let function = config.function;
    let candidate = maximize(
        |x| {
            let (mean, var) = model.predict(x);
            function.score(mean, var.sqrt(), f_best)
        },
        dim,
        &[],
        config.n_candidates,
        rng,
    );

    let (second, fallback) = ensure_distinct(&origin, candidate);
    if fallback {
        trace_info!("acquisition collapsed onto the slider origin; using the opposite corner");
    }

    Slider::new(origin, second, config.enlarge_slider)
}
