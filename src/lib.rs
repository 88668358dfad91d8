#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Human-in-the-loop preference optimization by sequential line search.
//!
//! The user never scores a candidate. Instead, every iteration shows them a
//! one-dimensional slider through the search space `[0, 1]^D` and asks which
//! position they like best. Each answer becomes a preference judgement; a
//! Gaussian-process preference model is refitted on all judgements so far,
//! and an acquisition function picks the next slider through the current best
//! estimate.
//!
//! # Getting Started
//!
//! ```
//! use sequential_line_search::Session;
//!
//! let target = [0.1, 0.2, 0.3, 0.4, 0.5];
//! let mut session = Session::builder(target.len())
//!     .seed(42)
//!     .n_candidates(100)
//!     .build()
//!     .unwrap();
//!
//! for _ in 0..10 {
//!     let a = session.parameters_from_slider(0.0).unwrap();
//!     let b = session.parameters_from_slider(1.0).unwrap();
//!
//!     // Stand-in for the user: pick the point on the slider closest to `target`
//!     let d: Vec<f64> = b.iter().zip(&a).map(|(b, a)| b - a).collect();
//!     let proj: f64 = d.iter().zip(target.iter().zip(&a)).map(|(d, (t, a))| d * (t - a)).sum();
//!     let len_sq: f64 = d.iter().map(|d| d * d).sum();
//!
//!     session.proceed_optimization((proj / len_sq).clamp(0.0, 1.0)).unwrap();
//! }
//!
//! println!("best estimate: {:?}", session.x_max());
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Session`] | Owns the optimization state; the four operations live here. |
//! | [`SessionHandle`] | Procedural `init` / `get_parameters_from_slider` / `proceed_optimization` / `get_x_max` front end. |
//! | [`Slider`](slider::Slider) | The segment currently shown to the user. |
//! | [`PreferenceModel`](preference::PreferenceModel) | Latent preference values and the GP surrogate fitted to them. |
//! | [`AcquisitionFunction`](acquisition::AcquisitionFunction) | How the second slider end is chosen. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key optimization points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
mod error;
mod handle;
pub mod kernel;
mod linalg;
pub mod preference;
mod rng_util;
mod session;
pub mod slider;
pub mod surrogate;

pub use error::{Error, Result, Warning};
pub use handle::SessionHandle;
pub use session::{Session, SessionBuilder};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use sequential_line_search::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{AcquisitionFunction, SliderOrigin};
    pub use crate::error::{Error, Result, Warning};
    pub use crate::handle::SessionHandle;
    pub use crate::kernel::Kernel;
    pub use crate::preference::{PreferenceData, PreferenceModel};
    pub use crate::session::{Session, SessionBuilder};
    pub use crate::slider::{Observation, Slider};
}
