#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a session is created with zero dimensions.
    #[error("invalid dimension: {0} (a session needs at least one dimension)")]
    InvalidDimension(usize),

    /// Returned when a slider position lies outside `[0, 1]` or is not a number.
    #[error("invalid slider value: {0} must be in [0.0, 1.0]")]
    InvalidSliderValue(f64),

    /// Returned when a [`SessionHandle`](crate::SessionHandle) is used before `init`.
    #[error("session is not initialized; call init first")]
    UninitializedSession,

    /// Returned when a vector does not have the session's dimensionality.
    #[error("dimension mismatch: expected {expected} components, got {got}")]
    DimensionMismatch {
        /// The session's dimensionality.
        expected: usize,
        /// The length of the supplied vector.
        got: usize,
    },

    /// Returned when a user-supplied point has a component outside `[0, 1]`.
    #[error("component {index} of the supplied point is {value}, outside [0.0, 1.0]")]
    OutOfDomain {
        /// Index of the offending component.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a configured model or search setting is not usable.
    #[error("invalid hyperparameter '{name}': {value}")]
    InvalidHyperparameter {
        /// Name of the builder option.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a covariance matrix stays indefinite even after the
    /// largest diagonal jitter has been applied.
    #[error("numerical failure: {0}")]
    NumericalFailure(&'static str),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;

/// A recoverable condition noticed while updating the model.
///
/// Warnings never abort an operation. The most recent update's warnings are
/// available through [`Session::warnings`](crate::Session::warnings).
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// A covariance matrix was near-singular and was regularized by adding
    /// `jitter` to its diagonal before factorization.
    NumericalInstability {
        /// The diagonal term that made the factorization succeed.
        jitter: f64,
    },
}

impl core::fmt::Display for Warning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NumericalInstability { jitter } => {
                write!(f, "covariance matrix regularized with jitter {jitter:e}")
            }
        }
    }
}
