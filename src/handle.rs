//! A procedural front end over an optional [`Session`].

use crate::error::{Error, Result};
use crate::session::Session;

/// Holds at most one [`Session`] and exposes the four-call interface
/// `init` / `get_parameters_from_slider` / `proceed_optimization` /
/// `get_x_max`.
///
/// Calls made before [`init`](Self::init) fail with
/// `Error::UninitializedSession`. Each handle is independent, so any number
/// of them can coexist.
///
/// # Examples
///
/// ```
/// use sequential_line_search::{Error, SessionHandle};
///
/// let mut sls = SessionHandle::new();
/// assert!(matches!(sls.get_x_max(), Err(Error::UninitializedSession)));
///
/// sls.init(4).unwrap();
/// let a = sls.get_parameters_from_slider(0.0).unwrap();
/// assert_eq!(a.len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    session: Option<Session>,
    seed: Option<u64>,
}

impl SessionHandle {
    /// Creates an empty handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty handle whose sessions use a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            session: None,
            seed: Some(seed),
        }
    }

    /// Starts a new session over `[0, 1]^dimensions`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `dimensions` is zero; the previous
    /// session, if any, is kept.
    pub fn init(&mut self, dimensions: usize) -> Result<()> {
        let builder = Session::builder(dimensions);
        let builder = match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        };
        self.session = Some(builder.build()?);
        Ok(())
    }

    /// Starts tracking an already configured session, replacing any existing one.
    pub fn init_with(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// See [`Session::parameters_from_slider`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UninitializedSession` before `init`, otherwise the
    /// errors of the underlying call.
    pub fn get_parameters_from_slider(&self, position: f64) -> Result<Vec<f64>> {
        self.session()?.parameters_from_slider(position)
    }

    /// See [`Session::proceed_optimization`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UninitializedSession` before `init`, otherwise the
    /// errors of the underlying call.
    pub fn proceed_optimization(&mut self, position: f64) -> Result<()> {
        self.session
            .as_mut()
            .ok_or(Error::UninitializedSession)?
            .proceed_optimization(position)
    }

    /// See [`Session::x_max`].
    ///
    /// # Errors
    ///
    /// Returns `Error::UninitializedSession` before `init`.
    pub fn get_x_max(&self) -> Result<Vec<f64>> {
        Ok(self.session()?.x_max().to_vec())
    }

    /// The underlying session.
    ///
    /// # Errors
    ///
    /// Returns `Error::UninitializedSession` before `init`.
    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::UninitializedSession)
    }

    /// Returns `true` once a session has been started.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }
}
