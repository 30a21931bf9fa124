use std::{fmt, sync::Arc};

use crate::Error;

type StateFn = dyn Fn(&[f64], &[f64]) -> Result<Vec<f64>, Error> + Send + Sync;
type TimedFn = dyn Fn(&[f64], &[f64], f64) -> Result<Vec<f64>, Error> + Send + Sync;

/// A function computing an observed quantity from the current numeric state.
///
/// Observed functions take the state vector `u` and parameter vector `p`,
/// plus the time `t` when they were built for a time-dependent system. They
/// must be pure: the same inputs always give the same outputs.
///
/// Cloning is cheap and the function can be shared across threads.
///
/// ```
/// use symindex_core::ObservedFn;
///
/// let total = ObservedFn::new(|u, p| Ok(vec![u[0] + u[1] + p[0]]));
///
/// assert_eq!(total.call(&[1.0, 2.0], &[0.5], None).unwrap(), vec![3.5]);
/// assert!(total.call(&[1.0, 2.0], &[0.5], Some(0.0)).is_err());
/// ```
#[derive(Clone)]
pub struct ObservedFn(Arity);

#[derive(Clone)]
enum Arity {
    State(Arc<StateFn>),
    Timed(Arc<TimedFn>),
}

impl ObservedFn {
    /// Creates a time-independent observed function `(u, p) -> values`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> Result<Vec<f64>, Error> + Send + Sync + 'static,
    {
        Self(Arity::State(Arc::new(f)))
    }

    /// Creates a time-dependent observed function `(u, p, t) -> values`.
    pub fn timed<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64], f64) -> Result<Vec<f64>, Error> + Send + Sync + 'static,
    {
        Self(Arity::Timed(Arc::new(f)))
    }

    /// Returns `true` if the function takes a time argument.
    #[must_use]
    pub fn is_time_dependent(&self) -> bool {
        matches!(self.0, Arity::Timed(_))
    }

    /// Evaluates the function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTime`] if the function is time dependent and
    /// `t` is `None`, [`Error::UnexpectedTime`] if it is time independent and
    /// `t` is `Some`, or any error raised by the function itself.
    pub fn call(&self, u: &[f64], p: &[f64], t: Option<f64>) -> Result<Vec<f64>, Error> {
        match (&self.0, t) {
            (Arity::State(f), None) => f(u, p),
            (Arity::Timed(f), Some(t)) => f(u, p, t),
            (Arity::State(_), Some(_)) => Err(Error::UnexpectedTime),
            (Arity::Timed(_), None) => Err(Error::MissingTime),
        }
    }

    /// Evaluates a function that computes a single quantity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotScalar`] if the function returns anything other
    /// than exactly one value, or any error [`call`] returns.
    ///
    /// [`call`]: ObservedFn::call
    pub fn call_scalar(&self, u: &[f64], p: &[f64], t: Option<f64>) -> Result<f64, Error> {
        match self.call(u, p, t)?.as_slice() {
            [value] => Ok(*value),
            values => Err(Error::NotScalar { len: values.len() }),
        }
    }
}

impl fmt::Debug for ObservedFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedFn")
            .field("time_dependent", &self.is_time_dependent())
            .finish_non_exhaustive()
    }
}
