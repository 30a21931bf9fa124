use std::{borrow::Cow, fmt::Display};

use symindex_core::{ParameterValues, ParameterValuesMut, SymbolicIndexing};

use crate::{Error, resolve::Source};

/// The live state of an integrator stepping a system.
///
/// An `Integrator` owns the current state vector `u`, parameter vector `p`,
/// and time `t`, and counts the steps taken so far. For systems without
/// constant structure that count is the time index used to find symbols.
/// It answers every protocol query by delegating to its
/// system, so solvers can treat it as the system itself:
///
/// ```
/// use symindex_core::{Name, SymbolCache, SymbolicIndexing, getp, setp};
/// use symindex_solution::Integrator;
///
/// let sys = SymbolCache::new([Name::from("x")])
///     .with_parameters([Name::from("k")])
///     .with_independent_variable(Name::from("t"));
/// let mut integrator = Integrator::new(sys, vec![1.0], vec![0.5], 0.0);
///
/// assert!(integrator.is_independent_variable(&Name::from("t")));
///
/// let k = Name::from("k");
/// let setter = setp(&integrator, &k).unwrap();
/// setter.set(&mut integrator, 2.0).unwrap();
/// assert_eq!(getp(&integrator, &k).unwrap().get(&integrator).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct Integrator<Sys> {
    system: Sys,
    u: Vec<f64>,
    p: Vec<f64>,
    t: f64,
    step: usize,
}

impl<Sys> Integrator<Sys> {
    /// Creates an integrator at state `u`, parameters `p`, and time `t`.
    ///
    /// The integrator starts at time index 0.
    pub fn new(system: Sys, u: Vec<f64>, p: Vec<f64>, t: f64) -> Self {
        Self {
            system,
            u,
            p,
            t,
            step: 0,
        }
    }

    #[must_use]
    pub fn system(&self) -> &Sys {
        &self.system
    }

    /// Returns the current state vector.
    #[must_use]
    pub fn state(&self) -> &[f64] {
        &self.u
    }

    /// Returns the current state vector for in-place updates.
    pub fn state_mut(&mut self) -> &mut [f64] {
        &mut self.u
    }

    /// Returns the current parameter vector.
    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.p
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Returns the time index, the number of completed calls to [`step_to`].
    ///
    /// [`step_to`]: Integrator::step_to
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Advances to time `t` with state `u` and moves to the next time index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `u` has a different length than
    /// the current state, which is left unchanged.
    pub fn step_to(&mut self, t: f64, u: Vec<f64>) -> Result<(), Error> {
        if u.len() != self.u.len() {
            return Err(Error::LengthMismatch {
                expected: self.u.len(),
                found: u.len(),
            });
        }
        self.t = t;
        self.u = u;
        self.step += 1;
        Ok(())
    }

    /// Returns the current value of `sym`.
    ///
    /// `sym` can be a variable, parameter, independent variable, or
    /// observed quantity of the system. Observed quantities must compute a
    /// single value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the system does not know `sym` at
    /// the current time index, or an error raised while building or
    /// evaluating an observed function.
    pub fn get<S>(&self, sym: &S) -> Result<f64, Error>
    where
        S: Clone + Display,
        Sys: SymbolicIndexing<S>,
    {
        let step = self.time_index::<S>();
        Source::resolve(&self.system, sym, step)?.eval(&self.u, &self.p, self.t)
    }

    /// Overwrites the current value of the variable `sym`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAVariable`] if `sym` is not a variable of the
    /// system, or an out-of-bounds error if the state is too short.
    pub fn set_state<S>(&mut self, sym: &S, value: f64) -> Result<(), Error>
    where
        S: Clone + Display,
        Sys: SymbolicIndexing<S>,
    {
        let index = match self.time_index::<S>() {
            Some(i) => self.system.variable_index_at(sym, i),
            None => self.system.variable_index(sym),
        }
        .ok_or_else(|| Error::NotAVariable(sym.to_string()))?;
        let len = self.u.len();
        let slot = self
            .u
            .get_mut(index)
            .ok_or(symindex_core::Error::OutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// The time index to resolve symbols at, if the system needs one.
    fn time_index<S>(&self) -> Option<usize>
    where
        S: Clone,
        Sys: SymbolicIndexing<S>,
    {
        (!self.system.constant_structure()).then_some(self.step)
    }
}

impl<S: Clone, Sys: SymbolicIndexing<S>> SymbolicIndexing<S> for Integrator<Sys> {
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<S>> {
        Some(&self.system)
    }
}

impl<Sys> ParameterValues for Integrator<Sys> {
    type Value = f64;

    fn parameter_values(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(&self.p)
    }
}

impl<Sys> ParameterValuesMut for Integrator<Sys> {
    fn parameter_values_mut(&mut self) -> &mut [f64] {
        &mut self.p
    }
}
