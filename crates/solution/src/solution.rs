use std::{borrow::Cow, fmt::Display};

use symindex_core::{ParameterValues, SymbolicIndexing};

use crate::{Error, resolve::Source};

/// A saved trajectory of a system.
///
/// A `Solution` holds one state vector per saved step, the time of each
/// step, and the parameter values the trajectory was computed with. Like
/// [`Integrator`], it delegates every protocol query to its system.
///
/// Parameters are a read-only snapshot: a solution implements
/// [`ParameterValues`] but not [`ParameterValuesMut`], so `getp` works on
/// it and `setp` does not.
///
/// [`Integrator`]: crate::Integrator
/// [`ParameterValuesMut`]: symindex_core::ParameterValuesMut
#[derive(Debug, Clone)]
pub struct Solution<Sys> {
    system: Sys,
    t: Vec<f64>,
    u: Vec<Vec<f64>>,
    p: Vec<f64>,
}

impl<Sys> Solution<Sys> {
    /// Creates a solution from matching time and state series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `t` and `u` have different lengths.
    pub fn new(system: Sys, t: Vec<f64>, u: Vec<Vec<f64>>, p: Vec<f64>) -> Result<Self, Error> {
        if t.len() != u.len() {
            return Err(Error::LengthMismatch {
                expected: t.len(),
                found: u.len(),
            });
        }
        tracing::trace!(steps = t.len(), "created solution");
        Ok(Self { system, t, u, p })
    }

    /// Appends a saved step.
    pub fn push(&mut self, t: f64, u: Vec<f64>) {
        self.t.push(t);
        self.u.push(u);
    }

    #[must_use]
    pub fn system(&self) -> &Sys {
        &self.system
    }

    /// Returns the number of saved steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Returns the time of every saved step.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    /// Returns the state vector saved at step `i`, if there is one.
    #[must_use]
    pub fn state(&self, i: usize) -> Option<&[f64]> {
        self.u.get(i).map(Vec::as_slice)
    }

    /// Returns the value of `sym` at step `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepOutOfRange`] if there is no step `i`,
    /// [`Error::UnknownSymbol`] if the system does not know `sym`, or an
    /// error raised while building or evaluating an observed function.
    pub fn value_at<S>(&self, sym: &S, i: usize) -> Result<f64, Error>
    where
        S: Clone + Display,
        Sys: SymbolicIndexing<S>,
    {
        let u = self.state(i).ok_or(Error::StepOutOfRange {
            index: i,
            len: self.len(),
        })?;
        let step = (!self.system.constant_structure()).then_some(i);
        Source::resolve(&self.system, sym, step)?.eval(u, &self.p, self.t[i])
    }

    /// Returns the value of `sym` at every saved step.
    ///
    /// For a system with constant structure, `sym` is resolved once and the
    /// same index or observed function is reused at every step. Otherwise it
    /// is resolved again at each step, using that step's time index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the system does not know `sym`,
    /// or an error raised while building or evaluating an observed function.
    pub fn series<S>(&self, sym: &S) -> Result<Vec<f64>, Error>
    where
        S: Clone + Display,
        Sys: SymbolicIndexing<S>,
    {
        if self.system.constant_structure() {
            let source = Source::resolve(&self.system, sym, None)?;
            tracing::debug!(%sym, steps = self.len(), "evaluating series");
            return self
                .t
                .iter()
                .zip(&self.u)
                .map(|(&t, u)| source.eval(u, &self.p, t))
                .collect();
        }

        tracing::debug!(%sym, steps = self.len(), "evaluating series per step");
        self.t
            .iter()
            .zip(&self.u)
            .enumerate()
            .map(|(i, (&t, u))| Source::resolve(&self.system, sym, Some(i))?.eval(u, &self.p, t))
            .collect()
    }
}

impl<S: Clone, Sys: SymbolicIndexing<S>> SymbolicIndexing<S> for Solution<Sys> {
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<S>> {
        Some(&self.system)
    }
}

impl<Sys> ParameterValues for Solution<Sys> {
    type Value = f64;

    fn parameter_values(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(&self.p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use symindex_core::{Name, SymbolCache, getp};
    use symindex_observed::{Expr, ObservedSystem};

    fn n(name: &str) -> Name {
        Name::from(name)
    }

    /// Exponential decay `x(t) = exp(-k t)` sampled at three steps.
    fn decay() -> Solution<ObservedSystem> {
        let cache = SymbolCache::new([n("x")])
            .with_parameters([n("k")])
            .with_independent_variable(n("t"));
        let rate: Expr = -Expr::sym("k") * Expr::sym("x");
        let sys = ObservedSystem::new(cache, [(n("dx"), rate)]).unwrap();

        let t = vec![0.0, 1.0, 2.0];
        let u = t.iter().map(|t: &f64| vec![(-0.5 * t).exp()]).collect();
        Solution::new(sys, t, u, vec![0.5]).unwrap()
    }

    /// A system whose two variables swap places at every odd step.
    struct Swapping {
        inner: SymbolCache,
    }

    impl SymbolicIndexing<Name> for Swapping {
        fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<Name>> {
            Some(&self.inner)
        }

        fn variable_index_at(&self, sym: &Name, i: usize) -> Option<usize> {
            let index = self.inner.variable_index(sym)?;
            Some(if i % 2 == 1 { 1 - index } else { index })
        }

        fn constant_structure(&self) -> bool {
            false
        }
    }

    #[test]
    fn series_of_a_variable() {
        let sol = decay();

        let x = sol.series(&n("x")).unwrap();

        assert_eq!(x.len(), 3);
        assert_relative_eq!(x[2], (-1.0_f64).exp());
    }

    #[test]
    fn series_of_time_and_parameters() {
        let sol = decay();

        assert_eq!(sol.series(&n("t")).unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(sol.series(&n("k")).unwrap(), vec![0.5; 3]);
    }

    #[test]
    fn series_of_an_observed_quantity() {
        let sol = decay();

        let rates = sol.series(&n("dx")).unwrap();
        let states = sol.series(&n("x")).unwrap();

        for (rate, x) in rates.iter().zip(&states) {
            assert_relative_eq!(*rate, -0.5 * x);
        }
    }

    #[test]
    fn parameters_are_a_snapshot() {
        let sol = decay();

        assert_relative_eq!(getp(&sol, &n("k")).unwrap().get(&sol).unwrap(), 0.5);
    }

    #[test]
    fn values_at_single_steps() {
        let sol = decay();

        assert_relative_eq!(sol.value_at(&n("t"), 1).unwrap(), 1.0);
        assert!(matches!(
            sol.value_at(&n("x"), 3),
            Err(Error::StepOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn non_constant_structure_resolves_each_step() {
        let sys = Swapping {
            inner: SymbolCache::new([n("a"), n("b")]),
        };
        let u = vec![vec![1.0, 10.0], vec![20.0, 2.0], vec![3.0, 30.0]];
        let sol = Solution::new(sys, vec![0.0, 0.1, 0.2], u, vec![]).unwrap();

        assert_eq!(sol.series(&n("a")).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(sol.series(&n("b")).unwrap(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = Solution::new(SymbolCache::new([n("x")]), vec![0.0, 1.0], vec![vec![1.0]], vec![]);

        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 2,
                found: 1
            })
        ));
    }
}
