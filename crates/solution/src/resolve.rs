use std::fmt::Display;

use symindex_core::{ObservedFn, StateOrder, SymbolicIndexing};

use crate::Error;

/// Where the value of a symbol comes from.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    State(usize),
    Param(usize),
    Time,
    Observed(ObservedFn),
}

impl Source {
    /// Resolves `sym` against `system`, at time index `step` when given.
    pub(crate) fn resolve<S, Sys>(system: &Sys, sym: &S, step: Option<usize>) -> Result<Self, Error>
    where
        S: Clone + Display,
        Sys: SymbolicIndexing<S> + ?Sized,
    {
        let variable = match step {
            Some(i) => system.variable_index_at(sym, i),
            None => system.variable_index(sym),
        };
        if let Some(index) = variable {
            return Ok(Self::State(index));
        }

        let parameter = match step {
            Some(i) => system.parameter_index_at(sym, i),
            None => system.parameter_index(sym),
        };
        if let Some(index) = parameter {
            return Ok(Self::Param(index));
        }

        if system.is_independent_variable(sym) {
            return Ok(Self::Time);
        }

        if system.is_observed(sym) {
            let f = match step {
                Some(i) => system.observed_at(sym, StateOrder::TimeIndex(i))?,
                None => system.observed(sym)?,
            };
            return Ok(Self::Observed(f));
        }

        Err(Error::UnknownSymbol(sym.to_string()))
    }

    /// Reads the value from numeric state.
    ///
    /// `t` is passed to observed functions only if they take it.
    pub(crate) fn eval(&self, u: &[f64], p: &[f64], t: f64) -> Result<f64, Error> {
        match self {
            Self::State(index) => read(u, *index),
            Self::Param(index) => read(p, *index),
            Self::Time => Ok(t),
            Self::Observed(f) => {
                let t = f.is_time_dependent().then_some(t);
                Ok(f.call_scalar(u, p, t)?)
            }
        }
    }
}

fn read(values: &[f64], index: usize) -> Result<f64, Error> {
    values.get(index).copied().ok_or_else(|| {
        Error::Core(symindex_core::Error::OutOfBounds {
            index,
            len: values.len(),
        })
    })
}
