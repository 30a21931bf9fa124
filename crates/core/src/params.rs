//! Parameter access built on the indexing protocol.
//!
//! A context (an integrator, a solution, or a plain vector) exposes its
//! parameter values through [`ParameterValues`]. [`getp`] and [`setp`]
//! resolve a parameter once, against a system handle, and return accessors
//! that read or write that position in any compatible context.
//!
//! Writing requires a live view of the parameter storage. Contexts that can
//! hand out `&mut [Value]` implement [`ParameterValuesMut`] and get
//! [`SetParameter`] for free. Contexts whose storage is only available as a
//! snapshot must implement [`SetParameter`] by hand.

use std::borrow::Cow;

use crate::{Error, SymbolicIndexing};

/// A context that holds parameter values.
pub trait ParameterValues {
    type Value: Clone;

    /// Returns the parameter values, ordered by parameter index.
    fn parameter_values(&self) -> Cow<'_, [Self::Value]>;
}

/// A context whose parameter values can be mutated in place.
pub trait ParameterValuesMut: ParameterValues {
    /// Returns a live, mutable view of the parameter values.
    ///
    /// Writes through the returned slice must be visible to the context afterward.
    fn parameter_values_mut(&mut self) -> &mut [Self::Value];
}

/// A context that supports writing a single parameter.
pub trait SetParameter: ParameterValues {
    /// Writes `value` to the parameter at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not a valid position.
    fn set_parameter(&mut self, index: usize, value: Self::Value) -> Result<(), Error>;
}

impl<C: ParameterValuesMut + ?Sized> SetParameter for C {
    fn set_parameter(&mut self, index: usize, value: Self::Value) -> Result<(), Error> {
        let values = self.parameter_values_mut();
        let len = values.len();
        let slot = values
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }
}

impl<T: Clone> ParameterValues for [T] {
    type Value = T;

    fn parameter_values(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self)
    }
}

impl<T: Clone> ParameterValuesMut for [T] {
    fn parameter_values_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone> ParameterValues for Vec<T> {
    type Value = T;

    fn parameter_values(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self)
    }
}

impl<T: Clone> ParameterValuesMut for Vec<T> {
    fn parameter_values_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, const N: usize> ParameterValues for [T; N] {
    type Value = T;

    fn parameter_values(&self) -> Cow<'_, [T]> {
        Cow::Borrowed(self)
    }
}

impl<T: Clone, const N: usize> ParameterValuesMut for [T; N] {
    fn parameter_values_mut(&mut self) -> &mut [T] {
        self
    }
}

/// Identifies a parameter either by position or by symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterRef<'a, S> {
    /// A direct index into the parameter values.
    Index(usize),

    /// A symbol, resolved with [`SymbolicIndexing::parameter_index`].
    Symbol(&'a S),
}

impl<S> From<usize> for ParameterRef<'_, S> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a, S> From<&'a S> for ParameterRef<'a, S> {
    fn from(sym: &'a S) -> Self {
        Self::Symbol(sym)
    }
}

/// Reads one parameter from a context. Returned by [`getp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterGetter {
    index: usize,
}

impl ParameterGetter {
    /// Returns the resolved parameter index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reads the parameter value from `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the context has too few parameters.
    pub fn get<C: ParameterValues + ?Sized>(&self, context: &C) -> Result<C::Value, Error> {
        let values = context.parameter_values();
        values.get(self.index).cloned().ok_or(Error::OutOfBounds {
            index: self.index,
            len: values.len(),
        })
    }
}

/// Writes one parameter into a context. Returned by [`setp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSetter {
    index: usize,
}

impl ParameterSetter {
    /// Returns the resolved parameter index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Writes `value` to the parameter in `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the context has too few parameters.
    pub fn set<C: SetParameter + ?Sized>(&self, context: &mut C, value: C::Value) -> Result<(), Error> {
        context.set_parameter(self.index, value)
    }
}

/// Returns an accessor that reads the parameter `p` of `system` from a context.
///
/// A symbolic `p` is resolved here, once, so the accessor only holds an index.
///
/// # Errors
///
/// Returns [`Error::NotAParameter`] if `p` is a symbol that is not a
/// parameter of `system`.
pub fn getp<'a, S, Sys, P>(system: &Sys, p: P) -> Result<ParameterGetter, Error>
where
    S: Clone + 'a,
    Sys: SymbolicIndexing<S> + ?Sized,
    P: Into<ParameterRef<'a, S>>,
{
    let index = resolve(system, p.into())?;
    tracing::trace!(index, "resolved parameter getter");
    Ok(ParameterGetter { index })
}

/// Returns an accessor that writes the parameter `p` of `system` into a context.
///
/// The context must implement [`SetParameter`], which every
/// [`ParameterValuesMut`] context does.
///
/// # Errors
///
/// Returns [`Error::NotAParameter`] if `p` is a symbol that is not a
/// parameter of `system`.
pub fn setp<'a, S, Sys, P>(system: &Sys, p: P) -> Result<ParameterSetter, Error>
where
    S: Clone + 'a,
    Sys: SymbolicIndexing<S> + ?Sized,
    P: Into<ParameterRef<'a, S>>,
{
    let index = resolve(system, p.into())?;
    tracing::trace!(index, "resolved parameter setter");
    Ok(ParameterSetter { index })
}

fn resolve<S, Sys>(system: &Sys, p: ParameterRef<'_, S>) -> Result<usize, Error>
where
    S: Clone,
    Sys: SymbolicIndexing<S> + ?Sized,
{
    match p {
        ParameterRef::Index(index) => Ok(index),
        ParameterRef::Symbol(sym) => system.parameter_index(sym).ok_or(Error::NotAParameter),
    }
}
