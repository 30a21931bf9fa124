use std::{borrow::Cow, rc::Rc, sync::Arc};

use crate::{Error, ObservedFn};

/// The symbolic indexing protocol.
///
/// A system handle implements this trait to let solvers, integrators, and
/// solutions query its variables, parameters, independent variables, and
/// observed quantities by symbol.
///
/// ## Delegation
///
/// Every method has a default implementation that forwards the call to
/// [`symbolic_container()`], so a wrapper around an object that already
/// implements the protocol only needs to return that object:
///
/// ```
/// use symindex_core::{Name, SymbolCache, SymbolicIndexing};
///
/// struct Wrapper {
///     inner: SymbolCache,
/// }
///
/// impl SymbolicIndexing<Name> for Wrapper {
///     fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<Name>> {
///         Some(&self.inner)
///     }
/// }
///
/// let w = Wrapper {
///     inner: SymbolCache::new(["x", "y"].map(Name::from)),
/// };
/// assert_eq!(w.variable_index(&Name::from("y")), Some(1));
/// ```
///
/// Methods can be overridden selectively; the rest keep forwarding. When
/// there is no container (the default), each method returns its terminal
/// value: `false`, `None`, an empty list, or [`Error::Unsupported`] for
/// [`observed()`]. Container chains must be finite.
///
/// ## Constant structure
///
/// When [`constant_structure()`] is `false`, variable and parameter indices
/// may change over time and callers use the `*_at` methods, which take the
/// current time index. Without a container, the `*_at` methods ignore the
/// time index and call their plain counterparts. With constant structure,
/// [`observed_at()`] answers like [`observed()`] unless the container defines
/// the quantity itself.
///
/// ## Misses
///
/// Unknown symbols are a normal outcome: predicates return `false` and index
/// lookups return `None`.
///
/// [`symbolic_container()`]: SymbolicIndexing::symbolic_container
/// [`constant_structure()`]: SymbolicIndexing::constant_structure
/// [`observed()`]: SymbolicIndexing::observed
/// [`observed_at()`]: SymbolicIndexing::observed_at
pub trait SymbolicIndexing<S: Clone> {
    /// Returns the object this handle forwards unimplemented calls to.
    ///
    /// Returns `None` if the handle does not delegate.
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<S>> {
        None
    }

    /// Checks whether `sym` is a variable of the system.
    fn is_variable(&self, sym: &S) -> bool {
        self.symbolic_container()
            .is_some_and(|c| c.is_variable(sym))
    }

    /// Returns the index of the variable `sym`, or `None` if it is not a variable.
    fn variable_index(&self, sym: &S) -> Option<usize> {
        self.symbolic_container()
            .and_then(|c| c.variable_index(sym))
    }

    /// Returns the index of the variable `sym` at time index `i`.
    fn variable_index_at(&self, sym: &S, i: usize) -> Option<usize> {
        match self.symbolic_container() {
            Some(c) => c.variable_index_at(sym, i),
            None => self.variable_index(sym),
        }
    }

    /// Returns the variables in solve order.
    fn variable_symbols(&self) -> Cow<'_, [S]> {
        self.symbolic_container()
            .map_or_else(empty, |c| c.variable_symbols())
    }

    /// Returns the variables in solve order at time index `i`.
    fn variable_symbols_at(&self, i: usize) -> Cow<'_, [S]> {
        match self.symbolic_container() {
            Some(c) => c.variable_symbols_at(i),
            None => self.variable_symbols(),
        }
    }

    /// Checks whether `sym` is a parameter of the system.
    fn is_parameter(&self, sym: &S) -> bool {
        self.symbolic_container()
            .is_some_and(|c| c.is_parameter(sym))
    }

    /// Returns the index of the parameter `sym`, or `None` if it is not a parameter.
    fn parameter_index(&self, sym: &S) -> Option<usize> {
        self.symbolic_container()
            .and_then(|c| c.parameter_index(sym))
    }

    /// Returns the index of the parameter `sym` at time index `i`.
    fn parameter_index_at(&self, sym: &S, i: usize) -> Option<usize> {
        match self.symbolic_container() {
            Some(c) => c.parameter_index_at(sym, i),
            None => self.parameter_index(sym),
        }
    }

    /// Returns the parameters in index order.
    fn parameter_symbols(&self) -> Cow<'_, [S]> {
        self.symbolic_container()
            .map_or_else(empty, |c| c.parameter_symbols())
    }

    /// Returns the parameters in index order at time index `i`.
    fn parameter_symbols_at(&self, i: usize) -> Cow<'_, [S]> {
        match self.symbolic_container() {
            Some(c) => c.parameter_symbols_at(i),
            None => self.parameter_symbols(),
        }
    }

    /// Checks whether `sym` is an independent variable of the system.
    fn is_independent_variable(&self, sym: &S) -> bool {
        self.symbolic_container()
            .is_some_and(|c| c.is_independent_variable(sym))
    }

    /// Returns the independent variables, which may be empty.
    fn independent_variable_symbols(&self) -> Cow<'_, [S]> {
        self.symbolic_container()
            .map_or_else(empty, |c| c.independent_variable_symbols())
    }

    /// Checks whether `sym` is an observed quantity: computable from the
    /// variables, parameters, and independent variables but not stored.
    fn is_observed(&self, sym: &S) -> bool {
        self.symbolic_container()
            .is_some_and(|c| c.is_observed(sym))
    }

    /// Returns a function computing the observed quantity `sym`.
    ///
    /// The function takes the state and parameter vectors, plus the time
    /// when the system [`is_time_dependent()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if no handle in the container chain
    /// implements observed quantities, or any error raised while building
    /// the function.
    ///
    /// [`is_time_dependent()`]: SymbolicIndexing::is_time_dependent
    fn observed(&self, sym: &S) -> Result<ObservedFn, Error> {
        match self.symbolic_container() {
            Some(c) => c.observed(sym),
            None => Err(Error::unsupported("observed")),
        }
    }

    /// Returns a function computing the observed quantity `sym` for a given
    /// state ordering.
    ///
    /// Systems without constant structure need to know how the state vector
    /// is laid out, either as an explicit list of variables or as a time index.
    ///
    /// With constant structure, the default forwards to the container only
    /// when the container itself declares `sym` observed, so an explicit
    /// symbol list still reaches the handle that defines the quantity.
    /// Otherwise it calls [`observed()`] on this handle, which keeps an
    /// override of [`observed()`] alone visible here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the system's structure is not
    /// constant and no handle in the container chain implements this method.
    ///
    /// [`observed()`]: SymbolicIndexing::observed
    fn observed_at(&self, sym: &S, order: StateOrder<'_, S>) -> Result<ObservedFn, Error> {
        let container = self.symbolic_container();
        if !self.constant_structure() {
            return match container {
                Some(c) => c.observed_at(sym, order),
                None => Err(Error::unsupported("observed_at")),
            };
        }
        match container {
            Some(c) if c.is_observed(sym) => c.observed_at(sym, order),
            _ => self.observed(sym),
        }
    }

    /// Checks whether the system has at least one independent variable.
    fn is_time_dependent(&self) -> bool {
        match self.symbolic_container() {
            Some(c) => c.is_time_dependent(),
            None => !self.independent_variable_symbols().is_empty(),
        }
    }

    /// Checks whether the set and indexing of variables and parameters is fixed.
    fn constant_structure(&self) -> bool {
        self.symbolic_container()
            .is_none_or(|c| c.constant_structure())
    }

    /// Returns every symbol that can be solved for: variables and observed
    /// quantities, but not parameters or independent variables.
    fn all_solvable_symbols(&self) -> Cow<'_, [S]> {
        match self.symbolic_container() {
            Some(c) => c.all_solvable_symbols(),
            None => self.variable_symbols(),
        }
    }

    /// Returns every symbol of the system: the solvable symbols, then the
    /// parameters, then the independent variables.
    fn all_symbols(&self) -> Cow<'_, [S]> {
        match self.symbolic_container() {
            Some(c) => c.all_symbols(),
            None => {
                let mut all = self.all_solvable_symbols().into_owned();
                all.extend_from_slice(&self.parameter_symbols());
                all.extend_from_slice(&self.independent_variable_symbols());
                Cow::Owned(all)
            }
        }
    }
}

fn empty<'a, S: Clone>() -> Cow<'a, [S]> {
    Cow::Owned(Vec::new())
}

/// How the state vector is laid out, for systems without constant structure.
#[derive(Debug, PartialEq, Eq)]
pub enum StateOrder<'a, S> {
    /// The state vector holds these variables, in this order.
    Symbols(&'a [S]),

    /// The state vector is laid out as it was at this time index.
    TimeIndex(usize),
}

// Manual impls so the order is `Copy` for any symbol type.
impl<S> Clone for StateOrder<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StateOrder<'_, S> {}

macro_rules! forward_indexing {
    ($($ptr:ty),* $(,)?) => {$(
        impl<S: Clone, T: SymbolicIndexing<S> + ?Sized> SymbolicIndexing<S> for $ptr {
            fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<S>> {
                (**self).symbolic_container()
            }
            fn is_variable(&self, sym: &S) -> bool {
                (**self).is_variable(sym)
            }
            fn variable_index(&self, sym: &S) -> Option<usize> {
                (**self).variable_index(sym)
            }
            fn variable_index_at(&self, sym: &S, i: usize) -> Option<usize> {
                (**self).variable_index_at(sym, i)
            }
            fn variable_symbols(&self) -> Cow<'_, [S]> {
                (**self).variable_symbols()
            }
            fn variable_symbols_at(&self, i: usize) -> Cow<'_, [S]> {
                (**self).variable_symbols_at(i)
            }
            fn is_parameter(&self, sym: &S) -> bool {
                (**self).is_parameter(sym)
            }
            fn parameter_index(&self, sym: &S) -> Option<usize> {
                (**self).parameter_index(sym)
            }
            fn parameter_index_at(&self, sym: &S, i: usize) -> Option<usize> {
                (**self).parameter_index_at(sym, i)
            }
            fn parameter_symbols(&self) -> Cow<'_, [S]> {
                (**self).parameter_symbols()
            }
            fn parameter_symbols_at(&self, i: usize) -> Cow<'_, [S]> {
                (**self).parameter_symbols_at(i)
            }
            fn is_independent_variable(&self, sym: &S) -> bool {
                (**self).is_independent_variable(sym)
            }
            fn independent_variable_symbols(&self) -> Cow<'_, [S]> {
                (**self).independent_variable_symbols()
            }
            fn is_observed(&self, sym: &S) -> bool {
                (**self).is_observed(sym)
            }
            fn observed(&self, sym: &S) -> Result<ObservedFn, Error> {
                (**self).observed(sym)
            }
            fn observed_at(&self, sym: &S, order: StateOrder<'_, S>) -> Result<ObservedFn, Error> {
                (**self).observed_at(sym, order)
            }
            fn is_time_dependent(&self) -> bool {
                (**self).is_time_dependent()
            }
            fn constant_structure(&self) -> bool {
                (**self).constant_structure()
            }
            fn all_solvable_symbols(&self) -> Cow<'_, [S]> {
                (**self).all_solvable_symbols()
            }
            fn all_symbols(&self) -> Cow<'_, [S]> {
                (**self).all_symbols()
            }
        }
    )*};
}

forward_indexing!(&T, Box<T>, Rc<T>, Arc<T>);

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Name, SymbolCache};

    fn n(s: &str) -> Name {
        Name::from(s)
    }

    /// A handle that implements nothing and has no container.
    struct Bare;

    impl SymbolicIndexing<Name> for Bare {}

    /// A handle that lists its symbols but relies on the defaults for the rest.
    struct Listing;

    impl SymbolicIndexing<Name> for Listing {
        fn variable_symbols(&self) -> Cow<'_, [Name]> {
            Cow::Owned(vec![n("x")])
        }

        fn parameter_symbols(&self) -> Cow<'_, [Name]> {
            Cow::Owned(vec![n("k")])
        }

        fn independent_variable_symbols(&self) -> Cow<'_, [Name]> {
            Cow::Owned(vec![n("t")])
        }
    }

    /// A wrapper that forwards everything except `is_observed`.
    struct NoObserved {
        inner: SymbolCache,
    }

    impl SymbolicIndexing<Name> for NoObserved {
        fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<Name>> {
            Some(&self.inner)
        }

        fn is_observed(&self, _sym: &Name) -> bool {
            false
        }
    }

    #[test]
    fn terminal_defaults() {
        let bare = Bare;

        assert!(!bare.is_variable(&n("x")));
        assert!(!bare.is_parameter(&n("x")));
        assert!(!bare.is_independent_variable(&n("x")));
        assert!(!bare.is_observed(&n("x")));
        assert_eq!(bare.variable_index(&n("x")), None);
        assert_eq!(bare.variable_index_at(&n("x"), 3), None);
        assert_eq!(bare.parameter_index(&n("x")), None);
        assert!(bare.variable_symbols().is_empty());
        assert!(bare.all_symbols().is_empty());
        assert!(!bare.is_time_dependent());
        assert!(bare.constant_structure());
        assert!(matches!(
            bare.observed(&n("x")),
            Err(Error::Unsupported {
                operation: "observed"
            })
        ));
    }

    #[test]
    fn derived_defaults_use_the_listed_symbols() {
        let sys = Listing;

        assert!(sys.is_time_dependent());
        assert_eq!(sys.all_solvable_symbols().as_ref(), &[n("x")]);
        assert_eq!(sys.all_symbols().as_ref(), &[n("x"), n("k"), n("t")]);
        assert_eq!(sys.variable_symbols_at(7).as_ref(), &[n("x")]);
    }

    #[test]
    fn wrapper_forwards_and_overrides() {
        let w = NoObserved {
            inner: SymbolCache::new([n("x"), n("y")])
                .with_parameters([n("a")])
                .with_independent_variable(n("t")),
        };

        assert!(w.is_variable(&n("x")));
        assert_eq!(w.variable_index(&n("y")), Some(1));
        assert_eq!(w.parameter_index(&n("a")), Some(0));
        assert!(w.is_independent_variable(&n("t")));
        assert!(w.is_time_dependent());
        assert!(!w.is_observed(&n("x")));
        assert_eq!(
            w.all_symbols().as_ref(),
            &[n("x"), n("y"), n("a"), n("t")]
        );
    }

    #[test]
    fn observed_at_falls_back_for_constant_structure() {
        let cache = SymbolCache::new([n("x")]);

        let err = cache
            .observed_at(&n("x"), StateOrder::TimeIndex(0))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Unsupported {
                operation: "observed"
            }
        ));
    }

    #[test]
    fn smart_pointers_forward() {
        let cache = SymbolCache::new([n("x")]).with_parameters([n("p")]);
        let shared = Arc::new(cache.clone());
        let boxed: Box<dyn SymbolicIndexing<Name>> = Box::new(cache);

        assert_eq!(shared.parameter_index(&n("p")), Some(0));
        assert_eq!(boxed.variable_index(&n("x")), Some(0));
        assert_eq!((&boxed).variable_index(&n("p")), None);
    }
}
