use std::borrow::Cow;

use symindex_core::{
    Error, Name, ObservedFn, StateOrder, SymbolCache, SymbolicIndexing, getp, setp,
};

fn n(name: &str) -> Name {
    Name::from(name)
}

fn cache() -> SymbolCache {
    SymbolCache::from_parts(
        [n("x"), n("y"), n("z")],
        [n("a"), n("b")],
        [n("t")],
    )
}

/// Forwards everything to its inner handle.
struct Wrapper<T> {
    inner: T,
}

impl<T: SymbolicIndexing<Name>> SymbolicIndexing<Name> for Wrapper<T> {
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<Name>> {
        Some(&self.inner)
    }
}

/// Adds a single observed quantity `x + y` on top of its inner handle.
struct WithSum<T> {
    inner: T,
}

impl<T: SymbolicIndexing<Name>> SymbolicIndexing<Name> for WithSum<T> {
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<Name>> {
        Some(&self.inner)
    }

    fn is_observed(&self, sym: &Name) -> bool {
        sym == "sum"
    }

    fn observed(&self, sym: &Name) -> Result<ObservedFn, Error> {
        if sym != "sum" {
            return self.inner.observed(sym);
        }
        let x = self.variable_index(&n("x")).unwrap();
        let y = self.variable_index(&n("y")).unwrap();
        Ok(ObservedFn::timed(move |u, _, _| Ok(vec![u[x] + u[y]])))
    }

    fn all_solvable_symbols(&self) -> Cow<'_, [Name]> {
        let mut all = self.variable_symbols().into_owned();
        all.push(n("sum"));
        Cow::Owned(all)
    }
}

#[test]
fn a_delegating_chain_answers_like_its_end() {
    let base = cache();
    let chain = Wrapper {
        inner: Wrapper { inner: cache() },
    };
    let symbols = ["x", "y", "z", "a", "b", "t", "w", ""].map(n);

    for sym in &symbols {
        assert_eq!(chain.is_variable(sym), base.is_variable(sym));
        assert_eq!(chain.variable_index(sym), base.variable_index(sym));
        assert_eq!(chain.variable_index_at(sym, 4), base.variable_index_at(sym, 4));
        assert_eq!(chain.is_parameter(sym), base.is_parameter(sym));
        assert_eq!(chain.parameter_index(sym), base.parameter_index(sym));
        assert_eq!(
            chain.is_independent_variable(sym),
            base.is_independent_variable(sym)
        );
        assert_eq!(chain.is_observed(sym), base.is_observed(sym));
    }
    assert_eq!(chain.variable_symbols(), base.variable_symbols());
    assert_eq!(chain.parameter_symbols(), base.parameter_symbols());
    assert_eq!(
        chain.independent_variable_symbols(),
        base.independent_variable_symbols()
    );
    assert_eq!(chain.all_solvable_symbols(), base.all_solvable_symbols());
    assert_eq!(chain.all_symbols(), base.all_symbols());
    assert_eq!(chain.is_time_dependent(), base.is_time_dependent());
    assert_eq!(chain.constant_structure(), base.constant_structure());
}

#[test]
fn an_override_in_the_middle_of_a_chain_is_seen_from_the_top() {
    let chain = Wrapper {
        inner: WithSum { inner: cache() },
    };

    assert!(chain.is_observed(&n("sum")));
    assert!(!chain.is_observed(&n("x")));
    assert_eq!(
        chain.all_solvable_symbols().as_ref(),
        ["x", "y", "z", "sum"].map(n)
    );

    let f = chain.observed(&n("sum")).unwrap();
    assert!(f.is_time_dependent());
    assert_eq!(f.call(&[1.0, 2.0, 4.0], &[], Some(0.0)).unwrap(), vec![3.0]);
}

#[test]
fn unsupported_observed_reaches_the_caller() {
    let chain = Wrapper {
        inner: WithSum { inner: cache() },
    };

    assert!(matches!(
        chain.observed(&n("x")),
        Err(Error::Unsupported {
            operation: "observed"
        })
    ));
    assert!(matches!(
        chain.observed_at(&n("x"), StateOrder::TimeIndex(0)),
        Err(Error::Unsupported {
            operation: "observed"
        })
    ));
}

#[test]
fn overriding_observed_alone_serves_observed_at() {
    let direct = WithSum { inner: cache() };
    let chain = Wrapper {
        inner: WithSum { inner: cache() },
    };
    let order = [n("y"), n("x"), n("z")];

    let handles: [&dyn SymbolicIndexing<Name>; 2] = [&direct, &chain];

    for handle in handles {
        assert!(handle.constant_structure());
        assert!(handle.is_observed(&n("sum")));

        let at_index = handle
            .observed_at(&n("sum"), StateOrder::TimeIndex(3))
            .unwrap();
        let at_symbols = handle
            .observed_at(&n("sum"), StateOrder::Symbols(&order))
            .unwrap();

        assert_eq!(at_index.call(&[1.0, 2.0, 4.0], &[], Some(0.0)).unwrap(), vec![3.0]);
        assert_eq!(at_symbols.call(&[1.0, 2.0, 4.0], &[], Some(0.0)).unwrap(), vec![3.0]);
    }
}

#[test]
fn parameter_accessors_resolve_through_the_chain() {
    let chain = Wrapper {
        inner: Wrapper { inner: cache() },
    };
    let mut values = vec![1.0, 2.0];

    setp(&chain, &n("b")).unwrap().set(&mut values, 7.0).unwrap();

    assert_eq!(getp(&chain, &n("b")).unwrap().get(&values).unwrap(), 7.0);
    assert!(matches!(getp(&chain, &n("x")), Err(Error::NotAParameter)));
}
