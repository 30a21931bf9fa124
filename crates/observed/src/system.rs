use std::{
    borrow::Cow,
    collections::HashMap,
    fmt::{self, Display},
    hash::Hash,
};

use petgraph::{
    algo::toposort,
    graph::{DiGraph, NodeIndex},
};
use symindex_core::{Error, Name, ObservedFn, StateOrder, SymbolCache, SymbolicIndexing};

use crate::{BuildError, Expr, build};

/// A system with named observed quantities defined by expressions.
///
/// An `ObservedSystem` pairs a [`SymbolCache`] of variables, parameters, and
/// independent variables with a list of equations `name = expr`. Each
/// equation's expression may refer to any symbol of the cache or to another
/// equation, as long as no equation depends on itself.
///
/// The system implements the protocol twice:
///
/// - over names `N`, where the observed quantities are the equation names
/// - over expressions [`Expr<N>`], where a bare symbol behaves like its name
///   and any other expression over known symbols is an observed quantity
///
/// ```
/// use symindex_core::{Name, SymbolCache, SymbolicIndexing};
/// use symindex_observed::{Expr, ObservedSystem};
///
/// let cache = SymbolCache::new([Name::from("x")]).with_parameters([Name::from("k")]);
/// let energy: Expr = 0.5 * Expr::sym("k") * Expr::sym("x").powf(2.0);
/// let sys = ObservedSystem::new(cache, [(Name::from("E"), energy)]).unwrap();
///
/// let f = sys.observed(&Name::from("E")).unwrap();
/// assert_eq!(f.call(&[2.0], &[3.0], None).unwrap(), vec![6.0]);
///
/// let doubled: Expr = 2.0 * Expr::sym("E");
/// let twice = sys.observed(&doubled).unwrap();
/// assert_eq!(twice.call(&[2.0], &[3.0], None).unwrap(), vec![12.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ObservedSystem<N = Name> {
    symbols: SymbolCache<N>,
    equations: Vec<(N, Expr<N>)>,
    lookup: HashMap<N, usize>,
    order: Vec<usize>,
    solvable: Vec<N>,
    lifted: Lifted<N>,
}

/// The symbol lists of the system, as expressions.
#[derive(Debug, Clone)]
struct Lifted<N> {
    variables: Vec<Expr<N>>,
    parameters: Vec<Expr<N>>,
    independent_variables: Vec<Expr<N>>,
    solvable: Vec<Expr<N>>,
}

impl<N: Clone> Lifted<N> {
    fn new(symbols: &SymbolCache<N>, solvable: &[N]) -> Self
    where
        N: Eq + Hash,
    {
        let lift = |list: &[N]| -> Vec<Expr<N>> { list.iter().cloned().map(Expr::Sym).collect() };
        Self {
            variables: lift(symbols.variables()),
            parameters: lift(symbols.parameters()),
            independent_variables: lift(symbols.independent_variables()),
            solvable: lift(solvable),
        }
    }
}

impl<N> ObservedSystem<N>
where
    N: Eq + Hash + Clone + Display,
{
    /// Creates a system from its symbols and observed equations.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if an equation name is already a symbol of
    /// `symbols` or another equation, if an expression refers to an unknown
    /// symbol, or if the equations are cyclic.
    pub fn new(
        symbols: SymbolCache<N>,
        equations: impl IntoIterator<Item = (N, Expr<N>)>,
    ) -> Result<Self, BuildError> {
        let equations: Vec<_> = equations.into_iter().collect();

        let mut lookup = HashMap::with_capacity(equations.len());
        for (index, (name, _)) in equations.iter().enumerate() {
            let taken = symbols.is_variable(name)
                || symbols.is_parameter(name)
                || symbols.is_independent_variable(name);
            if taken || lookup.insert(name.clone(), index).is_some() {
                return Err(BuildError::Conflict(name.to_string()));
            }
        }

        for (_, expr) in &equations {
            for sym in expr.free_symbols() {
                let known = symbols.is_variable(sym)
                    || symbols.is_parameter(sym)
                    || symbols.is_independent_variable(sym)
                    || lookup.contains_key(sym);
                if !known {
                    return Err(BuildError::Unresolved(sym.to_string()));
                }
            }
        }

        let order = evaluation_order(&equations, &lookup)?;

        let solvable: Vec<N> = symbols
            .variables()
            .iter()
            .chain(equations.iter().map(|(name, _)| name))
            .cloned()
            .collect();
        let lifted = Lifted::new(&symbols, &solvable);

        tracing::debug!(
            variables = symbols.variables().len(),
            parameters = symbols.parameters().len(),
            equations = equations.len(),
            "created observed system"
        );

        Ok(Self {
            symbols,
            equations,
            lookup,
            order,
            solvable,
            lifted,
        })
    }

    /// Returns the underlying symbol cache.
    #[must_use]
    pub fn symbols(&self) -> &SymbolCache<N> {
        &self.symbols
    }

    /// Returns the observed equations in definition order.
    #[must_use]
    pub fn equations(&self) -> &[(N, Expr<N>)] {
        &self.equations
    }

    /// Returns the expression defining the observed quantity `name`.
    #[must_use]
    pub fn equation(&self, name: &N) -> Option<&Expr<N>> {
        self.lookup.get(name).map(|&index| &self.equations[index].1)
    }

    /// Returns the equation names so that each comes after every equation
    /// its expression refers to.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &N> {
        self.order.iter().map(|&index| &self.equations[index].0)
    }

    fn resolves(&self, sym: &N) -> bool {
        self.symbols.is_variable(sym)
            || self.symbols.is_parameter(sym)
            || self.symbols.is_independent_variable(sym)
            || self.lookup.contains_key(sym)
    }

    /// Builds the observed function for `sym`, using its equation if it has one.
    fn build_named(
        &self,
        sym: &N,
        order: Option<StateOrder<'_, N>>,
    ) -> Result<ObservedFn, BuildError> {
        match self.equation(sym) {
            Some(expr) => build(self, expr, order),
            None => build(self, &Expr::Sym(sym.clone()), order),
        }
    }
}

fn evaluation_order<N>(
    equations: &[(N, Expr<N>)],
    lookup: &HashMap<N, usize>,
) -> Result<Vec<usize>, BuildError>
where
    N: Eq + Hash + Display,
{
    let mut graph = DiGraph::<usize, ()>::with_capacity(equations.len(), equations.len());
    let nodes: Vec<NodeIndex> = (0..equations.len())
        .map(|index| graph.add_node(index))
        .collect();

    for (index, (_, expr)) in equations.iter().enumerate() {
        for sym in expr.free_symbols() {
            if let Some(&dependency) = lookup.get(sym) {
                graph.add_edge(nodes[dependency], nodes[index], ());
            }
        }
    }

    toposort(&graph, None)
        .map(|sorted| sorted.into_iter().map(|node| graph[node]).collect())
        .map_err(|cycle| BuildError::Cycle(equations[graph[cycle.node_id()]].0.to_string()))
}

impl<N> SymbolicIndexing<N> for ObservedSystem<N>
where
    N: Eq + Hash + Clone + Display,
{
    fn symbolic_container(&self) -> Option<&dyn SymbolicIndexing<N>> {
        Some(&self.symbols)
    }

    fn is_observed(&self, sym: &N) -> bool {
        self.lookup.contains_key(sym)
    }

    fn observed(&self, sym: &N) -> Result<ObservedFn, Error> {
        self.build_named(sym, None).map_err(Error::build)
    }

    fn observed_at(&self, sym: &N, order: StateOrder<'_, N>) -> Result<ObservedFn, Error> {
        self.build_named(sym, Some(order)).map_err(Error::build)
    }

    fn all_solvable_symbols(&self) -> Cow<'_, [N]> {
        Cow::Borrowed(&self.solvable)
    }

    fn all_symbols(&self) -> Cow<'_, [N]> {
        let mut all = self.solvable.clone();
        all.extend_from_slice(self.symbols.parameters());
        all.extend_from_slice(self.symbols.independent_variables());
        Cow::Owned(all)
    }
}

impl<N> SymbolicIndexing<Expr<N>> for ObservedSystem<N>
where
    N: Eq + Hash + Clone + Display,
{
    fn is_variable(&self, sym: &Expr<N>) -> bool {
        sym.as_sym().is_some_and(|s| self.symbols.is_variable(s))
    }

    fn variable_index(&self, sym: &Expr<N>) -> Option<usize> {
        sym.as_sym().and_then(|s| self.symbols.variable_index(s))
    }

    fn variable_symbols(&self) -> Cow<'_, [Expr<N>]> {
        Cow::Borrowed(&self.lifted.variables)
    }

    fn is_parameter(&self, sym: &Expr<N>) -> bool {
        sym.as_sym().is_some_and(|s| self.symbols.is_parameter(s))
    }

    fn parameter_index(&self, sym: &Expr<N>) -> Option<usize> {
        sym.as_sym().and_then(|s| self.symbols.parameter_index(s))
    }

    fn parameter_symbols(&self) -> Cow<'_, [Expr<N>]> {
        Cow::Borrowed(&self.lifted.parameters)
    }

    fn is_independent_variable(&self, sym: &Expr<N>) -> bool {
        sym.as_sym()
            .is_some_and(|s| self.symbols.is_independent_variable(s))
    }

    fn independent_variable_symbols(&self) -> Cow<'_, [Expr<N>]> {
        Cow::Borrowed(&self.lifted.independent_variables)
    }

    fn is_observed(&self, sym: &Expr<N>) -> bool {
        match sym.as_sym() {
            Some(name) => self.lookup.contains_key(name),
            None => sym.free_symbols().into_iter().all(|s| self.resolves(s)),
        }
    }

    fn observed(&self, sym: &Expr<N>) -> Result<ObservedFn, Error> {
        match sym.as_sym() {
            Some(name) => self.build_named(name, None),
            None => build(self, sym, None),
        }
        .map_err(Error::build)
    }

    fn observed_at(&self, sym: &Expr<N>, order: StateOrder<'_, Expr<N>>) -> Result<ObservedFn, Error> {
        let names: Vec<N>;
        let order = match order {
            StateOrder::Symbols(states) => {
                names = states
                    .iter()
                    .map(|s| {
                        s.as_sym()
                            .cloned()
                            .ok_or_else(|| Error::build(BuildError::InvalidOrder(s.to_string())))
                    })
                    .collect::<Result<_, _>>()?;
                StateOrder::Symbols(names.as_slice())
            }
            StateOrder::TimeIndex(i) => StateOrder::TimeIndex(i),
        };

        match sym.as_sym() {
            Some(name) => self.build_named(name, Some(order)),
            None => build(self, sym, Some(order)),
        }
        .map_err(Error::build)
    }

    fn is_time_dependent(&self) -> bool {
        self.symbols.is_time_dependent()
    }

    fn constant_structure(&self) -> bool {
        true
    }

    fn all_solvable_symbols(&self) -> Cow<'_, [Expr<N>]> {
        Cow::Borrowed(&self.lifted.solvable)
    }
}

impl<N: Display> Display for ObservedSystem<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, expr) in &self.equations {
            writeln!(f, "{name} = {expr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn n(name: &str) -> Name {
        Name::from(name)
    }

    fn sym(name: &str) -> Expr {
        Expr::sym(name)
    }

    /// A spring-mass system with energy bookkeeping.
    fn spring() -> ObservedSystem {
        let cache = SymbolCache::new([n("x"), n("v")])
            .with_parameters([n("k"), n("m")])
            .with_independent_variable(n("t"));
        ObservedSystem::new(
            cache,
            [
                (n("KE"), 0.5 * sym("m") * sym("v").powf(2.0)),
                (n("PE"), 0.5 * sym("k") * sym("x").powf(2.0)),
                (n("E"), sym("KE") + sym("PE")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn named_equations_are_observed() {
        let sys = spring();

        assert!(sys.is_observed(&n("E")));
        assert!(!sys.is_observed(&n("x")));
        assert!(sys.is_variable(&n("x")));
        assert_eq!(sys.parameter_index(&n("m")), Some(1));
        assert!(SymbolicIndexing::<Name>::is_time_dependent(&sys));
    }

    #[test]
    fn observed_quantities_compose() {
        let sys = spring();
        let (u, p) = ([2.0, 3.0], [4.0, 2.0]);

        let energy = sys.observed(&n("E")).unwrap();

        assert_relative_eq!(energy.call(&u, &p, Some(0.0)).unwrap()[0], 17.0);
    }

    #[test]
    fn compound_expressions_are_observed() {
        let sys = spring();
        let ratio = sym("KE") / sym("E");

        assert!(sys.is_observed(&ratio));
        assert!(!sys.is_observed(&(sym("KE") / sym("nope"))));

        let f = sys.observed(&ratio).unwrap();
        let value = f.call(&[2.0, 3.0], &[4.0, 2.0], Some(0.0)).unwrap()[0];
        assert_relative_eq!(value, 9.0 / 17.0);
    }

    #[test]
    fn expression_symbols_mirror_names() {
        let sys = spring();

        assert!(sys.is_variable(&sym("v")));
        assert!(!sys.is_variable(&(sym("v") + 1.0)));
        assert_eq!(sys.variable_index(&sym("v")), Some(1));
        assert!(sys.is_independent_variable(&sym("t")));
        assert_eq!(
            SymbolicIndexing::<Expr>::variable_symbols(&sys).as_ref(),
            &[sym("x"), sym("v")]
        );
    }

    #[test]
    fn solvable_symbols_include_equations() {
        let sys = spring();

        assert_eq!(
            SymbolicIndexing::<Name>::all_solvable_symbols(&sys).as_ref(),
            &[n("x"), n("v"), n("KE"), n("PE"), n("E")]
        );
        assert_eq!(
            SymbolicIndexing::<Name>::all_symbols(&sys).as_ref(),
            &[n("x"), n("v"), n("KE"), n("PE"), n("E"), n("k"), n("m"), n("t")]
        );
    }

    #[test]
    fn explicit_order_is_threaded_through_nested_equations() {
        let sys = spring();
        let order = [sym("v"), sym("x")];

        let f = sys
            .observed_at(&sym("PE"), StateOrder::Symbols(&order))
            .unwrap();

        let value = f.call(&[3.0, 2.0], &[4.0, 2.0], Some(0.0)).unwrap()[0];
        assert_relative_eq!(value, 8.0);
    }

    #[test]
    fn order_entries_must_be_bare_symbols() {
        let sys = spring();
        let order = [sym("v") + 1.0];

        let err = sys
            .observed_at(&sym("PE"), StateOrder::Symbols(&order))
            .unwrap_err();

        assert!(matches!(err, Error::Build(_)));
    }

    #[test]
    fn rejects_cycles() {
        let cache = SymbolCache::new([n("x")]);
        let err = ObservedSystem::new(
            cache,
            [
                (n("a"), sym("b") + sym("x")),
                (n("b"), 2.0 * sym("a")),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Cycle(_)));
    }

    #[test]
    fn rejects_self_reference() {
        let err = ObservedSystem::new(SymbolCache::new([n("x")]), [(n("a"), sym("a") + sym("x"))])
            .unwrap_err();

        assert!(matches!(err, BuildError::Cycle(ref s) if s == "a"));
    }

    #[test]
    fn equations_are_evaluated_after_their_dependencies() {
        let cache = SymbolCache::new([n("x"), n("v")]).with_parameters([n("k"), n("m")]);
        let sys = ObservedSystem::new(
            cache,
            [
                (n("E"), sym("KE") + sym("PE")),
                (n("PE"), 0.5 * sym("k") * sym("x").powf(2.0)),
                (n("KE"), 0.5 * sym("m") * sym("v").powf(2.0)),
            ],
        )
        .unwrap();

        let order: Vec<_> = sys.evaluation_order().cloned().collect();
        let position = |name: &str| order.iter().position(|s| s == name).unwrap();

        assert_eq!(order.len(), 3);
        assert!(position("KE") < position("E"));
        assert!(position("PE") < position("E"));
        assert_eq!(
            sys.equations().iter().map(|(name, _)| name.clone()).collect::<Vec<_>>(),
            [n("E"), n("PE"), n("KE")]
        );
    }

    #[test]
    fn rejects_unknown_symbols_and_conflicts() {
        let unknown =
            ObservedSystem::new(SymbolCache::new([n("x")]), [(n("y"), sym("x") * sym("z"))]);
        let shadowing = ObservedSystem::new(SymbolCache::new([n("x")]), [(n("x"), sym("x"))]);

        assert!(matches!(unknown, Err(BuildError::Unresolved(ref s)) if s == "z"));
        assert!(matches!(shadowing, Err(BuildError::Conflict(ref s)) if s == "x"));
    }

    #[test]
    fn displays_equations() {
        let sys = ObservedSystem::new(
            SymbolCache::new([n("x")]),
            [(n("y"), sym("x") + 1.0)],
        )
        .unwrap();

        assert_eq!(sys.to_string(), "y = (x + 1)\n");
    }
}
