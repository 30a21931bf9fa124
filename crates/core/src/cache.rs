use std::{borrow::Cow, collections::HashMap, hash::Hash};

use crate::{Error, Name, ObservedFn, SymbolicIndexing};

/// The canonical implementation of [`SymbolicIndexing`] over plain symbol lists.
///
/// A `SymbolCache` holds three ordered lists: variables, parameters, and
/// independent variables. Each list is deduplicated at construction (the
/// first occurrence wins), and the index of a symbol is its position in its
/// list. The cache is immutable once built.
///
/// It declares no observed quantities: [`is_observed`] is always `false` and
/// [`observed`] is unsupported. It is time dependent if it has at least one
/// independent variable, and its structure is always constant.
///
/// ```
/// use symindex_core::{Name, SymbolCache, SymbolicIndexing};
///
/// let cache = SymbolCache::new(["x", "y"].map(Name::from))
///     .with_parameters([Name::from("a")])
///     .with_independent_variable(Name::from("t"));
///
/// assert!(cache.is_variable(&Name::from("x")));
/// assert_eq!(cache.variable_index(&Name::from("y")), Some(1));
/// assert!(cache.is_time_dependent());
/// assert_eq!(
///     cache.all_symbols().as_ref(),
///     &["x", "y", "a", "t"].map(Name::from),
/// );
/// ```
///
/// [`is_observed`]: SymbolicIndexing::is_observed
/// [`observed`]: SymbolicIndexing::observed
#[derive(Debug, Clone)]
pub struct SymbolCache<S = Name> {
    variables: SymbolList<S>,
    parameters: SymbolList<S>,
    independent_variables: SymbolList<S>,
}

/// An ordered, deduplicated list with a position lookup.
#[derive(Debug, Clone)]
struct SymbolList<S> {
    symbols: Vec<S>,
    positions: HashMap<S, usize>,
}

impl<S: Eq + Hash + Clone> SymbolList<S> {
    fn new(symbols: impl IntoIterator<Item = S>) -> Self {
        let mut list = Self {
            symbols: Vec::new(),
            positions: HashMap::new(),
        };
        for sym in symbols {
            if !list.positions.contains_key(&sym) {
                list.positions.insert(sym.clone(), list.symbols.len());
                list.symbols.push(sym);
            }
        }
        list
    }

    fn contains(&self, sym: &S) -> bool {
        self.positions.contains_key(sym)
    }

    fn position(&self, sym: &S) -> Option<usize> {
        self.positions.get(sym).copied()
    }
}

impl<S: Eq + Hash + Clone> SymbolCache<S> {
    /// Creates a cache with the given variables and no parameters or
    /// independent variables.
    pub fn new(variables: impl IntoIterator<Item = S>) -> Self {
        Self::from_parts(variables, [], [])
    }

    /// Creates a cache from all three symbol lists.
    pub fn from_parts(
        variables: impl IntoIterator<Item = S>,
        parameters: impl IntoIterator<Item = S>,
        independent_variables: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            variables: SymbolList::new(variables),
            parameters: SymbolList::new(parameters),
            independent_variables: SymbolList::new(independent_variables),
        }
    }

    /// Replaces the parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = S>) -> Self {
        self.parameters = SymbolList::new(parameters);
        self
    }

    /// Replaces the independent variables.
    #[must_use]
    pub fn with_independent_variables(
        mut self,
        independent_variables: impl IntoIterator<Item = S>,
    ) -> Self {
        self.independent_variables = SymbolList::new(independent_variables);
        self
    }

    /// Sets a single independent variable.
    #[must_use]
    pub fn with_independent_variable(self, independent_variable: S) -> Self {
        self.with_independent_variables([independent_variable])
    }

    /// Returns the variables.
    #[must_use]
    pub fn variables(&self) -> &[S] {
        &self.variables.symbols
    }

    /// Returns the parameters.
    #[must_use]
    pub fn parameters(&self) -> &[S] {
        &self.parameters.symbols
    }

    /// Returns the independent variables.
    #[must_use]
    pub fn independent_variables(&self) -> &[S] {
        &self.independent_variables.symbols
    }
}

impl<S: Eq + Hash + Clone> SymbolicIndexing<S> for SymbolCache<S> {
    fn is_variable(&self, sym: &S) -> bool {
        self.variables.contains(sym)
    }

    fn variable_index(&self, sym: &S) -> Option<usize> {
        self.variables.position(sym)
    }

    fn variable_symbols(&self) -> Cow<'_, [S]> {
        Cow::Borrowed(self.variables())
    }

    fn is_parameter(&self, sym: &S) -> bool {
        self.parameters.contains(sym)
    }

    fn parameter_index(&self, sym: &S) -> Option<usize> {
        self.parameters.position(sym)
    }

    fn parameter_symbols(&self) -> Cow<'_, [S]> {
        Cow::Borrowed(self.parameters())
    }

    fn is_independent_variable(&self, sym: &S) -> bool {
        self.independent_variables.contains(sym)
    }

    fn independent_variable_symbols(&self) -> Cow<'_, [S]> {
        Cow::Borrowed(self.independent_variables())
    }

    fn is_observed(&self, _sym: &S) -> bool {
        false
    }

    fn observed(&self, _sym: &S) -> Result<ObservedFn, Error> {
        Err(Error::unsupported("observed"))
    }

    fn is_time_dependent(&self) -> bool {
        !self.independent_variables.symbols.is_empty()
    }

    fn constant_structure(&self) -> bool {
        true
    }

    fn all_solvable_symbols(&self) -> Cow<'_, [S]> {
        Cow::Borrowed(self.variables())
    }

    fn all_symbols(&self) -> Cow<'_, [S]> {
        let mut all = Vec::with_capacity(
            self.variables.symbols.len()
                + self.parameters.symbols.len()
                + self.independent_variables.symbols.len(),
        );
        all.extend_from_slice(self.variables());
        all.extend_from_slice(self.parameters());
        all.extend_from_slice(self.independent_variables());
        Cow::Owned(all)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::hash::Hash;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::SymbolCache;

    #[derive(Serialize)]
    struct PartsRef<'a, S> {
        variables: &'a [S],
        parameters: &'a [S],
        independent_variables: &'a [S],
    }

    #[derive(Deserialize)]
    #[serde(bound(deserialize = "S: Deserialize<'de>"))]
    struct Parts<S> {
        variables: Vec<S>,
        #[serde(default)]
        parameters: Vec<S>,
        #[serde(default)]
        independent_variables: Vec<S>,
    }

    impl<S: Serialize + Eq + Hash + Clone> Serialize for SymbolCache<S> {
        fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
            PartsRef {
                variables: self.variables(),
                parameters: self.parameters(),
                independent_variables: self.independent_variables(),
            }
            .serialize(serializer)
        }
    }

    impl<'de, S> Deserialize<'de> for SymbolCache<S>
    where
        S: Deserialize<'de> + Eq + Hash + Clone,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let parts = Parts::<S>::deserialize(deserializer)?;
            Ok(SymbolCache::from_parts(
                parts.variables,
                parts.parameters,
                parts.independent_variables,
            ))
        }
    }
}
