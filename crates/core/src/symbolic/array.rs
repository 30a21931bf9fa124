use ndarray::{ArrayD, Dimension, IxDyn};

use crate::Name;

use super::{NamingConfig, Symbolic, SymbolicType, SymbolicTypeOf};

/// Expands an array symbolic value into its scalar symbolic elements.
///
/// Implemented by types whose [`SymbolicTypeOf::SYMBOLIC_TYPE`] is
/// [`SymbolicType::ArraySymbolic`]. The collected array must have exactly the
/// shape of the array the value represents, and every element must be
/// [`SymbolicType::ScalarSymbolic`].
pub trait Collect: Symbolic {
    /// The scalar symbolic element type.
    type Element: Symbolic;

    /// Returns the extents of the represented array.
    fn shape(&self) -> &[usize];

    /// Collects the scalar elements into an array of the same shape.
    fn collect_scalars(&self) -> ArrayD<Self::Element>;
}

/// A named symbolic array of fixed shape.
///
/// Collecting it yields one [`Name`] per element, derived from the array's
/// name and the element's index according to its [`NamingConfig`].
///
/// ```
/// use ndarray::IxDyn;
/// use symindex_core::symbolic::{Collect, SymbolicArray};
///
/// let a = SymbolicArray::new("A", [2, 2]);
/// let elements = a.collect_scalars();
///
/// assert_eq!(elements.shape(), &[2, 2]);
/// assert_eq!(elements[IxDyn(&[1, 0])].as_str(), "A_2_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicArray {
    name: Name,
    shape: Vec<usize>,
    naming: NamingConfig,
}

impl SymbolicArray {
    /// Creates a symbolic array with the default naming convention.
    pub fn new(name: impl Into<Name>, shape: impl Into<Vec<usize>>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
            naming: NamingConfig::default(),
        }
    }

    /// Replaces the naming convention used for collected elements.
    #[must_use]
    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Returns the number of scalar elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Returns `true` if any extent is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolicTypeOf for SymbolicArray {
    const SYMBOLIC_TYPE: SymbolicType = SymbolicType::ArraySymbolic;
}

impl Symbolic for SymbolicArray {
    fn name(&self) -> Option<Name> {
        Some(self.name.clone())
    }
}

impl Collect for SymbolicArray {
    type Element = Name;

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn collect_scalars(&self) -> ArrayD<Name> {
        let base = self.name.as_str();
        ArrayD::from_shape_fn(IxDyn(&self.shape), |index| {
            Name::from(self.naming.element_name(base, index.slice()))
        })
    }
}
