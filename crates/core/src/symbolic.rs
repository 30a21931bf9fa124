//! Classification of values as symbolic or not.
//!
//! Every type falls into exactly one [`SymbolicType`]:
//!
//! - [`SymbolicType::ScalarSymbolic`]: a symbolic value representing one logical value
//! - [`SymbolicType::ArraySymbolic`]: a symbolic value representing an array of values,
//!   which can be collected into scalar symbolic elements via [`Collect`]
//! - [`SymbolicType::NotSymbolic`]: everything else
//!
//! The classification is a property of the type, exposed through the
//! [`SymbolicTypeOf`] associated constant. [`Name`] classifies as scalar
//! symbolic by convention.

mod array;
mod config;

pub use array::{Collect, SymbolicArray};
pub use config::{ConfigError, IndexBase, NamingConfig};

use crate::Name;

/// The symbolic classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolicType {
    /// A symbolic value representing a single logical value.
    ScalarSymbolic,

    /// A symbolic value representing an array of values.
    ArraySymbolic,

    /// A value that is not symbolic.
    NotSymbolic,
}

impl SymbolicType {
    /// Returns `true` unless this is [`SymbolicType::NotSymbolic`].
    #[must_use]
    pub fn is_symbolic(self) -> bool {
        !matches!(self, Self::NotSymbolic)
    }
}

/// Associates a [`SymbolicType`] with a type.
///
/// The default is [`SymbolicType::NotSymbolic`], so non-symbolic types only
/// need an empty impl.
pub trait SymbolicTypeOf {
    const SYMBOLIC_TYPE: SymbolicType = SymbolicType::NotSymbolic;
}

/// Returns the symbolic type of a value, computed from its type alone.
pub fn symbolic_type<T: SymbolicTypeOf + ?Sized>(_value: &T) -> SymbolicType {
    T::SYMBOLIC_TYPE
}

/// The name capability of symbolic values.
///
/// Only types that are not [`SymbolicType::NotSymbolic`] implement this.
/// Not every symbolic value has a name: a compound expression or a number
/// wrapped in a symbolic type returns `None` from [`Symbolic::name`].
pub trait Symbolic: SymbolicTypeOf {
    /// Returns the name of this value, if it has one.
    fn name(&self) -> Option<Name>;

    /// Returns whether [`Symbolic::name`] yields a name.
    fn has_name(&self) -> bool {
        self.name().is_some()
    }
}

impl SymbolicTypeOf for Name {
    const SYMBOLIC_TYPE: SymbolicType = SymbolicType::ScalarSymbolic;
}

impl Symbolic for Name {
    fn name(&self) -> Option<Name> {
        Some(self.clone())
    }

    fn has_name(&self) -> bool {
        true
    }
}

impl<T: SymbolicTypeOf + ?Sized> SymbolicTypeOf for &T {
    const SYMBOLIC_TYPE: SymbolicType = T::SYMBOLIC_TYPE;
}

impl<T: Symbolic + ?Sized> Symbolic for &T {
    fn name(&self) -> Option<Name> {
        (**self).name()
    }

    fn has_name(&self) -> bool {
        (**self).has_name()
    }
}

macro_rules! not_symbolic {
    ($($ty:ty),* $(,)?) => {
        $(impl SymbolicTypeOf for $ty {})*
    };
}

not_symbolic!(
    bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str,
    String,
);

// Autoref dispatch backing the `symbolic_type!` macro.

#[doc(hidden)]
pub struct Detect<'a, T: ?Sized>(pub &'a T);

#[doc(hidden)]
pub trait ViaSymbolicTypeOf {
    fn detect_symbolic_type(&self) -> SymbolicType;
}

impl<T: SymbolicTypeOf + ?Sized> ViaSymbolicTypeOf for Detect<'_, T> {
    fn detect_symbolic_type(&self) -> SymbolicType {
        T::SYMBOLIC_TYPE
    }
}

#[doc(hidden)]
pub trait ViaFallback {
    fn detect_symbolic_type(&self) -> SymbolicType;
}

impl<T: ?Sized> ViaFallback for &Detect<'_, T> {
    fn detect_symbolic_type(&self) -> SymbolicType {
        SymbolicType::NotSymbolic
    }
}

/// Classifies any value, including values whose type has no [`SymbolicTypeOf`] impl.
///
/// Types without an impl classify as [`SymbolicType::NotSymbolic`]. The
/// fallback is resolved at the call site, so it only works when the value's
/// concrete type is known there. Inside generic code, bound on
/// [`SymbolicTypeOf`] and call [`symbolic_type`] instead.
///
/// ```
/// use symindex_core::{Name, SymbolicType, symbolic_type};
///
/// struct Opaque;
///
/// assert_eq!(symbolic_type!(Name::from("x")), SymbolicType::ScalarSymbolic);
/// assert_eq!(symbolic_type!(Opaque), SymbolicType::NotSymbolic);
/// ```
#[macro_export]
macro_rules! symbolic_type {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::symbolic::{ViaFallback as _, ViaSymbolicTypeOf as _};
        (&$crate::symbolic::Detect(&$value)).detect_symbolic_type()
    }};
}
