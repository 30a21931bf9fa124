//! A symbolic indexing protocol for numerical solvers.
//!
//! This crate defines the contract that lets solvers, integrators, and
//! solution objects query and update named quantities of a system without
//! knowing how the system is represented:
//!
//! - [`SymbolicIndexing`]: the protocol, with default methods that delegate
//!   to a [`symbolic_container()`]
//! - [`SymbolCache`]: the canonical implementation over plain symbol lists
//! - [`ObservedFn`]: a function computing an observed quantity from the
//!   current state, parameters, and time
//! - [`getp`] and [`setp`]: parameter accessors resolved once against a system
//! - [`symbolic`]: classification of values as scalar symbolic, array
//!   symbolic, or not symbolic
//!
//! # Features
//!
//! - `serde`: enables serialization of [`Name`], [`SymbolCache`], and
//!   [`NamingConfig`](symbolic::NamingConfig).
//!
//! [`symbolic_container()`]: SymbolicIndexing::symbolic_container

mod cache;
mod error;
mod indexing;
mod name;
mod observed;
pub mod params;
pub mod symbolic;

#[cfg(test)]
mod proptests;

pub use cache::SymbolCache;
pub use error::Error;
pub use indexing::{StateOrder, SymbolicIndexing};
pub use name::Name;
pub use observed::ObservedFn;
pub use params::{
    ParameterGetter, ParameterRef, ParameterSetter, ParameterValues, ParameterValuesMut,
    SetParameter, getp, setp,
};
pub use symbolic::{Symbolic, SymbolicType, SymbolicTypeOf, symbolic_type};
