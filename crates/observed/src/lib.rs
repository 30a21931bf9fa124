//! Observed quantities as expressions.
//!
//! Systems that implement [`SymbolicIndexing`] can expose quantities that
//! are computed rather than stored. This crate provides:
//!
//! - [`Expr`], a small scalar expression type over symbols
//! - [`build`], which resolves an expression against any system and returns
//!   an [`ObservedFn`] that evaluates it from numeric state
//! - [`ObservedSystem`], a system with named observed equations
//!
//! [`SymbolicIndexing`]: symindex_core::SymbolicIndexing
//! [`ObservedFn`]: symindex_core::ObservedFn

mod build;
mod error;
mod expr;
mod system;

pub use build::build;
pub use error::BuildError;
pub use expr::{BinaryOp, Expr, Func};
pub use system::ObservedSystem;
