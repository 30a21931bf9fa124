//! Solver-side handles that expose their numeric state by symbol.
//!
//! [`Integrator`] holds the live state of a running integration and
//! [`Solution`] holds a saved trajectory. Both delegate every
//! [`SymbolicIndexing`] query to the system they were created from, so a
//! solver can pass them anywhere a system is expected, and both expose their
//! parameters to [`getp`].
//!
//! [`SymbolicIndexing`]: symindex_core::SymbolicIndexing
//! [`getp`]: symindex_core::getp

mod error;
mod integrator;
mod resolve;
mod solution;

pub use error::Error;
pub use integrator::Integrator;
pub use solution::Solution;
