use thiserror::Error;

/// Errors that can occur when reading or writing solver state by symbol.
#[derive(Debug, Error)]
pub enum Error {
    #[error("symbol `{0}` is not known to the system")]
    UnknownSymbol(String),

    #[error("symbol `{0}` is not a variable of the system")]
    NotAVariable(String),

    #[error("expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("step {index} is out of range for a solution with {len} steps")]
    StepOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Core(#[from] symindex_core::Error),
}
