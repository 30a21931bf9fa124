use thiserror::Error;

/// Errors that can occur when building observed functions or systems.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "symbol `{0}` is not a variable, parameter, independent variable, or observed quantity"
    )]
    Unresolved(String),

    #[error("observed quantity `{0}` depends on itself")]
    Cycle(String),

    #[error("symbol `{0}` is defined more than once")]
    Conflict(String),

    #[error("state order entries must be bare symbols, found `{0}`")]
    InvalidOrder(String),

    #[error("independent variable `{0}` used in a system that is not time dependent")]
    TimeWithoutIndependentVariable(String),

    #[error("nested observed quantity `{symbol}` failed")]
    Nested {
        symbol: String,
        #[source]
        source: symindex_core::Error,
    },
}
