use std::error::Error as StdError;

use thiserror::Error;

/// Errors returned by protocol operations that can fail.
///
/// Symbol lookups never fail: an unknown symbol is reported as `None` or
/// `false`. These errors cover unsupported operations, accessor misuse, and
/// failures while building observed functions.
#[derive(Debug, Error)]
pub enum Error {
    /// The handle (and every container it delegates to) does not support the operation.
    #[error("operation `{operation}` is not supported by this system")]
    Unsupported { operation: &'static str },

    /// A symbol passed to `getp` or `setp` is not a parameter of the system.
    #[error("symbol is not a parameter of the system")]
    NotAParameter,

    /// A resolved index does not fit the collection it is applied to.
    #[error("index {index} is out of bounds for a collection of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// An observed function used as a single quantity returned some other number of values.
    #[error("observed function returned {len} values where one was expected")]
    NotScalar { len: usize },

    /// A time-dependent observed function was called without a time.
    #[error("observed function is time dependent and requires a time argument")]
    MissingTime,

    /// A time-independent observed function was called with a time.
    #[error("observed function is time independent and does not accept a time argument")]
    UnexpectedTime,

    /// Building an observed function failed.
    #[error("failed to build observed function: {0}")]
    Build(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Wraps an error raised while building an observed function.
    pub fn build<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Build(Box::new(err))
    }
}
