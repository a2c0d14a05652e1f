//! Error type shared by every fallible operation in the crate.

use std::result;

use thiserror::Error;

/// Failures raised by identifier parsing, hierarchy lookups and encoding.
///
/// Every variant is a deterministic, pure-computation failure; nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No conversion path exists between a position's frame and the grid's
    /// base frame, or the configured transform rejected the position.
    #[error("transform failure: {0}")]
    TransformFailure(String),
    /// A token or numeric value does not decode to a well-formed cell.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// An identifier handle that this reference system cannot resolve.
    #[error("unsupported identifier type: {0}")]
    UnsupportedIdentifierType(String),
    /// An out-of-range level, quadrant or configuration value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
