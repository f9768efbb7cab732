//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they need to.

use thiserror::Error;

use crate::Timestamp;

/// Errors raised by `mmv-core` constructors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid time bounds: start {start} is after max {max}")]
    InvalidBounds { start: Timestamp, max: Timestamp },

    #[error("timestamp {0} is not finite")]
    NonFiniteTimestamp(Timestamp),

    #[error("unknown status {0:?}")]
    UnknownStatus(String),
}

/// Shorthand result type for `mmv-core`.
pub type CoreResult<T> = Result<T, CoreError>;
