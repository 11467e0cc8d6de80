//! Error taxonomy for the catalog, ranking, and history operations.

use thiserror::Error;

/// Result alias used across the core crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad pagination input (`page < 1`, `limit < 1`) or an empty query.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A single history entry lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The durable write or read failed. In-memory state stays authoritative.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The durable history could not be decoded.
    #[error("corrupt history data: {0}")]
    Corrupt(String),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
