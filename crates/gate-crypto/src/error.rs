//! Crypto error types.

use thiserror::Error;

/// Errors raised while producing key material.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The requested secret length is unusable.
    #[error("invalid secret length: {0}")]
    InvalidLength(usize),

    /// The operating system RNG failed.
    #[error("random number generator failure: {0}")]
    Rng(String),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
