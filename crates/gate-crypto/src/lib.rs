//! # gate-crypto
//!
//! Cryptographic helpers for Gatehouse.
//!
//! Secrets are drawn from the operating system RNG. There is no seeded
//! variant: every generated credential must be unpredictable.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod random;

pub use error::{CryptoError, CryptoResult};
pub use random::{DEFAULT_SECRET_LENGTH, SECRET_CHARSET, SecretGenerator, generate_secret};
