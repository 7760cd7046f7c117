//! Cryptographically secure secret generation.
//!
//! Secrets are strings over a 64-symbol URL-safe alphabet. Each output
//! character consumes one byte from the OS RNG masked to six bits, so the
//! distribution is uniform without rejection sampling and every character
//! carries exactly 6 bits of entropy.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{CryptoError, CryptoResult};

/// Length of generated root client secrets.
pub const DEFAULT_SECRET_LENGTH: usize = 16;

/// Alphabet for generated secrets. Exactly 64 symbols, no `:`.
pub const SECRET_CHARSET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Produces random secrets of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct SecretGenerator {
    length: usize,
}

impl SecretGenerator {
    /// Creates a generator for secrets of `length` bytes.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }

    /// Returns the configured length.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Generates a new secret.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidLength`] for a zero length and
    /// [`CryptoError::Rng`] if the OS RNG is unavailable.
    pub fn generate(&self) -> CryptoResult<String> {
        generate_secret(self.length)
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_LENGTH)
    }
}

/// Generates a secret of exactly `length` ASCII bytes.
///
/// # Errors
///
/// See [`SecretGenerator::generate`].
pub fn generate_secret(length: usize) -> CryptoResult<String> {
    if length == 0 {
        return Err(CryptoError::InvalidLength(length));
    }

    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Rng(e.to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| char::from(SECRET_CHARSET[usize::from(b & 0x3f)]))
        .collect())
}
