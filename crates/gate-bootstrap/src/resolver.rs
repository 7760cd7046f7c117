//! Root credential resolution.
//!
//! The operator may pin the root client's credentials with an override of
//! the form `<id>:<secret>`. Anything else is rejected as a whole: a
//! malformed override never contributes a partial identity, the resolver
//! falls back to a store-assigned id and a generated secret.

use std::fmt;

use gate_crypto::{CryptoResult, SecretGenerator};
use thiserror::Error;

/// Resolved root client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct RootCredentials {
    /// Client ID. Empty means the store assigns one.
    pub id: String,
    /// Plaintext client secret.
    pub secret: String,
}

impl fmt::Debug for RootCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootCredentials")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Where the root credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Secret generated at random, id assigned by the store.
    Generated,
    /// Supplied by the operator.
    Override,
}

/// The override did not have the form `<id>:<secret>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("root client credentials must have the form <id>:<secret>")]
pub struct MalformedOverride;

/// Parses an `<id>:<secret>` override.
///
/// Both fields must be non-empty and the input must contain exactly one `:`.
///
/// # Errors
///
/// Returns [`MalformedOverride`] for any other shape.
pub fn parse_override(raw: &str) -> Result<RootCredentials, MalformedOverride> {
    let mut fields = raw.split(':');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(id), Some(secret), None) if !id.is_empty() && !secret.is_empty() => {
            Ok(RootCredentials {
                id: id.to_string(),
                secret: secret.to_string(),
            })
        }
        _ => Err(MalformedOverride),
    }
}

/// Result of resolving the root credentials.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Credentials to create the root client with.
    pub credentials: RootCredentials,
    /// Where they came from.
    pub source: CredentialSource,
    /// True if an override was supplied but discarded as malformed.
    pub override_rejected: bool,
}

/// Chooses between the operator override and generated credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideResolver {
    generator: SecretGenerator,
}

impl OverrideResolver {
    /// Creates a resolver that falls back to `generator`.
    #[must_use]
    pub const fn new(generator: SecretGenerator) -> Self {
        Self { generator }
    }

    /// Resolves the root credentials.
    ///
    /// A missing or blank override yields generated credentials. The
    /// generator is only consulted when no valid override exists.
    ///
    /// # Errors
    ///
    /// Fails only if secret generation fails.
    pub fn resolve(&self, raw: Option<&str>) -> CryptoResult<Resolution> {
        let raw = raw.filter(|r| !r.trim().is_empty());

        let override_rejected = match raw.map(parse_override) {
            Some(Ok(credentials)) => {
                return Ok(Resolution {
                    credentials,
                    source: CredentialSource::Override,
                    override_rejected: false,
                });
            }
            Some(Err(_)) => {
                tracing::warn!(
                    "You passed malformed root client credentials, falling back to random values."
                );
                true
            }
            None => false,
        };

        Ok(Resolution {
            credentials: RootCredentials {
                id: String::new(),
                secret: self.generator.generate()?,
            },
            source: CredentialSource::Generated,
            override_rejected,
        })
    }
}
