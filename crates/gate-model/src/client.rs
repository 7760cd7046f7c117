//! Client domain model.
//!
//! Clients are the API principals of the authorization server. Every
//! administrative call is made by some client, and policies refer to
//! clients by their `id`.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth 2.0 / OIDC client.
///
/// An empty `id` asks the store to assign one on creation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client identifier (OAuth `client_id`).
    pub id: String,
    /// Human-readable description.
    pub name: String,
    /// Shared credential.
    pub secret: String,
    /// Permitted response types (`code`, `token`, `id_token`, ...).
    pub response_types: BTreeSet<String>,
    /// Permitted grant types.
    pub grant_types: BTreeSet<String>,
    /// Space-delimited permitted scopes.
    pub scope: String,
    /// Allowed redirect URIs, in registration order.
    pub redirect_uris: Vec<String>,
    /// When the client was created.
    pub created_at: DateTime<Utc>,
    /// When the client was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Creates a client with the given identifier and nothing else set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: String::new(),
            secret: String::new(),
            response_types: BTreeSet::new(),
            grant_types: BTreeSet::new(),
            scope: String::new(),
            redirect_uris: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the shared secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Adds permitted response types.
    #[must_use]
    pub fn with_response_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.response_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Adds permitted grant types.
    #[must_use]
    pub fn with_grant_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Sets the space-delimited scope string.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Appends a redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Returns true if the store should assign the identifier.
    #[must_use]
    pub fn has_default_id(&self) -> bool {
        self.id.is_empty()
    }

    /// Iterates over the individual scope tokens.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Checks whether a scope token is permitted.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|s| s == scope)
    }

    /// Checks whether a grant type is permitted.
    #[must_use]
    pub fn has_grant_type(&self, grant_type: &str) -> bool {
        self.grant_types.contains(grant_type)
    }

    /// Checks whether a response type is permitted.
    #[must_use]
    pub fn has_response_type(&self, response_type: &str) -> bool {
        self.response_types.contains(response_type)
    }

    /// Checks if the redirect URI is registered for this client.
    #[must_use]
    pub fn is_valid_redirect_uri(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|u| u == uri)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .field("response_types", &self.response_types)
            .field("grant_types", &self.grant_types)
            .field("scope", &self.scope)
            .field("redirect_uris", &self.redirect_uris)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
