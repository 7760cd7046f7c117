//! The root trust grant.
//!
//! Granting initial trust creates a client and a policy naming it. Doing
//! that as two independent calls leaves two gaps: two instances can both
//! see an empty client table, and a policy failure can leave a client with
//! no rights. [`BootstrapStore::grant_root`] closes both by making the
//! emptiness check and both inserts one unit of work.

use async_trait::async_trait;
use gate_model::{Client, Policy, PolicyTemplate};
use thiserror::Error;

use crate::error::{StorageError, StorageResult};

/// The client and policy created by a successful root grant.
#[derive(Debug, Clone)]
pub struct RootGrant {
    /// The root client, with its assigned ID.
    pub client: Client,
    /// The all-access policy whose only subject is `client.id`.
    pub policy: Policy,
}

/// Errors from [`BootstrapStore::grant_root`], tagged with the failing step.
#[derive(Debug, Error)]
pub enum GrantError {
    /// Reading the client table for the emptiness check failed.
    #[error("could not check for existing clients: {0}")]
    ClientCheck(#[source] StorageError),

    /// Inserting the root client failed. Nothing was persisted.
    #[error("could not create root client: {0}")]
    ClientCreate(#[source] StorageError),

    /// Inserting the policy failed after the client was created.
    #[error("could not create root policy for client '{client_id}': {source}")]
    PolicyCreate {
        /// ID of the client created in this attempt.
        client_id: String,
        /// True if the client no longer exists.
        rolled_back: bool,
        /// The policy store error.
        #[source]
        source: StorageError,
    },
}

/// Store capable of granting root trust.
#[async_trait]
pub trait BootstrapStore: Send + Sync {
    /// Gets all clients.
    async fn list_clients(&self) -> StorageResult<Vec<Client>>;

    /// Counts clients without loading them.
    ///
    /// The default lists and counts; backends should override it.
    async fn count_clients(&self) -> StorageResult<u64> {
        Ok(self.list_clients().await?.len() as u64)
    }

    /// Creates `client` and a policy bound to its ID, iff no client exists.
    ///
    /// Returns `Ok(None)` without writing anything when at least one client
    /// is already present.
    async fn grant_root(
        &self,
        client: &Client,
        policy: &PolicyTemplate,
    ) -> Result<Option<RootGrant>, GrantError>;
}
