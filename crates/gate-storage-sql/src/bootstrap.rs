//! `PostgreSQL` root grant.
//!
//! The emptiness check and both inserts run in one transaction. The
//! transaction first takes an advisory lock, so a second instance blocks
//! until the first commits and then sees its client.

use async_trait::async_trait;
use gate_model::{Client, PolicyTemplate};
use gate_storage::error::StorageResult;
use gate_storage::{BootstrapStore, GrantError, RootGrant};
use sqlx::PgPool;

use crate::client::{count_clients, insert_client, list_clients};
use crate::error::{from_sqlx_error, from_transaction_error};
use crate::policy::insert_policy;

/// Advisory lock key held for the duration of a root grant.
pub const ROOT_GRANT_LOCK_KEY: i64 = 0x6761_7465_726f_6f74;

/// `PostgreSQL` implementation of [`BootstrapStore`].
#[derive(Clone)]
pub struct PgBootstrapStore {
    pool: PgPool,
}

impl PgBootstrapStore {
    /// Creates a bootstrap store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BootstrapStore for PgBootstrapStore {
    async fn list_clients(&self) -> StorageResult<Vec<Client>> {
        list_clients(&self.pool).await
    }

    async fn count_clients(&self) -> StorageResult<u64> {
        count_clients(&self.pool).await
    }

    async fn grant_root(
        &self,
        client: &Client,
        policy: &PolicyTemplate,
    ) -> Result<Option<RootGrant>, GrantError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GrantError::ClientCheck(from_transaction_error(e)))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ROOT_GRANT_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| GrantError::ClientCheck(from_sqlx_error(e)))?;

        let existing = count_clients(&mut *tx)
            .await
            .map_err(GrantError::ClientCheck)?;
        if existing > 0 {
            tracing::debug!(existing, "Clients appeared before the root grant, skipping");
            return Ok(None);
        }

        let client = insert_client(&mut *tx, client)
            .await
            .map_err(GrantError::ClientCreate)?;

        // Dropping `tx` on any early return below rolls back the client.
        let policy = insert_policy(&mut *tx, &policy.bind(client.id.clone()))
            .await
            .map_err(|source| GrantError::PolicyCreate {
                client_id: client.id.clone(),
                rolled_back: true,
                source,
            })?;

        tx.commit()
            .await
            .map_err(|e| GrantError::PolicyCreate {
                client_id: client.id.clone(),
                rolled_back: true,
                source: from_transaction_error(e),
            })?;

        Ok(Some(RootGrant { client, policy }))
    }
}
