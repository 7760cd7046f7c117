//! Root grant over two independent providers.

use std::sync::Arc;

use async_trait::async_trait;
use gate_model::{Client, PolicyTemplate};

use crate::bootstrap::{BootstrapStore, GrantError, RootGrant};
use crate::client::ClientProvider;
use crate::error::StorageResult;
use crate::policy::PolicyProvider;

/// Combines a [`ClientProvider`] and a [`PolicyProvider`] that share no
/// transaction.
///
/// A failed policy insert is compensated by deleting the client. The
/// emptiness check is a plain read, so two processes racing against the
/// same backing stores can both create a root client; use a backend with
/// its own [`BootstrapStore`] implementation when that matters.
pub struct ComposedStore<C: ?Sized, P: ?Sized> {
    clients: Arc<C>,
    policies: Arc<P>,
}

impl<C: ?Sized, P: ?Sized> ComposedStore<C, P> {
    /// Creates a composed store.
    pub fn new(clients: Arc<C>, policies: Arc<P>) -> Self {
        Self { clients, policies }
    }
}

impl<C: ?Sized, P: ?Sized> Clone for ComposedStore<C, P> {
    fn clone(&self) -> Self {
        Self {
            clients: Arc::clone(&self.clients),
            policies: Arc::clone(&self.policies),
        }
    }
}

#[async_trait]
impl<C, P> BootstrapStore for ComposedStore<C, P>
where
    C: ClientProvider + ?Sized,
    P: PolicyProvider + ?Sized,
{
    async fn list_clients(&self) -> StorageResult<Vec<Client>> {
        self.clients.list().await
    }

    async fn count_clients(&self) -> StorageResult<u64> {
        self.clients.count().await
    }

    async fn grant_root(
        &self,
        client: &Client,
        policy: &PolicyTemplate,
    ) -> Result<Option<RootGrant>, GrantError> {
        let existing = self.clients.count().await.map_err(GrantError::ClientCheck)?;
        if existing > 0 {
            return Ok(None);
        }

        let client = self
            .clients
            .create(client)
            .await
            .map_err(GrantError::ClientCreate)?;

        match self.policies.create(&policy.bind(client.id.clone())).await {
            Ok(policy) => Ok(Some(RootGrant { client, policy })),
            Err(source) => {
                let rolled_back = match self.clients.delete(&client.id).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            client_id = %client.id,
                            error = %e,
                            "Could not remove root client after policy creation failed"
                        );
                        false
                    }
                };
                Err(GrantError::PolicyCreate {
                    client_id: client.id,
                    rolled_back,
                    source,
                })
            }
        }
    }
}
