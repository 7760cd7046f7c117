//! In-memory storage backend.
//!
//! Clients and policies live behind a single lock, which is what lets
//! [`MemoryStore::grant_root`](BootstrapStore::grant_root) be atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use gate_model::{Client, Policy, PolicyTemplate};
use tokio::sync::RwLock;

use crate::assign_id;
use crate::bootstrap::{BootstrapStore, GrantError, RootGrant};
use crate::client::ClientProvider;
use crate::error::{StorageError, StorageResult};
use crate::policy::PolicyProvider;

#[derive(Default)]
struct State {
    clients: BTreeMap<String, Client>,
    policies: BTreeMap<String, Policy>,
}

impl State {
    fn insert_client(&mut self, client: &Client) -> StorageResult<Client> {
        let mut stored = client.clone();
        stored.id = assign_id(&client.id);
        if self.clients.contains_key(&stored.id) {
            return Err(StorageError::duplicate("Client", "id", stored.id));
        }
        let now = Utc::now();
        stored.created_at = now;
        stored.updated_at = now;
        self.clients.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    fn insert_policy(&mut self, policy: &Policy) -> StorageResult<Policy> {
        let mut stored = policy.clone();
        stored.id = assign_id(&policy.id);
        if self.policies.contains_key(&stored.id) {
            return Err(StorageError::duplicate("Policy", "id", stored.id));
        }
        stored.created_at = Utc::now();
        self.policies.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }
}

/// In-memory client and policy store.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientProvider for MemoryStore {
    async fn create(&self, client: &Client) -> StorageResult<Client> {
        self.state.write().await.insert_client(client)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Client>> {
        Ok(self.state.read().await.clients.get(id).cloned())
    }

    async fn list(&self) -> StorageResult<Vec<Client>> {
        Ok(self.state.read().await.clients.values().cloned().collect())
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.state.read().await.clients.len() as u64)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.state
            .write()
            .await
            .clients
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Client", id))
    }

    async fn validate_secret(&self, id: &str, secret: &str) -> StorageResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .clients
            .get(id)
            .is_some_and(|c| c.secret == secret))
    }
}

#[async_trait]
impl PolicyProvider for MemoryStore {
    async fn create(&self, policy: &Policy) -> StorageResult<Policy> {
        self.state.write().await.insert_policy(policy)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Policy>> {
        Ok(self.state.read().await.policies.get(id).cloned())
    }

    async fn list(&self) -> StorageResult<Vec<Policy>> {
        Ok(self.state.read().await.policies.values().cloned().collect())
    }

    async fn find_by_subject(&self, subject: &str) -> StorageResult<Vec<Policy>> {
        Ok(self
            .state
            .read()
            .await
            .policies
            .values()
            .filter(|p| p.applies_to(subject))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.state
            .write()
            .await
            .policies
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Policy", id))
    }
}

#[async_trait]
impl BootstrapStore for MemoryStore {
    async fn list_clients(&self) -> StorageResult<Vec<Client>> {
        ClientProvider::list(self).await
    }

    async fn count_clients(&self) -> StorageResult<u64> {
        ClientProvider::count(self).await
    }

    async fn grant_root(
        &self,
        client: &Client,
        policy: &PolicyTemplate,
    ) -> Result<Option<RootGrant>, GrantError> {
        let mut state = self.state.write().await;
        if !state.clients.is_empty() {
            return Ok(None);
        }

        let client = state.insert_client(client).map_err(GrantError::ClientCreate)?;
        match state.insert_policy(&policy.bind(client.id.clone())) {
            Ok(policy) => Ok(Some(RootGrant { client, policy })),
            Err(source) => {
                state.clients.remove(&client.id);
                Err(GrantError::PolicyCreate {
                    client_id: client.id,
                    rolled_back: true,
                    source,
                })
            }
        }
    }
}
