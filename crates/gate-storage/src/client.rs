//! Client storage provider trait.

use async_trait::async_trait;
use gate_model::Client;

use crate::error::StorageResult;

/// Provider for client storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Creates a new client and returns it as stored.
    ///
    /// An empty `id` is replaced with a store-assigned identifier.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a client with the same `id` exists.
    async fn create(&self, client: &Client) -> StorageResult<Client>;

    /// Gets a client by ID.
    async fn get(&self, id: &str) -> StorageResult<Option<Client>>;

    /// Gets all clients.
    async fn list(&self) -> StorageResult<Vec<Client>>;

    /// Counts clients.
    async fn count(&self) -> StorageResult<u64>;

    /// Deletes a client by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the client doesn't exist.
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Validates a client secret.
    ///
    /// Returns false for unknown clients.
    async fn validate_secret(&self, id: &str, secret: &str) -> StorageResult<bool>;
}
