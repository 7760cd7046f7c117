//! Policy storage provider trait.

use async_trait::async_trait;
use gate_model::Policy;

use crate::error::StorageResult;

/// Provider for policy storage operations.
#[async_trait]
pub trait PolicyProvider: Send + Sync {
    /// Creates a new policy and returns it with its assigned ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a policy with the same ID exists.
    async fn create(&self, policy: &Policy) -> StorageResult<Policy>;

    /// Gets a policy by ID.
    async fn get(&self, id: &str) -> StorageResult<Option<Policy>>;

    /// Gets all policies.
    async fn list(&self) -> StorageResult<Vec<Policy>>;

    /// Gets policies that list `subject` verbatim.
    async fn find_by_subject(&self, subject: &str) -> StorageResult<Vec<Policy>>;

    /// Deletes a policy by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the policy doesn't exist.
    async fn delete(&self, id: &str) -> StorageResult<()>;
}
