//! Bootstrap error types.

use gate_crypto::CryptoError;
use gate_storage::{GrantError, StorageError};
use thiserror::Error;

/// Errors that abort the bootstrap.
///
/// None of these are retried here; the caller decides whether startup can
/// continue.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The client list could not be read.
    #[error("could not fetch client list: {0}")]
    ListClients(#[source] StorageError),

    /// No secret could be generated.
    #[error("could not generate root client secret: {0}")]
    SecretGeneration(#[from] CryptoError),

    /// The root client could not be created.
    #[error("could not create temporary root client: {0}")]
    CreateClient(#[source] StorageError),

    /// The root policy could not be created.
    #[error("could not create admin policy for root client '{client_id}': {source}")]
    CreatePolicy {
        /// ID of the client created in this attempt.
        client_id: String,
        /// True if the client was removed again.
        rolled_back: bool,
        /// The policy store error.
        #[source]
        source: StorageError,
    },
}

impl BootstrapError {
    /// Name of the step that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ListClients(_) => "list clients",
            Self::SecretGeneration(_) => "generate secret",
            Self::CreateClient(_) => "create client",
            Self::CreatePolicy { .. } => "create policy",
        }
    }

    /// True if a root client without a policy may be left in the store.
    #[must_use]
    pub const fn left_orphan_client(&self) -> bool {
        matches!(
            self,
            Self::CreatePolicy {
                rolled_back: false,
                ..
            }
        )
    }
}

impl From<GrantError> for BootstrapError {
    fn from(err: GrantError) -> Self {
        match err {
            GrantError::ClientCheck(e) => Self::ListClients(e),
            GrantError::ClientCreate(e) => Self::CreateClient(e),
            GrantError::PolicyCreate {
                client_id,
                rolled_back,
                source,
            } => Self::CreatePolicy {
                client_id,
                rolled_back,
                source,
            },
        }
    }
}
