//! Root client bootstrap.

use std::sync::Arc;

use gate_crypto::SecretGenerator;
use gate_model::{Client, Policy};
use gate_storage::BootstrapStore;

use crate::config::BootstrapConfig;
use crate::disclosure::CredentialDisclosure;
use crate::error::BootstrapError;
use crate::resolver::{CredentialSource, OverrideResolver, RootCredentials};
use crate::root::{root_client, root_policy_template};

/// Why no root client was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The store already held this many clients.
    ClientsExist(usize),
    /// The store was empty when listed but not when the grant ran; another
    /// instance bootstrapped in between.
    ConcurrentBootstrap,
}

/// Everything created by a successful bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// The root client as stored.
    pub client: Client,
    /// The root policy as stored.
    pub policy: Policy,
    /// Plaintext credentials of the root client.
    pub credentials: RootCredentials,
    /// Where the credentials came from.
    pub source: CredentialSource,
    /// True if a malformed override was ignored.
    pub override_rejected: bool,
}

/// Result of [`BootstrapInitializer::run`].
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// Nothing was written.
    Skipped(SkipReason),
    /// A root client and policy were created.
    Created(Box<BootstrapReport>),
}

impl BootstrapOutcome {
    /// True if this run created the root client.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The report, if this run created the root client.
    #[must_use]
    pub fn report(&self) -> Option<&BootstrapReport> {
        match self {
            Self::Created(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// Creates the root client and policy on a fresh deployment.
pub struct BootstrapInitializer {
    store: Arc<dyn BootstrapStore>,
    config: BootstrapConfig,
    disclosure: Arc<dyn CredentialDisclosure>,
}

impl BootstrapInitializer {
    /// Creates an initializer using the disclosure sink named in `config`.
    #[must_use]
    pub fn new(store: Arc<dyn BootstrapStore>, config: BootstrapConfig) -> Self {
        let disclosure = config.disclosure.sink();
        Self {
            store,
            config,
            disclosure,
        }
    }

    /// Replaces the disclosure sink.
    #[must_use]
    pub fn with_disclosure(mut self, disclosure: Arc<dyn CredentialDisclosure>) -> Self {
        self.disclosure = disclosure;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Runs the bootstrap.
    ///
    /// Safe to call on every startup: once any client exists this only
    /// lists clients and returns [`BootstrapOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// Any store or secret generation failure. A failed policy insert is
    /// reported together with whether the client was removed again.
    pub async fn run(&self) -> Result<BootstrapOutcome, BootstrapError> {
        let clients = self
            .store
            .list_clients()
            .await
            .map_err(BootstrapError::ListClients)?;
        if !clients.is_empty() {
            tracing::debug!(clients = clients.len(), "Clients exist, skipping root bootstrap");
            return Ok(BootstrapOutcome::Skipped(SkipReason::ClientsExist(
                clients.len(),
            )));
        }

        let resolver = OverrideResolver::new(SecretGenerator::new(self.config.secret_length));
        let resolution = resolver.resolve(self.config.force_root_credentials.as_deref())?;

        tracing::warn!("No clients were found. Creating a temporary root client...");
        let client = root_client(&resolution.credentials, &self.config.admin_scope);
        let template = root_policy_template(&self.config.admin_scope);

        let Some(grant) = self.store.grant_root(&client, &template).await? else {
            tracing::warn!("Another instance created the root client first, skipping");
            return Ok(BootstrapOutcome::Skipped(SkipReason::ConcurrentBootstrap));
        };

        let credentials = RootCredentials {
            id: grant.client.id.clone(),
            secret: resolution.credentials.secret,
        };

        tracing::info!(
            client_id = %grant.client.id,
            policy_id = %grant.policy.id,
            "Temporary root client created."
        );
        // Supplying an override, even a rejected one, turns disclosure off.
        if resolution.source == CredentialSource::Generated && !resolution.override_rejected {
            self.disclosure.generated(&credentials);
        } else {
            if resolution.override_rejected {
                tracing::warn!(
                    client_id = %credentials.id,
                    "The generated root client secret is not disclosed because an override was supplied."
                );
            }
            self.disclosure.overridden();
        }

        Ok(BootstrapOutcome::Created(Box::new(BootstrapReport {
            client: grant.client,
            policy: grant.policy,
            credentials,
            source: resolution.source,
            override_rejected: resolution.override_rejected,
        })))
    }
}

impl std::fmt::Debug for BootstrapInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapInitializer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
