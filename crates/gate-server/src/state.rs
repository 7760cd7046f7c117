//! Application state management.

use std::sync::Arc;

use gate_bootstrap::{BootstrapOutcome, SkipReason};
use gate_storage::BootstrapStore;
use serde::Serialize;

/// What the startup bootstrap did, without any credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapStatus {
    /// True if this process created the root client.
    pub root_client_created: bool,
    /// ID of the root client, if this process created it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_client_id: Option<String>,
    /// Why nothing was created, if nothing was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<&'static str>,
}

impl From<&BootstrapOutcome> for BootstrapStatus {
    fn from(outcome: &BootstrapOutcome) -> Self {
        match outcome {
            BootstrapOutcome::Created(report) => Self {
                root_client_created: true,
                root_client_id: Some(report.client.id.clone()),
                skipped: None,
            },
            BootstrapOutcome::Skipped(reason) => Self {
                root_client_created: false,
                root_client_id: None,
                skipped: Some(match reason {
                    SkipReason::ClientsExist(_) => "clients exist",
                    SkipReason::ConcurrentBootstrap => "concurrent bootstrap",
                }),
            },
        }
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client store, used by the readiness probe.
    pub store: Arc<dyn BootstrapStore>,

    /// Result of the startup bootstrap.
    pub bootstrap: Arc<BootstrapStatus>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn BootstrapStore>, outcome: &BootstrapOutcome) -> Self {
        Self {
            store,
            bootstrap: Arc::new(BootstrapStatus::from(outcome)),
        }
    }
}
