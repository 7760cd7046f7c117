//! Bootstrap configuration.

use std::str::FromStr;
use std::sync::Arc;

use gate_crypto::DEFAULT_SECRET_LENGTH;
use serde::{Deserialize, Serialize};

use crate::disclosure::{ConsoleDisclosure, CredentialDisclosure, LogDisclosure, NoDisclosure};
use crate::root::DEFAULT_ADMIN_SCOPE;

/// Where generated root credentials are disclosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureMode {
    /// Through the tracing pipeline.
    #[default]
    Log,
    /// Directly to stderr, bypassing log collection.
    Console,
    /// Not at all.
    None,
}

impl DisclosureMode {
    /// Builds the sink for this mode.
    #[must_use]
    pub fn sink(self) -> Arc<dyn CredentialDisclosure> {
        match self {
            Self::Log => Arc::new(LogDisclosure),
            Self::Console => Arc::new(ConsoleDisclosure::stderr()),
            Self::None => Arc::new(NoDisclosure),
        }
    }
}

impl FromStr for DisclosureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "console" | "stderr" => Ok(Self::Console),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("unknown credential disclosure mode '{other}'")),
        }
    }
}

/// Configuration for [`BootstrapInitializer`](crate::BootstrapInitializer).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Operator override in the form `<id>:<secret>`.
    pub force_root_credentials: Option<String>,
    /// Admin scope token and resource namespace.
    pub admin_scope: String,
    /// Length of the generated secret.
    pub secret_length: usize,
    /// Credential disclosure sink.
    pub disclosure: DisclosureMode,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            force_root_credentials: None,
            admin_scope: DEFAULT_ADMIN_SCOPE.to_string(),
            secret_length: DEFAULT_SECRET_LENGTH,
            disclosure: DisclosureMode::default(),
        }
    }
}

impl BootstrapConfig {
    /// Sets the operator override.
    #[must_use]
    pub fn with_override(mut self, raw: impl Into<String>) -> Self {
        self.force_root_credentials = Some(raw.into());
        self
    }

    /// Sets the admin scope.
    #[must_use]
    pub fn with_admin_scope(mut self, scope: impl Into<String>) -> Self {
        self.admin_scope = scope.into();
        self
    }

    /// Sets the generated secret length.
    #[must_use]
    pub const fn with_secret_length(mut self, length: usize) -> Self {
        self.secret_length = length;
        self
    }

    /// Sets the disclosure mode.
    #[must_use]
    pub const fn with_disclosure(mut self, mode: DisclosureMode) -> Self {
        self.disclosure = mode;
        self
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field(
                "force_root_credentials",
                &self.force_root_credentials.as_ref().map(|_| "<redacted>"),
            )
            .field("admin_scope", &self.admin_scope)
            .field("secret_length", &self.secret_length)
            .field("disclosure", &self.disclosure)
            .finish()
    }
}
