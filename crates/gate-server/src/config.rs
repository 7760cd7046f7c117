//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::str::FromStr;
use std::time::Duration;

use gate_bootstrap::{BootstrapConfig, DisclosureMode};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Database connection URL. Without one the server keeps its clients
    /// in memory.
    pub database_url: Option<String>,

    /// Minimum database connections.
    pub db_min_connections: u32,

    /// Maximum database connections.
    pub db_max_connections: u32,

    /// How long to wait for a database connection.
    pub db_connect_timeout: Duration,

    /// Root client bootstrap settings.
    pub bootstrap: BootstrapConfig,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    ///
    /// # Errors
    ///
    /// Fails on an unknown `GATE_CREDENTIAL_DISCLOSURE` value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Fails on an unknown `GATE_CREDENTIAL_DISCLOSURE` value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let host = lookup("GATE_HOST").unwrap_or(defaults.host);
        let port = parsed(&lookup, "GATE_PORT").unwrap_or(defaults.port);

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let db_min_connections =
            parsed(&lookup, "GATE_DB_MIN_CONNECTIONS").unwrap_or(defaults.db_min_connections);
        let db_max_connections =
            parsed(&lookup, "GATE_DB_MAX_CONNECTIONS").unwrap_or(defaults.db_max_connections);
        let db_connect_timeout = parsed(&lookup, "GATE_DB_CONNECT_TIMEOUT")
            .map_or(defaults.db_connect_timeout, Duration::from_secs);

        let mut bootstrap = defaults.bootstrap;
        bootstrap.force_root_credentials = lookup("FORCE_ROOT_CLIENT_CREDENTIALS");
        if let Some(scope) = lookup("GATE_ADMIN_SCOPE").filter(|s| !s.trim().is_empty()) {
            bootstrap.admin_scope = scope.trim().to_string();
        }
        if let Some(length) = parsed(&lookup, "GATE_ROOT_SECRET_LENGTH") {
            bootstrap.secret_length = length;
        }
        if let Some(mode) = lookup("GATE_CREDENTIAL_DISCLOSURE") {
            bootstrap.disclosure = DisclosureMode::from_str(&mode).map_err(anyhow::Error::msg)?;
        }

        Ok(Self {
            host,
            port,
            database_url,
            db_min_connections,
            db_max_connections,
            db_connect_timeout,
            bootstrap,
        })
    }

    /// Creates a configuration for testing: in-memory store, random port,
    /// no credential disclosure.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            database_url: None,
            db_min_connections: 1,
            db_max_connections: 5,
            db_connect_timeout: Duration::from_secs(5),
            bootstrap: BootstrapConfig::default().with_disclosure(DisclosureMode::None),
        }
    }

    /// Returns the bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses a variable, treating unparsable values as unset.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4444,
            database_url: None,
            db_min_connections: 1,
            db_max_connections: 10,
            db_connect_timeout: Duration::from_secs(30),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:4444");
        assert!(config.database_url.is_none());
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.db_connect_timeout, Duration::from_secs(30));
        assert_eq!(config.bootstrap, BootstrapConfig::default());
    }

    #[test]
    fn reads_bootstrap_settings() {
        let config = load(&[
            ("FORCE_ROOT_CLIENT_CREDENTIALS", "admin:s3cret"),
            ("GATE_ADMIN_SCOPE", "ops"),
            ("GATE_ROOT_SECRET_LENGTH", "32"),
            ("GATE_CREDENTIAL_DISCLOSURE", "console"),
        ])
        .unwrap();

        assert_eq!(
            config.bootstrap.force_root_credentials.as_deref(),
            Some("admin:s3cret")
        );
        assert_eq!(config.bootstrap.admin_scope, "ops");
        assert_eq!(config.bootstrap.secret_length, 32);
        assert_eq!(config.bootstrap.disclosure, DisclosureMode::Console);
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        let config = load(&[("GATE_PORT", "http"), ("GATE_ROOT_SECRET_LENGTH", "-1")]).unwrap();

        assert_eq!(config.port, 4444);
        assert_eq!(config.bootstrap.secret_length, 16);
    }

    #[test]
    fn reads_database_settings() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/gate"),
            ("GATE_DB_MAX_CONNECTIONS", "4"),
            ("GATE_DB_CONNECT_TIMEOUT", "3"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://db/gate"));
        assert_eq!(config.db_max_connections, 4);
        assert_eq!(config.db_connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_database_url_means_memory() {
        let config = load(&[("DATABASE_URL", "  ")]).unwrap();

        assert!(config.database_url.is_none());
    }

    #[test]
    fn unknown_disclosure_mode_is_an_error() {
        let err = load(&[("GATE_CREDENTIAL_DISCLOSURE", "syslog")]).unwrap_err();

        assert!(err.to_string().contains("syslog"));
    }
}
