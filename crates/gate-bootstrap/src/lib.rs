//! # gate-bootstrap
//!
//! First-run trust bootstrap for Gatehouse.
//!
//! A fresh deployment has no clients, so nobody can call the admin API.
//! [`BootstrapInitializer`] fixes that once: if the client store is empty it
//! creates a root client and an all-access policy naming it, and discloses
//! the generated credentials exactly once. Every later run is a no-op.
//!
//! ## Flow
//!
//! 1. list clients; any client present means [`BootstrapOutcome::Skipped`]
//! 2. resolve credentials from the operator override, or generate them
//! 3. create client and policy through [`BootstrapStore::grant_root`]
//! 4. disclose generated credentials through a [`CredentialDisclosure`]
//!
//! [`BootstrapStore::grant_root`]: gate_storage::BootstrapStore::grant_root

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod disclosure;
pub mod error;
pub mod initializer;
pub mod resolver;
pub mod root;

pub use config::{BootstrapConfig, DisclosureMode};
pub use disclosure::{ConsoleDisclosure, CredentialDisclosure, LogDisclosure, NoDisclosure};
pub use error::BootstrapError;
pub use initializer::{BootstrapInitializer, BootstrapOutcome, BootstrapReport, SkipReason};
pub use resolver::{
    CredentialSource, MalformedOverride, OverrideResolver, Resolution, RootCredentials,
    parse_override,
};
