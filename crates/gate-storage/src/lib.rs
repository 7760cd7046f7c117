//! # gate-storage
//!
//! Storage abstraction traits for Gatehouse.
//!
//! ## Provider Traits
//!
//! - [`ClientProvider`] - CRUD operations for clients
//! - [`PolicyProvider`] - CRUD operations for policies
//! - [`BootstrapStore`] - the conditional "grant root trust" unit of work
//!
//! ## Backends
//!
//! - [`MemoryStore`] - in-process, all three traits, atomic root grant
//! - [`ComposedStore`] - root grant over any client/policy provider pair,
//!   with a compensating delete when policy creation fails

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bootstrap;
pub mod client;
pub mod composed;
pub mod error;
pub mod memory;
pub mod policy;

pub use bootstrap::{BootstrapStore, GrantError, RootGrant};
pub use client::ClientProvider;
pub use composed::ComposedStore;
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use policy::PolicyProvider;

/// Assigns a fresh identifier when the entity asked for a default one.
#[must_use]
pub fn assign_id(id: &str) -> String {
    if id.is_empty() {
        uuid::Uuid::now_v7().to_string()
    } else {
        id.to_string()
    }
}
