//! # gate-storage-sql
//!
//! SQLx-based `PostgreSQL` storage for Gatehouse.
//!
//! [`PgBootstrapStore`] performs the root grant in one transaction that
//! first takes a transaction-scoped advisory lock, so concurrent server
//! instances cannot both create a root client.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bootstrap;
pub mod client;
mod entities;
pub mod error;
pub mod policy;
pub mod pool;

pub use bootstrap::PgBootstrapStore;
pub use client::PgClientProvider;
pub use policy::PgPolicyProvider;
pub use pool::{PoolConfig, create_pool, run_migrations};
