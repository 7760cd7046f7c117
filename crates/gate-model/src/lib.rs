//! # gate-model
//!
//! Domain models for Gatehouse.
//!
//! - [`Client`] - an API principal (OAuth 2.0 / OIDC client)
//! - [`Policy`] - an access rule binding subjects to resources and actions

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod policy;

pub use client::Client;
pub use policy::{Effect, Policy, PolicyTemplate};
