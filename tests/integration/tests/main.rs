//! End-to-End Integration Tests
//!
//! These tests run the bootstrap and the server against an ephemeral
//! `PostgreSQL` instance started with testcontainers.

mod bootstrap;
mod common;
mod server;
