//! End-to-end tests for Gatehouse. The tests live under `tests/` and need
//! a Docker daemon for the `PostgreSQL` container.
