//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fleet`] — [`FakeFleet`], an in-memory Compute Fleet with call recording.
//! - [`worker`] — [`ScriptedWorker`], a worker endpoint with scripted sessions.
//! - [`credentials`] — [`MemoryCredentialStore`].
//! - [`domain`] — Builders for worker names, snapshots and key files.
//! - [`config`] — Canonical test configurations.
//! - [`http`] — A stub HTTP server for adapter tests.
//! - [`harness`] — A [`FleetManager`](crate::application::FleetManager) wired
//!   over all of the above.

pub mod config;
pub mod credentials;
pub mod domain;
pub mod fleet;
pub mod harness;
pub mod http;
pub mod worker;

pub use credentials::MemoryCredentialStore;
pub use domain::{
    key_file, name, paused_worker, provisioning_worker, running_worker, worker_with_status,
};
pub use fleet::{FakeFleet, FleetCall};
pub use harness::{Harness, TEST_TOKEN};
pub use worker::ScriptedWorker;
