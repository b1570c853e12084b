//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the control plane depends on:
//! the Compute Fleet API, the per-worker generation server, the model
//! catalog and credential persistence.

pub mod catalog;
pub mod credentials;
pub mod fleet;
pub mod worker;
