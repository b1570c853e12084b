//! Outbound adapters (driven side).

pub mod catalog;
pub mod credentials;
pub mod fleet;
pub mod worker;
