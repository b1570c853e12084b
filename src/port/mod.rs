//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   CLI ──▶ inbound::FleetOperations ──▶ application ──▶ outbound::*
//!                                                          │
//!                          ┌──────────────┬───────────────┼──────────────┐
//!                          ▼              ▼               ▼              ▼
//!                    ComputeFleet   WorkerClient    ModelCatalog   CredentialStore
//! ```

pub mod inbound;
pub mod outbound;

pub use outbound::catalog::ModelCatalog;
pub use outbound::credentials::CredentialStore;
pub use outbound::fleet::{ComputeFleet, InstanceSpec};
pub use outbound::worker::{GenerationRequest, GenerationSession, WorkerClient};
