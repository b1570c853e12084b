//! Fleet domain types: workers, resource shapes, chat messages and models.
//!
//! Everything here is pure data plus validation; no I/O.

pub mod chat;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod resources;
pub mod worker;

pub use chat::{validate_messages, ChatMessage, Role, SamplingParams};
pub use credentials::ServiceAccountKey;
pub use endpoint::Endpoint;
pub use model::{default_catalog, ModelSpec};
pub use resources::{GpuType, Quantization, ResourceShape};
pub use worker::{CloudId, Worker, WorkerName, WorkerStatus, WorkerSummary};
