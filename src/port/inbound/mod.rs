//! Inbound (driving) ports consumed by inbound adapters such as the CLI.
//!
//! - [`fleet`]: the [`FleetOperations`](fleet::FleetOperations) use cases
//! - [`operation`]: operation identifiers and caller credentials
//! - [`request`]: request types and schema validation
//! - [`stream`]: the cancellable generation stream handed to callers

pub mod fleet;
pub mod operation;
pub mod request;
pub mod stream;

pub use fleet::FleetOperations;
pub use operation::{Caller, Operation};
pub use request::{
    ChatCommand, ChatRequest, CreateWorker, CreateWorkerRequest, MessageInput, SetupRequest,
    Validate, WorkerRequest,
};
pub use stream::GenerationStream;
