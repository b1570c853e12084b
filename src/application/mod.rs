//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate the outbound ports
//! to implement the control plane's operations. [`FleetManager`] ties them
//! together behind the request pipeline.

pub mod directory;
pub mod dispatcher;
pub mod lifecycle;
pub mod pipeline;
pub mod resolver;
pub mod service;
pub mod setup;

pub use directory::ResourceDirectory;
pub use dispatcher::{DispatchSettings, GenerationDispatcher};
pub use lifecycle::{LifecycleController, ShutdownNotice};
pub use resolver::EndpointResolver;
pub use service::{Collaborators, FleetManager, ManagerSettings};
pub use setup::{SetupGate, SetupService};
