//! Fleetward - control plane for a small fleet of GPU-backed inference workers.
//!
//! Callers list servable models, create, pause, resume and delete workers,
//! and stream chat completions from a running worker. Every operation runs
//! through one request pipeline (validation, authentication, the setup gate,
//! error normalization).
//!
//! # Architecture
//!
//! - [`domain`] - Worker names, resource shapes, chat messages, models
//! - [`port`] - Inbound operations and outbound collaborator traits
//! - [`application`] - Directory, resolver, lifecycle, dispatcher, pipeline
//! - [`adapter`] - CLI, Compute Fleet REST client, worker WebSocket client
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`error`] - Crate-wide errors and the boundary taxonomy
//!
//! # Example
//!
//! ```no_run
//! use fleetward::infrastructure::bootstrap::build_manager;
//! use fleetward::infrastructure::config::Config;
//! use fleetward::port::inbound::{Caller, FleetOperations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("config.toml")?;
//! let manager = build_manager(&config);
//! let workers = manager.list_workers(&Caller::bearer("token")).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
