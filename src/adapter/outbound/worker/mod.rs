//! Per-worker generation server integration.

pub mod message;
pub mod ws;

pub use ws::WsWorkerClient;
