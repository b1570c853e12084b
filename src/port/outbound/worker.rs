//! Worker endpoint port: streaming generation and shutdown notices.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{ChatMessage, Endpoint, SamplingParams};
use crate::error::Result;

/// Payload forwarded to a worker when a generation session opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub sampling: SamplingParams,
}

/// One open generation session against a worker.
///
/// Dropping a session without calling [`close`](Self::close) must still
/// release the connection, but `close` lets the worker see a clean shutdown.
#[async_trait]
pub trait GenerationSession: Send {
    /// Receive the next text fragment.
    ///
    /// Returns `None` once the worker signals completion, `Some(Err(_))` when
    /// the connection fails mid-stream.
    async fn next_fragment(&mut self) -> Option<Result<String>>;

    /// Close the upstream connection.
    async fn close(&mut self);
}

/// Client for the per-worker generation server.
#[async_trait]
pub trait WorkerClient: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &'static str;

    /// Ask the worker to shut down cleanly before its VM is stopped.
    ///
    /// Best effort: callers log failures and carry on.
    async fn notify_shutdown(&self, endpoint: &Endpoint) -> Result<()>;

    /// Open a streaming generation session and send `request`.
    async fn open_session(
        &self,
        endpoint: &Endpoint,
        request: &GenerationRequest,
    ) -> Result<Box<dyn GenerationSession>>;
}
