//! Routes chat completions to a worker and relays its fragments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::directory::ResourceDirectory;
use super::resolver::EndpointResolver;
use crate::domain::{Endpoint, WorkerName};
use crate::error::ApiError;
use crate::port::inbound::{ChatCommand, GenerationStream};
use crate::port::{ComputeFleet, GenerationSession, WorkerClient};

/// Relay tuning.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    /// Fragments buffered between the relay and the caller.
    pub buffer: usize,
    /// Longest silence tolerated from a worker mid-stream.
    pub idle_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            buffer: 64,
            idle_timeout: Duration::from_secs(120),
        }
    }
}

/// Opens generation sessions against running workers.
pub struct GenerationDispatcher {
    directory: ResourceDirectory,
    resolver: EndpointResolver,
    workers: Arc<dyn WorkerClient>,
    settings: DispatchSettings,
}

impl GenerationDispatcher {
    pub fn new(
        fleet: Arc<dyn ComputeFleet>,
        workers: Arc<dyn WorkerClient>,
        resolver: EndpointResolver,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            directory: ResourceDirectory::new(fleet),
            resolver,
            workers,
            settings,
        }
    }

    /// Resolve the worker, open a session and start relaying.
    ///
    /// Fails `NotFound` for an unknown worker and `FailedPrecondition` when it
    /// has no reachable endpoint; no connection is attempted in either case.
    pub async fn dispatch(&self, command: ChatCommand) -> Result<GenerationStream, ApiError> {
        let worker = self.directory.lookup(&command.worker).await?;
        let Some(endpoint) = self.resolver.resolve(&worker) else {
            return Err(ApiError::failed_precondition(format!(
                "worker '{}' is not reachable (status {})",
                worker.name, worker.status
            )));
        };

        let session = self
            .workers
            .open_session(&endpoint, &command.request)
            .await
            .map_err(|e| {
                error!(
                    worker = %worker.name,
                    endpoint = %endpoint,
                    error = %e,
                    "Failed to open generation session"
                );
                ApiError::internal(format!(
                    "could not open a generation session on worker '{}'",
                    worker.name
                ))
            })?;
        info!(worker = %worker.name, endpoint = %endpoint, "Generation session opened");

        let (tx, rx) = mpsc::channel(self.settings.buffer.max(1));
        let cancel = CancellationToken::new();
        let relay = tokio::spawn(relay(
            Relay {
                worker: worker.name,
                endpoint,
                idle_timeout: self.settings.idle_timeout,
            },
            session,
            tx,
            cancel.clone(),
        ));
        Ok(GenerationStream::new(rx, cancel, relay))
    }
}

struct Relay {
    worker: WorkerName,
    endpoint: Endpoint,
    idle_timeout: Duration,
}

enum Step {
    Fragment(String),
    Failed(String),
    Finished,
    Cancelled,
}

/// Producer side: pull fragments from the worker and push them to the caller
/// until completion, failure or cancellation. Always closes the session.
async fn relay(
    ctx: Relay,
    mut session: Box<dyn GenerationSession>,
    tx: mpsc::Sender<Result<String, ApiError>>,
    cancel: CancellationToken,
) {
    let mut relayed = 0usize;
    loop {
        let step = tokio::select! {
            biased;
            () = cancel.cancelled() => Step::Cancelled,
            () = tx.closed() => Step::Cancelled,
            next = tokio::time::timeout(ctx.idle_timeout, session.next_fragment()) => match next {
                Ok(Some(Ok(text))) => Step::Fragment(text),
                Ok(Some(Err(e))) => Step::Failed(e.to_string()),
                Ok(None) => Step::Finished,
                Err(_) => Step::Failed(format!("no output for {:?}", ctx.idle_timeout)),
            },
        };

        match step {
            Step::Fragment(text) => {
                relayed += 1;
                // Await capacity, but stop waiting as soon as the caller leaves.
                let sent = tokio::select! {
                    biased;
                    () = cancel.cancelled() => false,
                    res = tx.send(Ok(text)) => res.is_ok(),
                };
                if !sent {
                    debug!(worker = %ctx.worker, relayed, "Generation cancelled by caller");
                    break;
                }
            }
            Step::Failed(reason) => {
                warn!(
                    worker = %ctx.worker,
                    endpoint = %ctx.endpoint,
                    relayed,
                    error = %reason,
                    "Generation stream failed"
                );
                let failure = ApiError::internal(format!(
                    "generation on worker '{}' failed mid-stream",
                    ctx.worker
                ));
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    _ = tx.send(Err(failure)) => {}
                }
                break;
            }
            Step::Finished => {
                debug!(worker = %ctx.worker, relayed, "Generation finished");
                break;
            }
            Step::Cancelled => {
                debug!(worker = %ctx.worker, relayed, "Generation cancelled by caller");
                break;
            }
        }
    }
    session.close().await;
}
