//! One-time bootstrap: the setup gate and the setup handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::domain::ServiceAccountKey;
use crate::error::ApiError;
use crate::port::inbound::SetupRequest;
use crate::port::CredentialStore;

/// Process-wide record of whether bootstrap has completed.
///
/// Flips from not-done to done exactly once and never reverts.
#[derive(Debug, Default)]
pub struct SetupGate {
    done: AtomicBool,
}

impl SetupGate {
    #[must_use]
    pub const fn new(done: bool) -> Self {
        Self {
            done: AtomicBool::new(done),
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Mark bootstrap complete. Returns true for the call that performed the
    /// transition.
    pub fn mark_done(&self) -> bool {
        self.done
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Handler behind the `setup` operation.
pub struct SetupService {
    gate: Arc<SetupGate>,
    store: Arc<dyn CredentialStore>,
    bootstrap: Mutex<()>,
}

impl SetupService {
    pub fn new(gate: Arc<SetupGate>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            gate,
            store,
            bootstrap: Mutex::new(()),
        }
    }

    pub fn gate(&self) -> &Arc<SetupGate> {
        &self.gate
    }

    /// Run bootstrap.
    ///
    /// A completed setup succeeds without side effects whatever the input.
    /// Otherwise a missing payload is a readiness probe answered with
    /// `FailedPrecondition`.
    pub async fn setup(&self, request: &SetupRequest) -> Result<(), ApiError> {
        if self.gate.is_done() {
            debug!("Setup already completed");
            return Ok(());
        }

        let Some(payload) = request.key_file.as_deref() else {
            return Err(ApiError::failed_precondition("setup has not been completed"));
        };
        let key = ServiceAccountKey::parse(payload)?;

        let _running = self.bootstrap.lock().await;
        if self.gate.is_done() {
            debug!("Setup completed by a concurrent call");
            return Ok(());
        }
        if let Err(e) = self.store.persist(&key).await {
            error!(error = %e, "Failed to persist credentials");
            return Err(ApiError::internal("failed to persist credentials"));
        }

        if self.gate.mark_done() {
            info!(project = key.project_id(), "Setup completed");
        }
        Ok(())
    }
}
