use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Call, Stage};
use crate::application::setup::SetupGate;
use crate::error::ApiError;

/// Rejects every call until one-time setup has completed.
pub struct ReadinessGate {
    gate: Arc<SetupGate>,
}

impl ReadinessGate {
    pub fn new(gate: Arc<SetupGate>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Stage for ReadinessGate {
    fn name(&self) -> &'static str {
        "setup_gate"
    }

    async fn before(&self, call: &Call<'_>) -> Result<(), ApiError> {
        if self.gate.is_done() {
            return Ok(());
        }
        debug!(operation = call.operation.as_str(), "Rejected call before setup");
        Err(ApiError::failed_precondition(
            "setup has not been completed, run setup first",
        ))
    }
}
