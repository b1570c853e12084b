use async_trait::async_trait;
use tracing::debug;

use super::{Call, Stage};
use crate::error::ApiError;

/// Rejects malformed input before any side effect.
pub struct SchemaValidation;

#[async_trait]
impl Stage for SchemaValidation {
    fn name(&self) -> &'static str {
        "validate"
    }

    async fn before(&self, call: &Call<'_>) -> Result<(), ApiError> {
        call.request.validate().inspect_err(|e| {
            debug!(operation = call.operation.as_str(), error = %e, "Rejected malformed request");
        })
    }
}
