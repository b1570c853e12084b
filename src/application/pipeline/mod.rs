//! Request pipeline applied to every boundary operation.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s. Before the handler runs,
//! each stage's [`before`](Stage::before) hook is called in order and may
//! short-circuit with a typed failure. When the handler (or a stage) fails,
//! the [`on_error`](Stage::on_error) hooks of the stages already entered run
//! in reverse order and may translate the failure. Whatever is left is turned
//! into an [`ApiError`].
//!
//! Order is fixed by [`PipelineBuilder`]:
//!
//! ```text
//! validate → authenticate → setup gate (gated only) → normalize → handler
//! ```

mod auth;
mod gate;
mod normalize;
mod validate;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

pub use auth::Authenticate;
pub use gate::ReadinessGate;
pub use normalize::Normalize;
pub use validate::SchemaValidation;

use super::setup::SetupGate;
use crate::error::{ApiError, Error};
use crate::port::inbound::{Caller, Operation, Validate};

/// One call flowing through the pipeline.
#[derive(Clone, Copy)]
pub struct Call<'a> {
    pub operation: Operation,
    pub caller: &'a Caller,
    pub request: &'a dyn Validate,
}

impl<'a> Call<'a> {
    pub fn new(operation: Operation, caller: &'a Caller, request: &'a dyn Validate) -> Self {
        Self {
            operation,
            caller,
            request,
        }
    }
}

/// A cross-cutting interceptor.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspect the call before the handler runs.
    async fn before(&self, _call: &Call<'_>) -> Result<(), ApiError> {
        Ok(())
    }

    /// Inspect or translate a failure on the way out.
    fn on_error(&self, _call: &Call<'_>, error: Error) -> Error {
        error
    }
}

/// Ordered stage list wrapped around a handler.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn builder(auth: Authenticate) -> PipelineBuilder {
        PipelineBuilder { auth, gate: None }
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run `handler` for `call` through every stage.
    pub async fn run<T, F, Fut>(&self, call: Call<'_>, handler: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, Error>> + Send,
        T: Send,
    {
        for (entered, stage) in self.stages.iter().enumerate() {
            if let Err(e) = stage.before(&call).await {
                return Err(self.unwind(&call, entered, Error::Api(e)));
            }
        }
        handler()
            .await
            .map_err(|e| self.unwind(&call, self.stages.len(), e))
    }

    fn unwind(&self, call: &Call<'_>, entered: usize, error: Error) -> ApiError {
        let error = self.stages[..entered]
            .iter()
            .rev()
            .fold(error, |error, stage| stage.on_error(call, error));
        match error {
            Error::Api(api) => api,
            _ => ApiError::internal(format!("{} failed unexpectedly", call.operation)),
        }
    }
}

/// Composes stages in the one order every operation uses.
pub struct PipelineBuilder {
    auth: Authenticate,
    gate: Option<Arc<SetupGate>>,
}

impl PipelineBuilder {
    /// Reject calls until setup has completed.
    #[must_use]
    pub fn gated(mut self, gate: Arc<SetupGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn build(self) -> Pipeline {
        let mut stages: Vec<Box<dyn Stage>> =
            vec![Box::new(SchemaValidation), Box::new(self.auth)];
        if let Some(gate) = self.gate {
            stages.push(Box::new(ReadinessGate::new(gate)));
        }
        stages.push(Box::new(Normalize));
        Pipeline { stages }
    }
}
