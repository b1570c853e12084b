//! Boundary request types and their schema validation.
//!
//! Requests arrive as loosely typed wire data. [`Validate`] checks them
//! without touching any collaborator; the `parse` methods turn a request into
//! the validated command the application layer consumes.

use serde::{Deserialize, Serialize};

use crate::domain::{
    validate_messages, ChatMessage, ResourceShape, Role, SamplingParams, WorkerName,
};
use crate::error::ApiError;
use crate::port::outbound::worker::GenerationRequest;

/// Schema validation run by the pipeline before any handler executes.
pub trait Validate: Send + Sync {
    /// Reject malformed input with [`ApiError::InvalidInput`].
    fn validate(&self) -> Result<(), ApiError>;
}

impl Validate for () {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::invalid_input(format!(
            "missing required field: {field}"
        )));
    }
    Ok(value)
}

/// Input of the one-time setup operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRequest {
    /// Text of the cloud service-account key file.
    #[serde(default)]
    pub key_file: Option<String>,
}

impl SetupRequest {
    pub fn with_key_file(key_file: impl Into<String>) -> Self {
        Self {
            key_file: Some(key_file.into()),
        }
    }

    /// Readiness probe: no payload.
    #[must_use]
    pub fn probe() -> Self {
        Self::default()
    }
}

impl Validate for SetupRequest {
    // Payload contents are checked by the handler after the idempotency
    // check, so a completed setup accepts any input.
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Input of `createWorker`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkerRequest {
    pub model: String,
    pub quantization: String,
    pub gpu_type: String,
    pub gpu_count: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated `createWorker` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorker {
    pub model: String,
    pub resources: ResourceShape,
    pub name: Option<WorkerName>,
}

impl CreateWorkerRequest {
    pub fn parse(&self) -> Result<CreateWorker, ApiError> {
        let model = require("model", &self.model)?;
        let quantization = require("quantization", &self.quantization)?;
        let gpu_type = require("gpu_type", &self.gpu_type)?;
        let resources = ResourceShape::parse(quantization, gpu_type, self.gpu_count)?;
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(WorkerName::parse(name)?),
            _ => None,
        };
        Ok(CreateWorker {
            model: model.to_string(),
            resources,
            name,
        })
    }
}

impl Validate for CreateWorkerRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.parse().map(drop)
    }
}

/// Input of the single-worker lifecycle operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub name: String,
}

impl WorkerRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn parse(&self) -> Result<WorkerName, ApiError> {
        Ok(WorkerName::parse(&self.name)?)
    }
}

impl Validate for WorkerRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.parse().map(drop)
    }
}

/// One chat message as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInput {
    pub role: String,
    pub content: String,
}

impl MessageInput {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Input of `chatCompletion`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub worker: String,
    pub messages: Vec<MessageInput>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub max_length: Option<u32>,
}

/// Validated `chatCompletion` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCommand {
    pub worker: WorkerName,
    pub request: GenerationRequest,
}

impl ChatRequest {
    pub fn new(worker: impl Into<String>, messages: Vec<MessageInput>) -> Self {
        Self {
            worker: worker.into(),
            messages,
            ..Default::default()
        }
    }

    pub fn parse(&self) -> Result<ChatCommand, ApiError> {
        let worker = WorkerName::parse(&self.worker)?;
        let messages = self
            .messages
            .iter()
            .map(|m| Ok(ChatMessage::new(m.role.parse::<Role>()?, m.content.clone())))
            .collect::<Result<Vec<_>, ApiError>>()?;
        validate_messages(&messages)?;

        let defaults = SamplingParams::default();
        let sampling = SamplingParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            top_p: self.top_p.unwrap_or(defaults.top_p),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            max_length: self.max_length.unwrap_or(defaults.max_length),
        };
        sampling.validate()?;

        Ok(ChatCommand {
            worker,
            request: GenerationRequest { messages, sampling },
        })
    }
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.parse().map(drop)
    }
}
