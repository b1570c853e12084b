//! Chat messages and sampling parameters for generation sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

/// One message of the conversation forwarded to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Validate a conversation before it is forwarded.
pub fn validate_messages(messages: &[ChatMessage]) -> Result<(), DomainError> {
    if messages.is_empty() {
        return Err(DomainError::EmptyMessages);
    }
    if let Some(index) = messages.iter().position(|m| m.content.trim().is_empty()) {
        return Err(DomainError::EmptyMessageContent { index });
    }
    Ok(())
}

/// Sampling controls passed through to the worker's generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_length: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.8,
            top_k: 500,
            max_length: 2048,
        }
    }
}

impl SamplingParams {
    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::SamplingOutOfRange {
                field: "temperature",
                reason: "must be between 0.0 and 2.0",
            });
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(DomainError::SamplingOutOfRange {
                field: "top_p",
                reason: "must be between 0.0 and 1.0",
            });
        }
        if self.top_k == 0 {
            return Err(DomainError::SamplingOutOfRange {
                field: "top_k",
                reason: "must be at least 1",
            });
        }
        if !(1..=32_768).contains(&self.max_length) {
            return Err(DomainError::SamplingOutOfRange {
                field: "max_length",
                reason: "must be between 1 and 32768",
            });
        }
        Ok(())
    }
}
