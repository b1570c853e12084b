//! Domain validation errors for core domain types.
//!
//! These errors are returned by `parse`/`try_new` constructors when an input
//! violates a domain invariant. At the boundary they surface as
//! [`ApiError::InvalidInput`](crate::error::ApiError::InvalidInput).
//!
//! # Examples
//!
//! ```
//! use fleetward::domain::error::DomainError;
//! use fleetward::domain::WorkerName;
//!
//! let result = WorkerName::parse("");
//! assert!(matches!(result, Err(DomainError::EmptyWorkerName)));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Worker names must not be empty.
    #[error("missing required field: worker name")]
    EmptyWorkerName,

    /// Worker names are limited to 63 characters.
    #[error("worker name is {len} characters long, the maximum is 63")]
    WorkerNameTooLong {
        /// Length of the rejected name.
        len: usize,
    },

    /// Worker name contains characters outside the allowed set.
    #[error("invalid worker name '{name}': {reason}")]
    InvalidWorkerName {
        /// The rejected name.
        name: String,
        /// Which rule the name broke.
        reason: &'static str,
    },

    /// Model names must not be empty.
    #[error("missing required field: model name")]
    EmptyModelName,

    /// Quantization level is not one we can provision.
    #[error("unknown quantization '{0}' (expected float16, int8 or int4)")]
    UnknownQuantization(String),

    /// GPU type is not one we can provision.
    #[error("unknown GPU type '{0}' (expected T4, L4, A100, A100-80GB or H100)")]
    UnknownGpuType(String),

    /// GPU count must be a supported attachment size.
    #[error("invalid GPU count {count} (expected 1, 2, 4 or 8)")]
    InvalidGpuCount {
        /// The rejected count.
        count: u32,
    },

    /// A chat completion needs at least one message.
    #[error("missing required field: messages")]
    EmptyMessages,

    /// Message role is not recognised.
    #[error("unknown message role '{0}' (expected system, user or assistant)")]
    UnknownRole(String),

    /// Message content must not be blank.
    #[error("message {index} has empty content")]
    EmptyMessageContent {
        /// Position of the offending message.
        index: usize,
    },

    /// Setup credential payload is not a usable key file.
    #[error("invalid credential payload: {0}")]
    InvalidCredentials(&'static str),

    /// A sampling parameter is outside its accepted range.
    #[error("sampling parameter {field} {reason}")]
    SamplingOutOfRange {
        /// Parameter name.
        field: &'static str,
        /// Accepted range description.
        reason: &'static str,
    },
}
