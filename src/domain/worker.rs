//! Worker identity, status and snapshot types.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::resources::ResourceShape;

const MAX_WORKER_NAME_LEN: usize = 63;

/// Logical worker name chosen by the caller.
///
/// Names follow cloud instance naming rules: 1-63 characters, lowercase
/// ASCII letters, digits and `-`, starting with a letter and not ending with
/// `-`. The inner String is private so every value went through [`parse`](Self::parse).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkerName(String);

impl WorkerName {
    /// Validate and wrap a worker name.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::EmptyWorkerName);
        }
        if name.len() > MAX_WORKER_NAME_LEN {
            return Err(DomainError::WorkerNameTooLong { len: name.len() });
        }
        let invalid = |reason| DomainError::InvalidWorkerName {
            name: name.to_string(),
            reason,
        };
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("must start with a lowercase letter"));
        }
        if name.ends_with('-') {
            return Err(invalid("must not end with '-'"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid(
                "only lowercase letters, digits and '-' are allowed",
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WorkerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WorkerName> for String {
    fn from(name: WorkerName) -> Self {
        name.0
    }
}

/// Opaque resource identifier assigned by the Compute Fleet API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloudId(String);

impl CloudId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CloudId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CloudId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CloudId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Observed lifecycle status of a worker's backing resource.
///
/// `Paused` covers every stopped/suspended/terminated-but-not-deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Provisioning,
    Running,
    Paused,
    Deleting,
    Unknown,
}

impl WorkerStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "Provisioning",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Deleting => "Deleting",
            Self::Unknown => "Unknown",
        }
    }

    /// True when a pending lifecycle operation has nothing left to act on.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Deleting)
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped snapshot of one worker as reported by the fleet.
///
/// Never cached across operations; every lifecycle call fetches a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    pub name: WorkerName,
    pub cloud_id: CloudId,
    pub status: WorkerStatus,
    /// Network address, only meaningful while `Running`.
    pub address: Option<IpAddr>,
    /// Model the worker was provisioned for, when the fleet reports it.
    pub model: Option<String>,
    /// Resource shape requested at creation, when the fleet reports it.
    pub resources: Option<ResourceShape>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Worker {
    /// Create a worker snapshot with no address, model or resources.
    pub fn new(name: WorkerName, cloud_id: impl Into<CloudId>, status: WorkerStatus) -> Self {
        Self {
            name,
            cloud_id: cloud_id.into(),
            status,
            address: None,
            model: None,
            resources: None,
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.address = Some(address);
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: ResourceShape) -> Self {
        self.resources = Some(resources);
        self
    }

    /// True when the worker can be resumed.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.status, WorkerStatus::Paused)
    }

    /// Summary exposed by `listWorkers`.
    #[must_use]
    pub fn summary(&self) -> WorkerSummary {
        WorkerSummary {
            name: self.name.to_string(),
            status: self.status,
            address: self.address.map(|a| a.to_string()),
            model: self.model.clone(),
        }
    }
}

/// Worker view returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub name: String,
    pub status: WorkerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
