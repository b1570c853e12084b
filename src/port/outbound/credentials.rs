//! Credential persistence port for the one-time setup.

use async_trait::async_trait;

use crate::domain::ServiceAccountKey;
use crate::error::Result;

/// Durable storage for the bootstrap credentials.
///
/// The setup gate starts open when [`is_persisted`](Self::is_persisted) is
/// true at process start.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True when a previous setup persisted credentials.
    fn is_persisted(&self) -> bool;

    /// Persist credentials. Overwrites any previous value.
    async fn persist(&self, key: &ServiceAccountKey) -> Result<()>;
}
