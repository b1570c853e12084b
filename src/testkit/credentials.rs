//! In-memory [`CredentialStore`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::ServiceAccountKey;
use crate::error::{Error, Result};
use crate::port::CredentialStore;

#[derive(Default)]
pub struct MemoryCredentialStore {
    key: Mutex<Option<ServiceAccountKey>>,
    previously_persisted: bool,
    persist_count: AtomicUsize,
    fail_next: AtomicBool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that reports credentials from an earlier run.
    pub fn persisted() -> Self {
        Self {
            previously_persisted: true,
            ..Self::default()
        }
    }

    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    pub fn stored_project(&self) -> Option<String> {
        self.key.lock().as_ref().map(|k| k.project_id().to_string())
    }

    pub fn fail_next_persist(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn is_persisted(&self) -> bool {
        self.previously_persisted || self.key.lock().is_some()
    }

    async fn persist(&self, key: &ServiceAccountKey) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::Io(std::io::Error::other("read-only file system")));
        }
        *self.key.lock() = Some(key.clone());
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
