//! File-backed credential persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::ServiceAccountKey;
use crate::error::Result;
use crate::port::outbound::credentials::CredentialStore;

/// Stores the key file payload at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    fn is_persisted(&self) -> bool {
        self.path.is_file()
    }

    async fn persist(&self, key: &ServiceAccountKey) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, key.raw()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        info!(path = %self.path.display(), project = key.project_id(), "Persisted credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::key_file;

    #[tokio::test]
    async fn persists_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/state/credentials.json"));
        assert!(!store.is_persisted());

        let key = ServiceAccountKey::parse(&key_file("demo")).unwrap();
        store.persist(&key).await.unwrap();

        assert!(store.is_persisted());
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, key.raw());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        let key = ServiceAccountKey::parse(&key_file("demo")).unwrap();
        store.persist(&key).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        for project in ["first", "second"] {
            let key = ServiceAccountKey::parse(&key_file(project)).unwrap();
            store.persist(&key).await.unwrap();
        }
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("second"));
    }
}
