//! Cloud service-account key supplied during one-time setup.

use std::fmt;

use super::error::DomainError;

/// Parsed service-account key file.
///
/// The raw text is kept verbatim for persistence; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountKey {
    project_id: String,
    raw: String,
}

impl ServiceAccountKey {
    /// Parse key-file text. It must be a JSON object with a non-empty
    /// `project_id` string.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidCredentials("key file is empty"));
        }
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|_| DomainError::InvalidCredentials("key file is not valid JSON"))?;
        let object = value
            .as_object()
            .ok_or(DomainError::InvalidCredentials("key file must be a JSON object"))?;
        let project_id = object
            .get("project_id")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(DomainError::InvalidCredentials("key file has no project_id"))?;

        Ok(Self {
            project_id: project_id.to_string(),
            raw: text.to_string(),
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_file() {
        let key = ServiceAccountKey::parse(
            r#"{"type": "service_account", "project_id": "demo", "private_key": "secret"}"#,
        )
        .unwrap();
        assert_eq!(key.project_id(), "demo");
        assert!(key.raw().contains("secret"));
    }

    #[test]
    fn debug_hides_key_material() {
        let key = ServiceAccountKey::parse(r#"{"project_id": "demo", "private_key": "secret"}"#)
            .unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("demo"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn rejects_malformed_payloads() {
        for text in ["", "not json", "[1, 2]", r#"{"type": "service_account"}"#, r#"{"project_id": " "}"#] {
            assert!(
                matches!(
                    ServiceAccountKey::parse(text),
                    Err(DomainError::InvalidCredentials(_))
                ),
                "{text:?} should be rejected"
            );
        }
    }
}
