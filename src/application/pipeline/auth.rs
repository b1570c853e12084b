//! Bearer-token authentication stage.

use async_trait::async_trait;
use tracing::warn;

use super::{Call, Stage};
use crate::error::ApiError;

/// Accepts callers presenting the configured API token.
///
/// The authorization value may be `Bearer <token>` or the bare token. With no
/// token configured every call is rejected.
pub struct Authenticate {
    token: Option<String>,
}

impl Authenticate {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    fn check(&self, authorization: Option<&str>) -> Result<(), &'static str> {
        let expected = self.token.as_deref().ok_or("no API token is configured")?;
        let presented = authorization.ok_or("missing credentials")?.trim();
        let presented = presented
            .strip_prefix("Bearer ")
            .or_else(|| presented.strip_prefix("bearer "))
            .unwrap_or(presented)
            .trim();
        if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            Ok(())
        } else {
            Err("invalid credentials")
        }
    }
}

#[async_trait]
impl Stage for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn before(&self, call: &Call<'_>) -> Result<(), ApiError> {
        self.check(call.caller.authorization()).map_err(|reason| {
            warn!(operation = call.operation.as_str(), reason, "Rejected unauthenticated call");
            ApiError::unauthenticated(reason)
        })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
