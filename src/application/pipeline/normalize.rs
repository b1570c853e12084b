//! Error normalization: the one place unexpected failures become `Internal`.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{Call, Stage};
use crate::error::{ApiError, Error, ErrorKind};

/// Maps every failure onto the boundary taxonomy and logs it once.
pub struct Normalize;

#[async_trait]
impl Stage for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn on_error(&self, call: &Call<'_>, err: Error) -> Error {
        let operation = call.operation.as_str();
        let api = match err {
            Error::Api(api) => {
                match api.kind() {
                    ErrorKind::Internal | ErrorKind::UpstreamUnavailable => {
                        warn!(operation, kind = %api.kind(), error = %api, "Operation failed");
                    }
                    _ => debug!(operation, kind = %api.kind(), error = %api, "Operation rejected"),
                }
                api
            }
            Error::Domain(e) => {
                debug!(operation, error = %e, "Operation rejected");
                ApiError::from(e)
            }
            other if other.is_transient() => {
                warn!(operation, error = %other, "Upstream unavailable");
                ApiError::upstream_unavailable(format!("{operation}: upstream did not respond"))
            }
            other => {
                error!(operation, error = %other, "Unexpected failure");
                ApiError::internal(format!("{operation} failed unexpectedly"))
            }
        };
        Error::Api(api)
    }
}
