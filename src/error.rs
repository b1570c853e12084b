use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Kind of a boundary failure.
///
/// Every error that leaves the request pipeline carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Unauthenticated,
    FailedPrecondition,
    NotFound,
    UpstreamUnavailable,
    Internal,
}

impl ErrorKind {
    /// Stable name used in logs and CLI output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Unauthenticated => "unauthenticated",
            Self::FailedPrecondition => "failed_precondition",
            Self::NotFound => "not_found",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary error taxonomy.
///
/// Messages are descriptive and never contain raw upstream error text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::FailedPrecondition(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::Unauthenticated(m)
            | Self::FailedPrecondition(m)
            | Self::NotFound(m)
            | Self::UpstreamUnavailable(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("timed out: {0}")]
    Timeout(String),
}

impl Error {
    /// True for failures caused by an unreachable or unresponsive upstream.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Api(err) => err.kind() == ErrorKind::UpstreamUnavailable,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_kinds_match_variants() {
        assert_eq!(
            ApiError::invalid_input("x").kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ApiError::unauthenticated("x").kind(),
            ErrorKind::Unauthenticated
        );
        assert_eq!(
            ApiError::failed_precondition("x").kind(),
            ErrorKind::FailedPrecondition
        );
        assert_eq!(ApiError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(
            ApiError::upstream_unavailable("x").kind(),
            ErrorKind::UpstreamUnavailable
        );
        assert_eq!(ApiError::internal("x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn api_error_message_strips_prefix() {
        let err = ApiError::not_found("worker 'w2' does not exist");
        assert_eq!(err.message(), "worker 'w2' does not exist");
        assert_eq!(err.to_string(), "not found: worker 'w2' does not exist");
    }

    #[test]
    fn domain_errors_become_invalid_input() {
        let err: ApiError = DomainError::EmptyWorkerName.into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn transient_classification() {
        assert!(Error::Connection("refused".into()).is_transient());
        assert!(Error::Timeout("list".into()).is_transient());
        assert!(!Error::Io(std::io::Error::other("disk")).is_transient());
        assert!(!Error::Api(ApiError::not_found("w1")).is_transient());
    }

    #[test]
    fn error_kind_names_are_snake_case() {
        assert_eq!(ErrorKind::FailedPrecondition.to_string(), "failed_precondition");
        assert_eq!(ErrorKind::UpstreamUnavailable.as_str(), "upstream_unavailable");
    }
}
