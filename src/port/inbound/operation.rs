//! Boundary operation identifiers and caller identity.

use std::fmt;

/// Every operation exposed at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Setup,
    ListModels,
    ListWorkers,
    CreateWorker,
    PauseWorker,
    ResumeWorker,
    DeleteWorker,
    ChatCompletion,
}

impl Operation {
    pub const ALL: [Self; 8] = [
        Self::Setup,
        Self::ListModels,
        Self::ListWorkers,
        Self::CreateWorker,
        Self::PauseWorker,
        Self::ResumeWorker,
        Self::DeleteWorker,
        Self::ChatCompletion,
    ];

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::ListModels => "listModels",
            Self::ListWorkers => "listWorkers",
            Self::CreateWorker => "createWorker",
            Self::PauseWorker => "pauseWorker",
            Self::ResumeWorker => "resumeWorker",
            Self::DeleteWorker => "deleteWorker",
            Self::ChatCompletion => "chatCompletion",
        }
    }

    /// True for operations behind the setup-readiness gate.
    #[must_use]
    pub const fn is_gated(self) -> bool {
        !matches!(self, Self::Setup)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials presented by the caller of an operation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Caller {
    authorization: Option<String>,
}

impl Caller {
    /// Caller presenting an authorization value (`Bearer <token>` or a bare token).
    pub fn new(authorization: impl Into<String>) -> Self {
        Self {
            authorization: Some(authorization.into()),
        }
    }

    pub fn bearer(token: &str) -> Self {
        Self::new(format!("Bearer {token}"))
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.authorization.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };
        f.debug_struct("Caller")
            .field("authorization", &shown)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_setup_is_ungated() {
        let ungated: Vec<_> = Operation::ALL.iter().filter(|op| !op.is_gated()).collect();
        assert_eq!(ungated, vec![&Operation::Setup]);
    }

    #[test]
    fn caller_debug_hides_token() {
        let caller = Caller::bearer("s3cret");
        assert!(!format!("{caller:?}").contains("s3cret"));
        assert_eq!(caller.authorization(), Some("Bearer s3cret"));
        assert_eq!(Caller::anonymous().authorization(), None);
    }
}
