//! Verification error taxonomy.
//!
//! Every fallible call site produces a typed error that callers must handle
//! explicitly. In particular, identifier parse failures are never discarded:
//! a malformed remote identifier indicates state corruption and is fatal to
//! the whole run, not just the current step.

use std::time::Duration;

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors produced while verifying declared-state-to-remote-state
/// reconciliation.
///
/// Transport failures are deliberately distinct from [`Self::RemoteMissing`]:
/// conflating "the call failed" with "the object is absent" turns
/// infrastructure flakes into false verification results.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Remote identifier is not a base-10 64-bit signed integer.
    #[error("malformed remote identifier {id:?} for {name}: {source}")]
    Parse {
        /// Logical name of the resource carrying the identifier.
        name: String,
        /// The raw identifier text that failed to parse.
        id: String,
        /// Underlying integer parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// A logical resource name or output name is absent from the snapshot.
    #[error("not found in snapshot: {0}")]
    NotFound(String),

    /// Resource is declared but was never provisioned (empty remote id).
    ///
    /// Distinguishes "never created" from "created then deleted".
    #[error("no remote identifier set for {0}")]
    EmptyIdentifier(String),

    /// Remote lookup affirmatively reported absence where presence was
    /// required.
    #[error("remote object missing for {name} (id {id})")]
    RemoteMissing {
        /// Logical name of the resource.
        name: String,
        /// The remote identifier that failed to resolve.
        id: String,
    },

    /// Remote call failed for infrastructure reasons (network, auth,
    /// serialization). Never interpreted as absence.
    #[error("transport error: {0}")]
    Transport(String),

    /// A derived value diverged from the value it references.
    #[error("mismatch for {name}/{key}: expected {expected:?}, got {actual:?}")]
    Mismatch {
        /// Logical name of the resource being compared.
        name: String,
        /// Attribute or output name that diverged.
        key: String,
        /// Expected value.
        expected: String,
        /// Observed value.
        actual: String,
    },

    /// A remote object survived destroy.
    #[error("residual object after destroy: {name} (id {id})")]
    ResidualObject {
        /// Logical name of the surviving resource.
        name: String,
        /// Its remote identifier.
        id: String,
    },

    /// Environment readiness check failed before any apply.
    #[error("precheck failed: {0}")]
    Precheck(String),

    /// Invalid harness configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Engine apply failed where success was required.
    #[error("apply failed: {0}")]
    Apply(String),

    /// Engine apply succeeded where a matching failure was required.
    #[error("apply succeeded but an error matching {0:?} was expected")]
    UnexpectedSuccess(String),

    /// Engine apply failed, but the error text did not match the expected
    /// pattern.
    #[error("error text did not match {pattern:?}: {text}")]
    ErrorMismatch {
        /// The expected-error pattern.
        pattern: String,
        /// The error text the engine actually emitted.
        text: String,
    },

    /// Engine destroy failed.
    #[error("destroy failed: {0}")]
    Destroy(String),

    /// An apply or verify call exceeded its deadline.
    #[error("step timed out after {0:?}")]
    Timeout(Duration),
}

impl VerifyError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates an empty-identifier error.
    #[must_use]
    pub fn empty_identifier(name: impl Into<String>) -> Self {
        Self::EmptyIdentifier(name.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a precheck error.
    #[must_use]
    pub fn precheck(msg: impl Into<String>) -> Self {
        Self::Precheck(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an apply error.
    #[must_use]
    pub fn apply(msg: impl Into<String>) -> Self {
        Self::Apply(msg.into())
    }

    /// Creates a destroy error.
    #[must_use]
    pub fn destroy(msg: impl Into<String>) -> Self {
        Self::Destroy(msg.into())
    }

    /// Returns true if this error indicates state corruption or leaked
    /// remote objects, i.e. it fails the whole run rather than one step.
    #[must_use]
    pub const fn is_fatal_to_run(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::ResidualObject { .. } | Self::Precheck(_)
        )
    }

    /// Returns true if this error came from remote-call infrastructure
    /// rather than from observed state.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_resource() {
        let err = VerifyError::RemoteMissing {
            name: "logzio_endpoint.slack".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote object missing for logzio_endpoint.slack (id 42)"
        );
    }

    #[test]
    fn test_parse_error_is_fatal_to_run() {
        let source = "not-a-number".parse::<i64>().unwrap_err();
        let err = VerifyError::Parse {
            name: "logzio_endpoint.slack".to_string(),
            id: "not-a-number".to_string(),
            source,
        };
        assert!(err.is_fatal_to_run());
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_residual_object_is_fatal_to_run() {
        let err = VerifyError::ResidualObject {
            name: "logzio_endpoint.custom".to_string(),
            id: "7".to_string(),
        };
        assert!(err.is_fatal_to_run());
    }

    #[test]
    fn test_step_failures_are_not_fatal_to_run() {
        assert!(!VerifyError::not_found("x").is_fatal_to_run());
        assert!(!VerifyError::empty_identifier("x").is_fatal_to_run());
        assert!(!VerifyError::transport("connection reset").is_fatal_to_run());
    }

    #[test]
    fn test_transport_classification() {
        assert!(VerifyError::transport("timeout").is_transport());
        assert!(!VerifyError::not_found("x").is_transport());
    }

    #[test]
    fn test_mismatch_display() {
        let err = VerifyError::Mismatch {
            name: "logzio_endpoint.slack".to_string(),
            key: "title".to_string(),
            expected: "my_slack_title".to_string(),
            actual: "other".to_string(),
        };
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("my_slack_title"));
    }

    #[test]
    fn test_timeout_display() {
        let err = VerifyError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("30"));
    }
}
