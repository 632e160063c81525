//! Declarative-configuration engine boundary.
//!
//! The engine parses declaration documents and drives create/read/update/
//! delete calls against the remote system. This crate treats it as a black
//! box: submit a document, observe the resulting snapshot and outputs, and
//! later ask it to destroy what it tracked.

use async_trait::async_trait;
use attest_core::{DeclaredStateSnapshot, OutputSet};

/// Result type alias for engine calls.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors emitted by the configuration engine.
///
/// The `Apply` variant renders as the engine's raw error text, because
/// expected-error steps match a regular expression against exactly that
/// text.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Apply failed; the payload is the engine's rendered error text.
    #[error("{0}")]
    Apply(String),

    /// Destroy failed.
    #[error("destroy error: {0}")]
    Destroy(String),
}

impl EngineError {
    /// Creates an apply error with the given rendered text.
    #[must_use]
    pub fn apply(msg: impl Into<String>) -> Self {
        Self::Apply(msg.into())
    }

    /// Creates a destroy error.
    #[must_use]
    pub fn destroy(msg: impl Into<String>) -> Self {
        Self::Destroy(msg.into())
    }
}

/// Everything the engine observed after a successful apply.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// The post-apply declared-state snapshot.
    pub snapshot: DeclaredStateSnapshot,

    /// Derived outputs computed alongside the snapshot.
    pub outputs: OutputSet,
}

impl ApplyOutcome {
    /// Creates an outcome from its parts.
    #[must_use]
    pub fn new(snapshot: DeclaredStateSnapshot, outputs: OutputSet) -> Self {
        Self { snapshot, outputs }
    }
}

/// Seam to the external declarative-configuration engine.
#[async_trait]
pub trait ConfigEngine: Send + Sync {
    /// Applies a declaration document, reconciling remote state to it.
    ///
    /// # Errors
    /// Returns [`EngineError::Apply`] with the engine's rendered error text
    /// when reconciliation fails.
    async fn apply(&self, document: &str) -> EngineResult<ApplyOutcome>;

    /// Destroys every resource tracked in the snapshot.
    ///
    /// # Errors
    /// Returns [`EngineError::Destroy`] when teardown fails.
    async fn destroy(&self, snapshot: &DeclaredStateSnapshot) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_error_renders_raw_text() {
        let err = EngineError::apply("api call failed: Bad URL provided");
        assert_eq!(err.to_string(), "api call failed: Bad URL provided");
    }

    #[test]
    fn test_destroy_error_is_labelled() {
        let err = EngineError::destroy("remote refused");
        assert_eq!(err.to_string(), "destroy error: remote refused");
    }
}
