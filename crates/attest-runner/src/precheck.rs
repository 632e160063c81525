//! Environment readiness checks.
//!
//! Precheck runs exactly once, before the first apply. If it fails, the run
//! aborts without attempting destroy: nothing was created yet.

use async_trait::async_trait;
use attest_core::{Result, VerifyError};

/// One-time readiness check executed before any step.
#[async_trait]
pub trait Precheck: Send + Sync {
    /// Verifies the environment is ready for a scenario run.
    ///
    /// # Errors
    /// Returns [`VerifyError::Precheck`] when the environment is not ready.
    async fn check(&self) -> Result<()>;
}

/// Precheck requiring a non-empty API token in an environment variable.
#[derive(Debug, Clone)]
pub struct EnvTokenPrecheck {
    var: String,
}

impl EnvTokenPrecheck {
    /// Creates a precheck for the given environment variable.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Resolves the token.
    ///
    /// # Errors
    /// Returns [`VerifyError::Precheck`] if the variable is unset or empty.
    pub fn resolve(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(token) if !token.is_empty() => Ok(token),
            Ok(_) => Err(VerifyError::precheck(format!("{} is empty", self.var))),
            Err(_) => Err(VerifyError::precheck(format!("{} is not set", self.var))),
        }
    }
}

#[async_trait]
impl Precheck for EnvTokenPrecheck {
    async fn check(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_fails() {
        let precheck = EnvTokenPrecheck::new("ATTEST_TEST_TOKEN_SURELY_UNSET");
        let err = precheck.resolve().unwrap_err();
        assert!(matches!(err, VerifyError::Precheck(_)));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_present_variable_resolves() {
        // PATH is set in any sane test environment.
        let precheck = EnvTokenPrecheck::new("PATH");
        assert!(precheck.resolve().is_ok());
    }

    #[tokio::test]
    async fn test_check_delegates_to_resolve() {
        let precheck = EnvTokenPrecheck::new("ATTEST_TEST_TOKEN_SURELY_UNSET");
        assert!(precheck.check().await.is_err());
    }
}
