//! Verification checks.
//!
//! A check is a pass/fail assertion against the observed snapshot (and, for
//! existence, against the remote system via out-of-band lookup). Checks run
//! in order within a step; the first failure aborts the rest of the step.

use attest_core::{DeclaredStateSnapshot, OutputSet, Result, VerifyError};
use attest_remote::RemoteLookup;

/// A single verification check within a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// The resource resolves in the snapshot, carries a remote identifier,
    /// and that identifier resolves in the remote system.
    ResourceExists {
        /// Logical resource name.
        name: String,
    },

    /// A resource attribute equals the expected value exactly.
    AttributeEquals {
        /// Logical resource name.
        name: String,
        /// Attribute key.
        key: String,
        /// Expected value (string equality, no normalization).
        expected: String,
    },

    /// A derived output equals the resource's own remote identifier,
    /// catching propagation bugs between the resource and output layers.
    OutputMatchesId {
        /// Logical resource name the output references.
        name: String,
        /// Output name.
        output: String,
    },
}

impl Check {
    /// Existence check for a logical resource name.
    #[must_use]
    pub fn exists(name: impl Into<String>) -> Self {
        Self::ResourceExists { name: name.into() }
    }

    /// Attribute equality check.
    #[must_use]
    pub fn attribute(
        name: impl Into<String>,
        key: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::AttributeEquals {
            name: name.into(),
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Output consistency check.
    #[must_use]
    pub fn output(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self::OutputMatchesId {
            name: name.into(),
            output: output.into(),
        }
    }

    /// Evaluates the check against the observed state.
    ///
    /// # Errors
    /// Returns the first failure: `NotFound`, `EmptyIdentifier`,
    /// `RemoteMissing`, `Mismatch`, or a propagated `Parse`/`Transport`
    /// error from the lookup.
    pub async fn eval(
        &self,
        snapshot: &DeclaredStateSnapshot,
        outputs: &OutputSet,
        lookup: &RemoteLookup,
    ) -> Result<()> {
        match self {
            Self::ResourceExists { name } => {
                let resource = snapshot.resource(name)?;
                if !resource.is_provisioned() {
                    return Err(VerifyError::empty_identifier(name));
                }
                if !lookup.exists_eventually(name, &resource.remote_id).await? {
                    return Err(VerifyError::RemoteMissing {
                        name: name.clone(),
                        id: resource.remote_id.clone(),
                    });
                }
                Ok(())
            }

            Self::AttributeEquals {
                name,
                key,
                expected,
            } => {
                let resource = snapshot.resource(name)?;
                let actual = resource.attribute(key).unwrap_or_default();
                if actual != expected {
                    return Err(VerifyError::Mismatch {
                        name: name.clone(),
                        key: key.clone(),
                        expected: expected.clone(),
                        actual: actual.to_string(),
                    });
                }
                Ok(())
            }

            Self::OutputMatchesId { name, output } => {
                let resource = snapshot.resource(name)?;
                if !resource.is_provisioned() {
                    return Err(VerifyError::empty_identifier(name));
                }
                let value = outputs.value(output)?;
                if value != resource.remote_id {
                    return Err(VerifyError::Mismatch {
                        name: name.clone(),
                        key: output.clone(),
                        expected: resource.remote_id.clone(),
                        actual: value.to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceExists { name } => write!(f, "exists({name})"),
            Self::AttributeEquals { name, key, expected } => {
                write!(f, "attribute({name}.{key} == {expected:?})")
            }
            Self::OutputMatchesId { name, output } => {
                write!(f, "output({output} == {name}.id)")
            }
        }
    }
}

/// Destroy-completeness: no resource tracked in the snapshot may still
/// resolve in the remote system.
///
/// Completeness is universally quantified, so every resource is examined in
/// deterministic snapshot order; the first survivor fails the whole check.
/// A malformed identifier here indicates state corruption and is fatal, not
/// skipped.
///
/// # Errors
/// Returns [`VerifyError::ResidualObject`] naming the first surviving
/// resource, or a propagated `Parse`/`Transport` error.
pub async fn check_destroy_complete(
    snapshot: &DeclaredStateSnapshot,
    lookup: &RemoteLookup,
) -> Result<()> {
    for (name, resource) in snapshot.iter() {
        if lookup.absent_eventually(name, &resource.remote_id).await? {
            return Err(VerifyError::ResidualObject {
                name: name.to_string(),
                id: resource.remote_id.clone(),
            });
        }
        tracing::debug!(resource = name, id = %resource.remote_id, "destroy confirmed");
    }
    Ok(())
}
