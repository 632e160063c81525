//! Remote API boundary.
//!
//! The remote system is a black box to the verification core; the only
//! operation it consumes is a point lookup by identifier. The error type
//! keeps "the object is not there" structurally distinct from "the call
//! failed", because the predicates upstream must never read an outage as
//! absence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type alias for remote API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors from the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The remote system affirmatively reports that no object has this
    /// identifier.
    #[error("endpoint {0} not found")]
    NotFound(i64),

    /// Any other failure: network, auth, serialization. Never absence.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Returns true if the remote system affirmatively reported absence.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// A notification endpoint as it exists in the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    /// Remote identifier.
    pub id: i64,

    /// Endpoint attributes as reported by the remote system.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl RemoteEndpoint {
    /// Creates an endpoint with the given identifier and no attributes.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Point-lookup seam to the remote system.
///
/// Implementations must be idempotent reads with no side effects.
#[async_trait]
pub trait EndpointApi: Send + Sync {
    /// Fetches the endpoint with the given identifier.
    ///
    /// # Errors
    /// Returns [`ApiError::NotFound`] when the remote system affirmatively
    /// reports absence, [`ApiError::Transport`] for every other failure.
    async fn get_endpoint(&self, id: i64) -> ApiResult<RemoteEndpoint>;
}
