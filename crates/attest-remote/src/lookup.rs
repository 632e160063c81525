//! Out-of-band existence checks.
//!
//! [`RemoteLookup`] resolves a textual remote identifier against the remote
//! system and answers "is it there?". The identifier must be a base-10 i64;
//! a non-numeric identifier is a caller bug or state corruption, reported as
//! [`VerifyError::Parse`] and never retried. Transport failures propagate
//! unchanged so an outage is never mistaken for absence.

use std::sync::Arc;

use attest_core::{PollConfig, Result, VerifyError};

use crate::api::{ApiError, EndpointApi};

/// Existence lookup over an [`EndpointApi`], with a bounded poll for
/// eventually consistent remotes.
#[derive(Clone)]
pub struct RemoteLookup {
    api: Arc<dyn EndpointApi>,
    poll: PollConfig,
}

impl RemoteLookup {
    /// Creates a lookup with the default polling behavior.
    #[must_use]
    pub fn new(api: Arc<dyn EndpointApi>) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
        }
    }

    /// Sets the polling configuration.
    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Parses a textual remote identifier.
    ///
    /// # Errors
    /// Returns [`VerifyError::Parse`] for anything that is not a base-10
    /// 64-bit signed integer.
    pub fn parse_id(name: &str, remote_id: &str) -> Result<i64> {
        remote_id
            .parse::<i64>()
            .map_err(|source| VerifyError::Parse {
                name: name.to_string(),
                id: remote_id.to_string(),
                source,
            })
    }

    /// Single observation: does an object with this identifier exist?
    ///
    /// # Errors
    /// Returns [`VerifyError::Parse`] for a malformed identifier and
    /// [`VerifyError::Transport`] when the remote call fails; a transport
    /// failure is never reported as absence.
    pub async fn exists(&self, name: &str, remote_id: &str) -> Result<bool> {
        let id = Self::parse_id(name, remote_id)?;
        match self.api.get_endpoint(id).await {
            Ok(_) => Ok(true),
            Err(ApiError::NotFound(_)) => Ok(false),
            Err(ApiError::Transport(msg)) => Err(VerifyError::transport(msg)),
        }
    }

    /// Polls until the object is observed present, or attempts run out.
    ///
    /// Returns the final observation. Parse and transport errors abort the
    /// poll immediately.
    ///
    /// # Errors
    /// Same as [`Self::exists`].
    pub async fn exists_eventually(&self, name: &str, remote_id: &str) -> Result<bool> {
        self.observe_until(name, remote_id, true).await
    }

    /// Polls until the object is observed absent, or attempts run out.
    ///
    /// Returns the final observation. Parse and transport errors abort the
    /// poll immediately.
    ///
    /// # Errors
    /// Same as [`Self::exists`].
    pub async fn absent_eventually(&self, name: &str, remote_id: &str) -> Result<bool> {
        self.observe_until(name, remote_id, false).await
    }

    async fn observe_until(&self, name: &str, remote_id: &str, want: bool) -> Result<bool> {
        let mut found = self.exists(name, remote_id).await?;
        for attempt in 0..self.poll.attempts.saturating_sub(1) {
            if found == want {
                break;
            }
            let delay = self.poll.delay_for(attempt);
            tracing::debug!(
                resource = name,
                id = remote_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                want,
                "remote state not yet settled, polling again"
            );
            tokio::time::sleep(delay).await;
            found = self.exists(name, remote_id).await?;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;

    use super::*;
    use crate::api::{ApiResult, RemoteEndpoint};

    /// Fake API whose answers are scripted per call.
    struct ScriptedApi {
        calls: AtomicU32,
        script: Vec<ApiResult<RemoteEndpoint>>,
    }

    impl ScriptedApi {
        fn new(script: Vec<ApiResult<RemoteEndpoint>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EndpointApi for ScriptedApi {
        async fn get_endpoint(&self, id: i64) -> ApiResult<RemoteEndpoint> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let step = self.script.get(call.min(self.script.len() - 1));
            match step {
                Some(Ok(endpoint)) => Ok(endpoint.clone()),
                Some(Err(ApiError::NotFound(_))) => Err(ApiError::NotFound(id)),
                Some(Err(ApiError::Transport(msg))) => Err(ApiError::transport(msg.clone())),
                None => Err(ApiError::NotFound(id)),
            }
        }
    }

    fn fast_poll(attempts: u32) -> PollConfig {
        PollConfig::new()
            .with_initial_delay(std::time::Duration::from_millis(1))
            .with_max_delay(std::time::Duration::from_millis(2))
            .with_attempts(attempts)
    }

    #[tokio::test]
    async fn test_exists_true_on_success() {
        let api = ScriptedApi::new(vec![Ok(RemoteEndpoint::new(42))]);
        let lookup = RemoteLookup::new(api);
        assert!(lookup.exists("r", "42").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_false_on_not_found() {
        let api = ScriptedApi::new(vec![Err(ApiError::NotFound(42))]);
        let lookup = RemoteLookup::new(api);
        assert!(!lookup.exists("r", "42").await.unwrap());
    }

    #[tokio::test]
    async fn test_transport_error_is_not_absence() {
        let api = ScriptedApi::new(vec![Err(ApiError::transport("connection reset"))]);
        let lookup = RemoteLookup::new(api);
        let err = lookup.exists("r", "42").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_malformed_identifier_is_parse_error() {
        let api = ScriptedApi::new(vec![Ok(RemoteEndpoint::new(42))]);
        let lookup = RemoteLookup::new(api.clone());
        let err = lookup.exists("r", "not-a-number").await.unwrap_err();
        assert!(matches!(err, VerifyError::Parse { .. }));
        // The remote system is never consulted for a malformed id
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_exists_eventually_settles() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::NotFound(42)),
            Err(ApiError::NotFound(42)),
            Ok(RemoteEndpoint::new(42)),
        ]);
        let lookup = RemoteLookup::new(api.clone()).with_poll(fast_poll(5));
        assert!(lookup.exists_eventually("r", "42").await.unwrap());
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_exists_eventually_gives_up() {
        let api = ScriptedApi::new(vec![Err(ApiError::NotFound(42))]);
        let lookup = RemoteLookup::new(api.clone()).with_poll(fast_poll(3));
        assert!(!lookup.exists_eventually("r", "42").await.unwrap());
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_absent_eventually_settles() {
        let api = ScriptedApi::new(vec![
            Ok(RemoteEndpoint::new(42)),
            Err(ApiError::NotFound(42)),
        ]);
        let lookup = RemoteLookup::new(api.clone()).with_poll(fast_poll(4));
        assert!(!lookup.absent_eventually("r", "42").await.unwrap());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_poll_aborts_on_transport_error() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::NotFound(42)),
            Err(ApiError::transport("gateway timeout")),
        ]);
        let lookup = RemoteLookup::new(api.clone()).with_poll(fast_poll(5));
        let err = lookup.exists_eventually("r", "42").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_single_shot_does_not_poll() {
        let api = ScriptedApi::new(vec![Err(ApiError::NotFound(42))]);
        let lookup = RemoteLookup::new(api.clone()).with_poll(PollConfig::single_shot());
        assert!(!lookup.exists_eventually("r", "42").await.unwrap());
        assert_eq!(api.calls(), 1);
    }

    proptest! {
        #[test]
        fn prop_any_i64_parses(id in any::<i64>()) {
            prop_assert_eq!(RemoteLookup::parse_id("r", &id.to_string()).unwrap(), id);
        }

        #[test]
        fn prop_non_numeric_never_parses(raw in "[a-zA-Z_][a-zA-Z0-9_]{0,16}") {
            prop_assert!(RemoteLookup::parse_id("r", &raw).is_err());
        }
    }

    #[test]
    fn test_empty_identifier_fails_parse() {
        assert!(matches!(
            RemoteLookup::parse_id("r", "").unwrap_err(),
            VerifyError::Parse { .. }
        ));
    }
}
