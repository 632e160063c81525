//! HTTP implementation of the remote API boundary.
//!
//! Issues bounded GET requests against the notification-endpoint API and
//! maps the response onto the NotFound/transport split: only an explicit
//! 404 counts as absence, every other failure is a transport error.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{ApiError, ApiResult, EndpointApi, RemoteEndpoint};

/// Header carrying the API token.
const TOKEN_HEADER: &str = "X-API-TOKEN";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire shape of an endpoint record.
///
/// Only the identifier is structural; everything else is carried through
/// as opaque attributes.
#[derive(Debug, Deserialize)]
struct EndpointWire {
    id: i64,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl From<EndpointWire> for RemoteEndpoint {
    fn from(wire: EndpointWire) -> Self {
        let attributes = wire
            .extra
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Self {
            id: wire.id,
            attributes,
        }
    }
}

/// Reqwest-backed [`EndpointApi`].
pub struct HttpEndpointApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpEndpointApi {
    /// Creates a client for the given API base URL and token.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn endpoint_url(&self, id: i64) -> String {
        format!("{}/v1/endpoints/{id}", self.base_url)
    }
}

#[async_trait]
impl EndpointApi for HttpEndpointApi {
    async fn get_endpoint(&self, id: i64) -> ApiResult<RemoteEndpoint> {
        let url = self.endpoint_url(id);
        tracing::debug!(url = %url, "remote endpoint lookup");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id));
        }
        if !status.is_success() {
            return Err(ApiError::transport(format!("GET {url} returned {status}")));
        }

        let wire: EndpointWire = response
            .json()
            .await
            .map_err(|e| ApiError::transport(format!("invalid endpoint body from {url}: {e}")))?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpEndpointApi::new("https://api.example.test/", "token").unwrap();
        assert_eq!(
            api.endpoint_url(42),
            "https://api.example.test/v1/endpoints/42"
        );
    }

    #[test]
    fn test_wire_attributes_flatten() {
        let wire: EndpointWire = serde_json::from_str(
            r#"{"id": 7, "title": "my_slack_title", "endpointType": "slack", "retries": 3}"#,
        )
        .unwrap();
        let endpoint: RemoteEndpoint = wire.into();

        assert_eq!(endpoint.id, 7);
        assert_eq!(
            endpoint.attributes.get("title").map(String::as_str),
            Some("my_slack_title")
        );
        // Non-string values are carried through as JSON text
        assert_eq!(
            endpoint.attributes.get("retries").map(String::as_str),
            Some("3")
        );
    }

    #[test]
    fn test_wire_requires_id() {
        let result: Result<EndpointWire, _> =
            serde_json::from_str(r#"{"title": "my_slack_title"}"#);
        assert!(result.is_err());
    }
}
