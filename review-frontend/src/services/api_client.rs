//! HTTP plumbing shared by the document and account clients.

use crate::error::ClientError;
use crate::services::auth::TokenStore;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use service_core::observability::{TracedClientExt, TracedRequest};
use std::sync::Arc;

const LOGIN_PATH: &str = "/auth/login";

/// reqwest client bound to the document backend's base URL.
///
/// Every request carries no-cache headers and, except for the login call, the
/// session's bearer token.
pub struct BackendClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl BackendClient {
    pub fn new(client: Client, base_url: impl Into<String>, tokens: Arc<TokenStore>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn prepare(&self, request: TracedRequest, path: &str) -> TracedRequest {
        let request = request
            .header("Cache-Control", "no-cache, no-store")
            .header("Pragma", "no-cache");

        if path.starts_with(LOGIN_PATH) {
            return request;
        }

        request.maybe_bearer_auth(self.tokens.access_token())
    }

    pub(crate) fn get(&self, path: &str) -> TracedRequest {
        self.prepare(self.client.traced_get(&self.url(path)), path)
    }

    pub(crate) fn post(&self, path: &str) -> TracedRequest {
        self.prepare(self.client.traced_post(&self.url(path)), path)
    }

    pub(crate) fn patch(&self, path: &str) -> TracedRequest {
        self.prepare(self.client.traced_patch(&self.url(path)), path)
    }

    pub(crate) fn delete(&self, path: &str) -> TracedRequest {
        self.prepare(self.client.traced_delete(&self.url(path)), path)
    }

    /// Send a request and turn non-2xx responses into [`ClientError::Upstream`].
    pub(crate) async fn send(
        &self,
        request: TracedRequest,
        path: &str,
    ) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Backend request failed");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(path = %path, status = status.as_u16(), "Backend request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        tracing::warn!(
            path = %path,
            status = status.as_u16(),
            message = %message,
            "Backend returned an error"
        );

        Err(ClientError::Upstream {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: TracedRequest,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(request, path).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to decode backend response");
            ClientError::InvalidResponse(format!("{}: {}", path, e))
        })
    }

    pub(crate) async fn send_empty(
        &self,
        request: TracedRequest,
        path: &str,
    ) -> Result<(), ClientError> {
        self.send(request, path).await.map(|_| ())
    }
}

/// `message` from an error body; NestJS-style validation errors send an array.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|item| item.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_reads_string_or_array() {
        assert_eq!(
            upstream_message(r#"{"message":"Document not found"}"#).as_deref(),
            Some("Document not found")
        );
        assert_eq!(
            upstream_message(r#"{"message":["name should not be empty","file is required"]}"#)
                .as_deref(),
            Some("name should not be empty, file is required")
        );
        assert_eq!(upstream_message("<html>oops</html>"), None);
        assert_eq!(upstream_message(r#"{"error":"x"}"#), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = BackendClient::new(
            Client::new(),
            "http://api.local/api/",
            Arc::new(TokenStore::new()),
        );
        assert_eq!(client.base_url(), "http://api.local/api");
        assert_eq!(client.url("/document"), "http://api.local/api/document");
    }
}
