//! Shared HTTP plumbing for the backend gateways.

use crate::dto::ErrorBody;
use parley_core::error::ParleyError;
use reqwest::{Client, Method, RequestBuilder, Response};

/// Base URL plus a pooled `reqwest` client, shared by both gateways.
///
/// No per-request timeout is configured: a slow backend is awaited until it
/// answers or the connection fails.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }
}

/// Maps a `reqwest` failure: undecodable bodies are serialization errors,
/// everything else is a network failure.
pub fn transport_error(err: reqwest::Error) -> ParleyError {
    if err.is_decode() {
        ParleyError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else {
        ParleyError::network(err.to_string())
    }
}

/// Builds a `Server` error from a non-success response.
///
/// Uses the backend's `{ "message": ... }` when present, else the raw body.
pub async fn server_error(response: Response) -> ParleyError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);
    ParleyError::server(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let api = ApiClient::new("http://localhost:5000/");
        assert_eq!(api.url("/api/chats"), "http://localhost:5000/api/chats");
    }
}
