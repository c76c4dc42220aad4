//! Network seam between the chat widget and the question-answering service.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::QueryPayload;

/// Why a single exchange produced no decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The request never completed (DNS, connect, TLS, reset, ...).
    Transport { url: String, message: String },
    /// A response arrived but its body was not JSON.
    Decode { url: String, message: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Transport { url, message } => {
                write!(f, "Request to {url} failed: {message}")
            }
            DispatchError::Decode { url, message } => {
                write!(f, "Response from {url} was not valid JSON: {message}")
            }
        }
    }
}

impl StdError for DispatchError {}

/// One request/response call; no streaming, no retries.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn post(
        &self,
        url: &str,
        payload: &QueryPayload,
    ) -> Result<serde_json::Value, DispatchError>;
}

#[derive(Clone, Default)]
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    async fn post(
        &self,
        url: &str,
        payload: &QueryPayload,
    ) -> Result<serde_json::Value, DispatchError> {
        debug!(%url, "dispatching chat query");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|err| DispatchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        // Status is informational only: error bodies are still read for an answer.
        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "chat backend returned a non-success status");
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| DispatchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            })?;

        serde_json::from_slice(&bytes).map_err(|err| DispatchError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}
