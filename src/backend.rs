//! Remote assistant backend for the AutoStream chat client
//!
//! This module defines the backend trait the request orchestrator talks to,
//! along with the wire types and the HTTP implementation. One request is
//! issued per turn, carrying the literal submitted text and the current
//! session token; the response carries the reply and, optionally, an
//! updated session token.
//!
//! Timeouts are the transport's concern: the HTTP client enforces the
//! configured request timeout and surfaces expiry as an ordinary failure.

use crate::config::BackendConfig;
use crate::error::{ChatClientError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for one chat turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The literal submitted text
    pub message: String,
    /// The current session token
    pub session_id: String,
}

/// Response body for one chat turn
///
/// A body lacking a usable `reply` fails deserialization and is treated as
/// a transport failure by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// The assistant's reply text
    pub reply: String,
    /// Updated session token, when the service issues one
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Remote assistant endpoint contract
///
/// The orchestrator depends on this trait rather than on a concrete HTTP
/// client, which is also the seam tests mock.
///
/// # Examples
///
/// ```no_run
/// use autostream::backend::{AssistantBackend, ChatReply};
/// use autostream::error::Result;
/// use async_trait::async_trait;
///
/// struct CannedBackend;
///
/// #[async_trait]
/// impl AssistantBackend for CannedBackend {
///     async fn send_message(&self, _message: &str, _session_id: &str) -> Result<ChatReply> {
///         Ok(ChatReply { reply: "Hello!".to_string(), session_id: None })
///     }
/// }
/// ```
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Sends one user turn and awaits the assistant's reply
    ///
    /// # Errors
    ///
    /// Returns error on any transport failure, non-success status, or
    /// malformed response body.
    async fn send_message(&self, message: &str, session_id: &str) -> Result<ChatReply>;
}

/// HTTP implementation of the assistant backend
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    /// Creates a backend for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("autostream/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatClientError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized assistant backend: endpoint={}", config.endpoint);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn send_message(&self, message: &str, session_id: &str) -> Result<ChatReply> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: session_id.to_string(),
        };

        tracing::debug!("Sending chat turn to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Chat request failed: {}", e);
                ChatClientError::Backend(format!("Failed to reach assistant service: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Assistant service returned {}: {}", status, error_text);
            return Err(ChatClientError::Backend(format!(
                "Assistant service returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse assistant response: {}", e);
            ChatClientError::Backend(format!("Malformed assistant response: {}", e))
        })?;

        Ok(reply)
    }
}
