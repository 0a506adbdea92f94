//! Single-attempt client for remote generation endpoints.
//!
//! One request per endpoint per alert, bounded by the endpoint's
//! configured timeout. The response decoder is selected by the declared
//! format in configuration — the payload is never probed to guess its
//! shape.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::{EndpointConfig, ResponseFormat};

/// Errors from one remote generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response carried no usable text")]
    EmptyText,

    #[error("decode error: {0}")]
    Decode(String),
}

/// One generation attempt against one endpoint. Implemented over HTTP in
/// production and by counting stubs in tests.
#[async_trait]
pub trait RemoteClient: Send + Sync + 'static {
    async fn attempt(&self, endpoint: &EndpointConfig, prompt: &str)
        -> Result<String, RemoteError>;
}

/// Production client: shared `reqwest::Client`, per-endpoint timeout.
pub struct HttpRemoteClient {
    client: reqwest::Client,
}

impl HttpRemoteClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpRemoteClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn attempt(
        &self,
        endpoint: &EndpointConfig,
        prompt: &str,
    ) -> Result<String, RemoteError> {
        let body = request_body(endpoint, prompt);

        let mut request = self
            .client
            .post(&endpoint.url)
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .json(&body);
        if let Some(key) = &endpoint.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        extract_text(endpoint.format, &payload)
    }
}

/// Build the request body for the endpoint's declared format.
fn request_body(endpoint: &EndpointConfig, prompt: &str) -> Value {
    match endpoint.format {
        ResponseFormat::ChatCompletions => {
            let mut body = json!({
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": endpoint.max_tokens,
            });
            if let Some(model) = &endpoint.model {
                body["model"] = json!(model);
            }
            body
        }
        ResponseFormat::TextGeneration => json!({
            "inputs": prompt,
            "parameters": {"max_new_tokens": endpoint.max_tokens},
        }),
    }
}

/// Extract the generated text for a known response shape.
fn extract_text(format: ResponseFormat, payload: &Value) -> Result<String, RemoteError> {
    let text = match format {
        ResponseFormat::ChatCompletions => payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteError::Decode("missing choices[0].message.content".into()))?,
        ResponseFormat::TextGeneration => payload
            .get("generated_text")
            .or_else(|| payload.get(0).and_then(|e| e.get("generated_text")))
            .and_then(Value::as_str)
            .ok_or_else(|| RemoteError::Decode("missing generated_text".into()))?,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(RemoteError::EmptyText);
    }
    Ok(text.to_string())
}
