//! HTTP adapters for OpenAI-compatible endpoints

mod chat_model;
mod reference_search;
mod speech;

pub use chat_model::OpenAiChatModel;
pub use reference_search::LlmReferenceSearcher;
pub use speech::HttpSpeechSynthesizer;

use super::wire::{ChatMessage, ChatRequest, first_choice_text};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from talking to an endpoint
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Connection(e.to_string())
        }
    }
}

/// Where and how to reach one endpoint
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Shared client for one endpoint
struct Endpoint {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl Endpoint {
    fn new(config: EndpointConfig) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST a JSON body and return the raw response bytes
    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Vec<u8>, HttpError> {
        let url = self.url(path);
        debug!(url = %url, model = %self.model, "POST");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let body: String = body.chars().take(500).collect();
            warn!(url = %url, status = status.as_u16(), "Endpoint returned an error");
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(bytes.to_vec())
    }

    /// One chat completion; `Ok(None)` when the model answered nothing
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Option<String>, HttpError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            stream: false,
        };
        let bytes = self.post_json("chat/completions", &request).await?;
        let body =
            std::str::from_utf8(&bytes).map_err(|e| HttpError::InvalidResponse(e.to_string()))?;
        first_choice_text(body).map_err(|e| HttpError::InvalidResponse(e.to_string()))
    }
}
