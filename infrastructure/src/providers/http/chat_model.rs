//! Turn generation through `/chat/completions`

use super::{Endpoint, EndpointConfig, HttpError};
use crate::providers::wire::ChatMessage;
use async_trait::async_trait;
use roundtable_application::{LanguageModel, ModelError};
use roundtable_domain::DebatePrompt;

/// [`LanguageModel`] backed by an OpenAI-compatible chat endpoint
pub struct OpenAiChatModel {
    endpoint: Endpoint,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatModel {
    pub fn new(config: EndpointConfig, temperature: f32, max_tokens: u32) -> Result<Self, HttpError> {
        Ok(Self {
            endpoint: Endpoint::new(config)?,
            temperature,
            max_tokens,
        })
    }
}

impl From<HttpError> for ModelError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Timeout => ModelError::Timeout,
            HttpError::Connection(msg) => ModelError::ConnectionError(msg),
            HttpError::Status { .. } => ModelError::RequestFailed(e.to_string()),
            HttpError::Client(msg) | HttpError::InvalidResponse(msg) => ModelError::Other(msg),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.endpoint.model
    }

    async fn generate(&self, prompt: &DebatePrompt) -> Result<String, ModelError> {
        let messages = vec![
            ChatMessage::system(&prompt.system),
            ChatMessage::user(&prompt.user),
        ];
        self.endpoint
            .chat(messages, self.temperature, self.max_tokens)
            .await?
            .ok_or(ModelError::EmptyResponse)
    }
}
