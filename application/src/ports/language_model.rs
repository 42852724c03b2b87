//! Language model port
//!
//! Defines the interface for generating a debate turn from a prompt.

use async_trait::async_trait;
use roundtable_domain::DebatePrompt;
use thiserror::Error;

/// Errors that can occur while generating a turn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Text generation collaborator
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the underlying model, for logs
    fn name(&self) -> &str;

    /// Generate the content of one turn
    async fn generate(&self, prompt: &DebatePrompt) -> Result<String, ModelError>;
}
