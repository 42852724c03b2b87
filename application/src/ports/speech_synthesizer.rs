//! Speech synthesis port

use async_trait::async_trait;
use roundtable_domain::AudioClip;
use thiserror::Error;

/// Errors from speech synthesis. A failed synthesis degrades the turn to
/// text only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("Synthesis request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `text` with the given voice tag
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip, SynthesisError>;
}
