//! Deterministic providers that never leave the process
//!
//! Used by `--offline` runs and by tests that exercise the whole stack
//! without network access.

use super::speech_input::{estimate_duration_secs, prepare_input};
use async_trait::async_trait;
use roundtable_application::{
    LanguageModel, ModelError, RetrievalError, RetrievalProvider, SpeechSynthesizer,
    SynthesisError,
};
use roundtable_domain::{AudioClip, DebatePrompt, Reference, Role, Topic};
use std::time::Duration;

/// Writes a short statement from the speaker named in the system prompt
#[derive(Debug, Clone, Default)]
pub struct OfflineLanguageModel {
    latency: Duration,
}

impl OfflineLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering, to mimic a remote model
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// `"You are {name}, {title}."` → `(name, title)`
fn speaker_of(system: &str) -> (&str, &str) {
    let intro = system
        .strip_prefix("You are ")
        .and_then(|rest| rest.split_once('.'))
        .map(|(intro, _)| intro)
        .unwrap_or("a participant");
    intro.split_once(", ").unwrap_or((intro, "participant"))
}

/// Number of transcript lines shown to the speaker
fn history_len(user: &str) -> usize {
    user.lines().filter(|l| l.starts_with("[Round ")).count()
}

#[async_trait]
impl LanguageModel for OfflineLanguageModel {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, prompt: &DebatePrompt) -> Result<String, ModelError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let (name, title) = speaker_of(&prompt.system);
        let heard = history_len(&prompt.user);
        let opener = if heard == 0 {
            "To open, I want to set out where I stand.".to_string()
        } else {
            format!("Having heard {} statements so far, I want to respond.", heard)
        };
        let closing = if prompt.user.contains("final round") {
            " This is my closing position."
        } else {
            ""
        };
        Ok(format!(
            "{}: {} As {}, I weigh this question by its practical consequences.{}",
            name, opener, title, closing
        ))
    }
}

/// Returns a fixed pair of references per role
#[derive(Debug, Clone, Default)]
pub struct OfflineReferenceProvider;

#[async_trait]
impl RetrievalProvider for OfflineReferenceProvider {
    async fn fetch(
        &self,
        role: &Role,
        topic: &Topic,
        max_results: usize,
    ) -> Result<Vec<Reference>, RetrievalError> {
        let references = vec![
            Reference::new(format!("{} perspectives on {}", role.title, topic.as_str()))
                .with_authors(["Offline Library"])
                .with_source("Offline catalogue", "")
                .with_summary(format!("Background for {}", role.focused_query(topic.as_str())))
                .with_relevance(8.0),
            Reference::new(format!("Survey of arguments about {}", topic.as_str()))
                .with_authors(["Offline Library"])
                .with_source("Offline catalogue", "")
                .with_relevance(6.0),
        ];
        Ok(references.into_iter().take(max_results).collect())
    }
}

/// Produces silent clips whose length matches the text
#[derive(Debug, Clone, Default)]
pub struct OfflineSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for OfflineSpeechSynthesizer {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<AudioClip, SynthesisError> {
        let input = prepare_input(text);
        if input.is_empty() {
            return Err(SynthesisError::EmptyText);
        }
        Ok(AudioClip::new(
            Vec::new(),
            "silence",
            estimate_duration_secs(&input),
        ))
    }
}
