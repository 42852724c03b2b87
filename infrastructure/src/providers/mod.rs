//! Adapters for the model, retrieval and speech ports
//!
//! [`ProviderSet::from_config`] picks the implementations for a run:
//! deterministic offline ones, or HTTP clients for OpenAI-compatible
//! endpoints when the `http-providers` feature is enabled.

pub mod offline;
pub mod references;
pub mod speech_input;
pub mod wire;

#[cfg(feature = "http-providers")]
pub mod http;

use crate::config::FileConfig;
use roundtable_application::{LanguageModel, RetrievalProvider, SpeechSynthesizer};
use std::sync::Arc;
use thiserror::Error;

pub use offline::{OfflineLanguageModel, OfflineReferenceProvider, OfflineSpeechSynthesizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Remote OpenAI-compatible endpoints
    #[default]
    Http,
    /// In-process deterministic providers
    Offline,
}

#[derive(Error, Debug)]
pub enum ProviderSetupError {
    #[error("API key not found: set {0}")]
    MissingApiKey(String),

    #[error("HTTP providers are not compiled in; rebuild with the `http-providers` feature or use --offline")]
    HttpDisabled,

    #[error("Could not create {what} client: {reason}")]
    Client { what: &'static str, reason: String },
}

/// Port implementations for one run
pub struct ProviderSet {
    pub kind: ProviderKind,
    pub model: Arc<dyn LanguageModel>,
    /// `None` when retrieval is disabled or cannot be reached
    pub retrieval: Option<Arc<dyn RetrievalProvider>>,
    /// `None` when speech is disabled or cannot be reached
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl ProviderSet {
    pub fn from_config(config: &FileConfig, kind: ProviderKind) -> Result<Self, ProviderSetupError> {
        match kind {
            ProviderKind::Offline => Ok(Self::offline(config)),
            ProviderKind::Http => Self::http(config),
        }
    }

    /// Offline providers for every enabled port
    pub fn offline(config: &FileConfig) -> Self {
        Self {
            kind: ProviderKind::Offline,
            model: Arc::new(OfflineLanguageModel::new()),
            retrieval: config
                .retrieval
                .enabled
                .then(|| Arc::new(OfflineReferenceProvider) as Arc<dyn RetrievalProvider>),
            speech: config
                .speech
                .enabled
                .then(|| Arc::new(OfflineSpeechSynthesizer) as Arc<dyn SpeechSynthesizer>),
        }
    }

    #[cfg(feature = "http-providers")]
    fn http(config: &FileConfig) -> Result<Self, ProviderSetupError> {
        use crate::config::seconds;
        use http::{EndpointConfig, HttpSpeechSynthesizer, LlmReferenceSearcher, OpenAiChatModel};
        use tracing::warn;

        let client_error = |what: &'static str| {
            move |e: http::HttpError| ProviderSetupError::Client {
                what,
                reason: e.to_string(),
            }
        };

        let model_cfg = &config.model;
        let key = model_cfg
            .api_key()
            .ok_or_else(|| ProviderSetupError::MissingApiKey(model_cfg.api_key_env.clone()))?;
        let endpoint = EndpointConfig::new(&model_cfg.base_url, &model_cfg.name, key)
            .with_timeout(seconds(model_cfg.timeout_seconds));
        let model = OpenAiChatModel::new(endpoint, model_cfg.temperature, model_cfg.max_tokens)
            .map_err(client_error("model"))?;

        let retrieval_cfg = &config.retrieval;
        let retrieval: Option<Arc<dyn RetrievalProvider>> = if !retrieval_cfg.enabled {
            None
        } else if let Some(key) = retrieval_cfg.api_key() {
            let endpoint = EndpointConfig::new(&retrieval_cfg.base_url, &retrieval_cfg.model, key)
                .with_timeout(seconds(retrieval_cfg.timeout_seconds));
            Some(Arc::new(
                LlmReferenceSearcher::new(endpoint).map_err(client_error("retrieval"))?,
            ))
        } else {
            warn!(
                env = %retrieval_cfg.api_key_env,
                "Retrieval API key not set, debating without supporting references"
            );
            None
        };

        let speech_cfg = &config.speech;
        let speech: Option<Arc<dyn SpeechSynthesizer>> = if !speech_cfg.enabled {
            None
        } else if let Some(key) = speech_cfg.api_key() {
            let endpoint = EndpointConfig::new(&speech_cfg.base_url, &speech_cfg.model, key)
                .with_timeout(seconds(speech_cfg.timeout_seconds));
            Some(Arc::new(
                HttpSpeechSynthesizer::new(endpoint, &speech_cfg.format, speech_cfg.qualify_voice)
                    .map_err(client_error("speech"))?,
            ))
        } else {
            warn!(env = %speech_cfg.api_key_env, "Speech API key not set, text only");
            None
        };

        Ok(Self {
            kind: ProviderKind::Http,
            model: Arc::new(model),
            retrieval,
            speech,
        })
    }

    #[cfg(not(feature = "http-providers"))]
    fn http(_config: &FileConfig) -> Result<Self, ProviderSetupError> {
        Err(ProviderSetupError::HttpDisabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_set_follows_enabled_ports() {
        let mut config = FileConfig::default();
        let set = ProviderSet::from_config(&config, ProviderKind::Offline).unwrap();
        assert_eq!(set.kind, ProviderKind::Offline);
        assert_eq!(set.model.name(), "offline");
        assert!(set.retrieval.is_some());
        assert!(set.speech.is_none());

        config.retrieval.enabled = false;
        config.speech.enabled = true;
        let set = ProviderSet::offline(&config);
        assert!(set.retrieval.is_none());
        assert!(set.speech.is_some());
    }

    #[cfg(feature = "http-providers")]
    #[test]
    fn test_http_set_requires_model_key() {
        let mut config = FileConfig::default();
        config.model.api_key_env = "ROUNDTABLE_TEST_UNSET_MODEL_KEY".to_string();
        let err = ProviderSet::from_config(&config, ProviderKind::Http)
            .err()
            .unwrap();
        assert!(matches!(err, ProviderSetupError::MissingApiKey(env) if env == "ROUNDTABLE_TEST_UNSET_MODEL_KEY"));
    }

    #[cfg(not(feature = "http-providers"))]
    #[test]
    fn test_http_set_unavailable_without_feature() {
        let config = FileConfig::default();
        assert!(matches!(
            ProviderSet::from_config(&config, ProviderKind::Http),
            Err(ProviderSetupError::HttpDisabled)
        ));
    }
}
