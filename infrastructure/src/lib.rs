//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod cache;
pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use cache::FileRetrievalStore;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDebateConfig, FileModelConfig,
    FileOutputConfig, FileOutputFormat, FilePlaybackConfig, FileRetrievalConfig,
    FileSpeechConfig, FileWorkerConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    OfflineLanguageModel, OfflineReferenceProvider, OfflineSpeechSynthesizer, ProviderKind,
    ProviderSet, ProviderSetupError,
};

#[cfg(feature = "http-providers")]
pub use providers::http::{
    EndpointConfig, HttpError, HttpSpeechSynthesizer, LlmReferenceSearcher, OpenAiChatModel,
};
