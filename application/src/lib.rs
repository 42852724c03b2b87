//! Application layer for roundtable
//!
//! This crate contains use cases, port definitions, the retrieval cache,
//! the delivery queue and the playback controller.
//! It depends only on the domain layer.

pub mod cache;
pub mod config;
pub mod delivery;
pub mod ports;
pub mod session;
pub mod use_cases;

// Re-export commonly used types
pub use cache::{CacheLookup, FallbackReason, RetrievalCache, SessionRetrievalCache};
pub use config::WorkerParams;
pub use delivery::{
    DEFAULT_QUEUE_CAPACITY, DeliveryError, DeliveryQueue, PlaybackController, PlaybackReport,
    PlaybackState,
};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    language_model::{LanguageModel, ModelError},
    presentation_sink::{NoPresentation, PresentationSink},
    progress::{DebateProgressNotifier, NoProgress},
    retrieval_provider::{RetrievalError, RetrievalProvider},
    retrieval_store::{RetrievalStore, RetrievalStoreError, StoredRetrieval},
    speech_synthesizer::{SpeechSynthesizer, SynthesisError},
};
pub use session::{
    handle::{DebateOutcome, SessionHandle},
    status::{DebateStatus, StatusTracker, TerminationReason},
};
pub use use_cases::generation_worker::WorkerReport;
pub use use_cases::run_debate::{
    DEFAULT_ROUNDS, RunDebateError, RunDebateInput, RunDebateUseCase,
};
