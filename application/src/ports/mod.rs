//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod conversation_logger;
pub mod language_model;
pub mod presentation_sink;
pub mod progress;
pub mod retrieval_provider;
pub mod retrieval_store;
pub mod speech_synthesizer;
