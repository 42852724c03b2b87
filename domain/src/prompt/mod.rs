//! Prompt domain
//!
//! Templates that turn an assembled turn context into model input.

mod template;

pub use template::{DebatePrompt, DebatePromptTemplate};
