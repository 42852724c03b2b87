//! Domain layer for roundtable
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! A fixed set of [`Role`]s speak on a [`Topic`] in strict round-robin
//! order for a fixed number of rounds:
//!
//! - **TurnScheduler**: picks the next speaker and detects termination
//! - **DebateSession**: owns the transcript and assigns generation order
//! - **ContextAssembler**: builds the bounded context a role sees
//!
//! ## Retrieval
//!
//! Each role may be given supporting [`Reference`]s, rendered once into a
//! [`RetrievalPayload`] and reused across rounds.

pub mod context;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod retrieval;
pub mod role;
pub mod util;

// Re-export commonly used types
pub use context::assembler::{
    ContextAssembler, HistoryLine, PersonaDescriptor, RetrievalContext, TurnContext,
};
pub use self::core::{
    error::{
        ConfigError, MAX_PARTICIPANTS, MAX_REFS_PER_ROLE, MAX_ROUNDS, MIN_PARTICIPANTS,
        MIN_REFS_PER_ROLE, MIN_ROUNDS,
    },
    topic::{Topic, TopicHash},
};
pub use debate::{
    scheduler::{ScheduledTurn, SchedulerState, TurnScheduler},
    session::{DebateSession, SessionId, round_for_order},
    settings::{RagSettings, validate_rounds},
    turn::{AudioClip, Turn, TurnDraft},
};
pub use prompt::{DebatePrompt, DebatePromptTemplate};
pub use retrieval::{CacheKey, NO_SUPPORTING_MATERIAL, Reference, RetrievalPayload};
pub use role::{
    entities::{Role, RoleId},
    registry::RoleRegistry,
};
