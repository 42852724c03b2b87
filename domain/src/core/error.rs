//! Domain error types

use thiserror::Error;

/// Minimum number of participants in a debate.
pub const MIN_PARTICIPANTS: usize = 3;
/// Maximum number of participants in a debate.
pub const MAX_PARTICIPANTS: usize = 6;
/// Minimum number of rounds in a debate.
pub const MIN_ROUNDS: u32 = 2;
/// Maximum number of rounds in a debate.
pub const MAX_ROUNDS: u32 = 8;
/// Minimum references fetched per role.
pub const MIN_REFS_PER_ROLE: usize = 1;
/// Maximum references fetched per role.
pub const MAX_REFS_PER_ROLE: usize = 5;

/// Invalid debate configuration.
///
/// Always fatal: a session is never started with a configuration
/// that fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "a debate needs between {MIN_PARTICIPANTS} and {MAX_PARTICIPANTS} participants, got {0}"
    )]
    ParticipantCount(usize),

    #[error("max rounds must be between {MIN_ROUNDS} and {MAX_ROUNDS}, got {0}")]
    RoundCount(u32),

    #[error("max references per role must be between {MIN_REFS_PER_ROLE} and {MAX_REFS_PER_ROLE}, got {0}")]
    RefsPerRole(usize),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("role listed more than once: {0}")]
    DuplicateRole(String),

    #[error("debate topic cannot be empty")]
    EmptyTopic,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
