//! Debate settings (Value Objects)

use crate::core::error::{ConfigError, MAX_REFS_PER_ROLE, MAX_ROUNDS, MIN_REFS_PER_ROLE, MIN_ROUNDS};
use serde::{Deserialize, Serialize};

/// Retrieval-augmented context settings for a debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagSettings {
    /// Whether roles receive supporting references
    pub enabled: bool,
    /// Maximum references fetched per role
    pub max_refs_per_role: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_refs_per_role: 3,
        }
    }
}

impl RagSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_max_refs(mut self, max_refs_per_role: usize) -> Self {
        self.max_refs_per_role = max_refs_per_role;
        self
    }

    /// Range checks only apply while retrieval is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled
            && !(MIN_REFS_PER_ROLE..=MAX_REFS_PER_ROLE).contains(&self.max_refs_per_role)
        {
            return Err(ConfigError::RefsPerRole(self.max_refs_per_role));
        }
        Ok(())
    }
}

/// Check a round count against the supported range.
pub fn validate_rounds(max_rounds: u32) -> Result<(), ConfigError> {
    if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&max_rounds) {
        return Err(ConfigError::RoundCount(max_rounds));
    }
    Ok(())
}
