//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and
//! application types by the helpers below.

mod debate;
mod model;
mod output;
mod playback;
mod retrieval;
mod speech;
mod worker;

pub use debate::FileDebateConfig;
pub use model::FileModelConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use playback::FilePlaybackConfig;
pub use retrieval::FileRetrievalConfig;
pub use speech::FileSpeechConfig;
pub use worker::FileWorkerConfig;

pub(crate) use worker::seconds;

use roundtable_domain::{
    ConfigError, MAX_REFS_PER_ROLE, MIN_REFS_PER_ROLE, RagSettings, RoleId, RoleRegistry,
    validate_rounds,
};
use crate::cache::FileRetrievalStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A problem found in a loaded configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("debate: {0}")]
    Debate(ConfigError),

    #[error("retrieval.max_refs_per_role must be between 1 and 5, got {0}")]
    RefsPerRole(usize),

    #[error("retrieval.cache_ttl_seconds cannot be 0")]
    ZeroCacheTtl,

    #[error("worker.queue_capacity cannot be 0")]
    ZeroQueueCapacity,

    #[error("worker.poll_interval_ms cannot be 0")]
    ZeroPollInterval,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("playback.{0} cannot be negative")]
    NegativePacing(&'static str),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Rounds and participants
    pub debate: FileDebateConfig,
    /// Language model endpoint
    pub model: FileModelConfig,
    /// Supporting references
    pub retrieval: FileRetrievalConfig,
    /// Speech synthesis
    pub speech: FileSpeechConfig,
    /// Generation loop tuning
    pub worker: FileWorkerConfig,
    /// Console pacing
    pub playback: FilePlaybackConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    ///
    /// Participant ids are checked against the registry later, when the
    /// debate starts.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if let Err(e) = validate_rounds(self.debate.rounds) {
            issues.push(ConfigValidationError::Debate(e));
        }
        if self.debate.roles.iter().any(|r| r.trim().is_empty()) {
            issues.push(ConfigValidationError::EmptyField("debate.roles"));
        }

        if self.retrieval.enabled
            && !(MIN_REFS_PER_ROLE..=MAX_REFS_PER_ROLE).contains(&self.retrieval.max_refs_per_role)
        {
            issues.push(ConfigValidationError::RefsPerRole(
                self.retrieval.max_refs_per_role,
            ));
        }
        if self.retrieval.cache_ttl_seconds == 0 {
            issues.push(ConfigValidationError::ZeroCacheTtl);
        }

        if self.worker.queue_capacity == 0 {
            issues.push(ConfigValidationError::ZeroQueueCapacity);
        }
        if self.worker.poll_interval_ms == 0 {
            issues.push(ConfigValidationError::ZeroPollInterval);
        }

        if self.model.name.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyField("model.name"));
        }
        if self.model.base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyField("model.base_url"));
        }
        if self.retrieval.enabled && self.retrieval.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyField("retrieval.model"));
        }
        if self.speech.enabled && self.speech.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyField("speech.model"));
        }

        for (field, value) in [
            ("pace", self.playback.pace),
            ("seconds_per_word", self.playback.seconds_per_word),
            ("min_seconds", self.playback.min_seconds),
            ("audio_buffer_seconds", self.playback.audio_buffer_seconds),
        ] {
            if value < 0.0 {
                issues.push(ConfigValidationError::NegativePacing(field));
            }
        }

        issues
    }

    /// Participant ids in speaking order
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.debate
            .roles
            .iter()
            .map(|r| RoleId::new(r.trim()))
            .collect()
    }

    pub fn rag_settings(&self) -> RagSettings {
        if self.retrieval.enabled {
            RagSettings::default().with_max_refs(self.retrieval.max_refs_per_role)
        } else {
            RagSettings::disabled()
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.retrieval.cache_ttl_seconds)
    }

    pub fn retrieval_timeout(&self) -> Option<Duration> {
        seconds(self.retrieval.timeout_seconds)
    }

    /// Where fetched references are persisted, `None` when disabled
    pub fn retrieval_store_dir(&self) -> Option<PathBuf> {
        if !self.retrieval.persist {
            return None;
        }
        match &self.retrieval.cache_dir {
            Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir.trim())),
            _ => FileRetrievalStore::default_dir(),
        }
    }

    /// Ids of the roles the built-in catalog knows about
    pub fn known_roles() -> Vec<String> {
        RoleRegistry::builtin()
            .iter()
            .map(|r| r.id.to_string())
            .collect()
    }
}
