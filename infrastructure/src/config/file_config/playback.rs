//! Playback configuration from TOML (`[playback]` section)

use serde::{Deserialize, Serialize};

/// Simulated presentation pacing for the console sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlaybackConfig {
    /// Multiplier on every delay; `0` presents turns back to back
    pub pace: f64,
    /// Reading time per word for turns without audio
    pub seconds_per_word: f64,
    /// Lower bound on the reading time of a turn
    pub min_seconds: f64,
    /// Extra time added after a turn's audio
    pub audio_buffer_seconds: f64,
}

impl Default for FilePlaybackConfig {
    fn default() -> Self {
        Self {
            pace: 1.0,
            seconds_per_word: 0.25,
            min_seconds: 3.0,
            audio_buffer_seconds: 3.0,
        }
    }
}
