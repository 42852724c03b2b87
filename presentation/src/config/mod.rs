//! Presentation-level configuration
//!
//! Configuration for output formatting and playback pacing.

use roundtable_domain::Turn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_progress: true,
        }
    }
}

/// How long the console holds each turn on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Multiplier on every delay; `0` disables pacing
    pub pace: f64,
    pub seconds_per_word: f64,
    pub min_seconds: f64,
    pub audio_buffer_seconds: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            pace: 1.0,
            seconds_per_word: 0.25,
            min_seconds: 3.0,
            audio_buffer_seconds: 3.0,
        }
    }
}

impl Pacing {
    /// Present turns back to back
    pub fn instant() -> Self {
        Self {
            pace: 0.0,
            ..Self::default()
        }
    }

    pub fn with_pace(mut self, pace: f64) -> Self {
        self.pace = pace;
        self
    }

    /// Audio length plus a pause when the turn has audio, otherwise an
    /// estimated reading time.
    pub fn hold_for(&self, turn: &Turn) -> Duration {
        if self.pace <= 0.0 {
            return Duration::ZERO;
        }
        let base = match turn.audio() {
            Some(clip) => clip.duration_secs + self.audio_buffer_seconds,
            None => {
                let words = turn.content().split_whitespace().count() as f64;
                (words * self.seconds_per_word).max(self.min_seconds)
            }
        };
        Duration::try_from_secs_f64(base * self.pace).unwrap_or(Duration::ZERO)
    }
}
