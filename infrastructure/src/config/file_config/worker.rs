//! Worker configuration from TOML (`[worker]` section)

use roundtable_application::{DEFAULT_QUEUE_CAPACITY, WorkerParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw generation loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkerConfig {
    /// Turns buffered ahead of playback
    pub queue_capacity: usize,
    /// Playback poll interval in milliseconds
    pub poll_interval_ms: u64,
    /// Consecutive model failures that stop the debate
    pub max_model_failures: Option<u32>,
}

impl Default for FileWorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval_ms: 500,
            max_model_failures: None,
        }
    }
}

impl super::FileConfig {
    /// Build [`WorkerParams`] from the `[worker]`, `[model]`, `[speech]`
    /// and `[retrieval]` sections.
    pub fn worker_params(&self) -> WorkerParams {
        WorkerParams::default()
            .with_queue_capacity(self.worker.queue_capacity)
            .with_poll_interval(Duration::from_millis(self.worker.poll_interval_ms))
            .with_max_model_failures(self.worker.max_model_failures)
            .with_generation_timeout(seconds(self.model.timeout_seconds))
            .with_synthesis_timeout(seconds(self.speech.timeout_seconds))
            .with_warm_up_retrieval(self.retrieval.warm_up)
    }
}

/// `0` disables the timeout
pub(crate) fn seconds(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}
