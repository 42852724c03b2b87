//! Worker parameters: generation loop control.
//!
//! [`WorkerParams`] groups the static parameters that control the
//! generation worker and the playback controller of a debate session.
//! These are application-layer concerns, not domain policy.

use crate::delivery::queue::DEFAULT_QUEUE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation and delivery loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerParams {
    /// Upper bound on one language model call
    pub generation_timeout: Option<Duration>,
    /// Upper bound on one speech synthesis call
    pub synthesis_timeout: Option<Duration>,
    /// Turns buffered between the worker and the playback controller
    pub queue_capacity: usize,
    /// How long the playback controller waits for the next turn per poll
    pub poll_interval: Duration,
    /// Consecutive model failures that stop the session (`None` never stops)
    pub max_model_failures: Option<u32>,
    /// Prefetch references for every participant before round 1
    pub warm_up_retrieval: bool,
}

impl Default for WorkerParams {
    fn default() -> Self {
        Self {
            generation_timeout: Some(Duration::from_secs(120)),
            synthesis_timeout: Some(Duration::from_secs(60)),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: Duration::from_millis(500),
            max_model_failures: None,
            warm_up_retrieval: false,
        }
    }
}

impl WorkerParams {
    // ==================== Builder Methods ====================

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_synthesis_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_model_failures(mut self, max: Option<u32>) -> Self {
        self.max_model_failures = max;
        self
    }

    pub fn with_warm_up_retrieval(mut self, enabled: bool) -> Self {
        self.warm_up_retrieval = enabled;
        self
    }

    /// Whether `consecutive` model failures cross the configured threshold
    pub fn failure_limit_reached(&self, consecutive: u32) -> bool {
        self.max_model_failures
            .is_some_and(|max| consecutive >= max)
    }
}
