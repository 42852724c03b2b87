//! Session status counters
//!
//! The worker is the only writer of `generated`, the playback controller
//! the only writer of `consumed`. Readers get a consistent-enough snapshot
//! through [`StatusTracker::snapshot`].

use serde::Serialize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Why generation stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every round was produced
    Completed,
    /// The session was cancelled
    Cancelled,
    /// An unrecoverable fault stopped the session
    Failed(String),
}

impl TerminationReason {
    pub fn as_str(&self) -> &str {
        match self {
            TerminationReason::Completed => "completed",
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::Failed(_) => "failed",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            TerminationReason::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TerminationReason::Failed(_))
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Failed(msg) => write!(f, "failed: {}", msg),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Snapshot returned by `poll_status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateStatus {
    /// Turns committed by the worker
    pub generated: u64,
    /// Turns fully presented by the playback controller
    pub consumed: u64,
    /// Turns a complete session produces
    pub total: u64,
    /// Generation has stopped (completed, cancelled or failed)
    pub terminated: bool,
    /// Set when the session stopped on an unrecoverable fault
    pub failure: Option<String>,
}

impl DebateStatus {
    /// Every generated turn has been presented and nothing more is coming
    pub fn is_drained(&self) -> bool {
        self.terminated && self.consumed == self.generated
    }
}

/// Shared counters behind [`DebateStatus`]
#[derive(Debug)]
pub struct StatusTracker {
    total: u64,
    generated: AtomicU64,
    consumed: AtomicU64,
    terminated: AtomicBool,
    reason: Mutex<Option<TerminationReason>>,
}

impl StatusTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            generated: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            terminated: AtomicBool::new(false),
            reason: Mutex::new(None),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Acquire)
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    pub(crate) fn record_generated(&self, order: u64) {
        self.generated.store(order, Ordering::Release);
    }

    pub(crate) fn record_consumed(&self, count: u64) {
        self.consumed.store(count, Ordering::Release);
    }

    /// Mark generation as stopped. The first reason recorded wins.
    pub(crate) fn terminate(&self, reason: TerminationReason) {
        if let Ok(mut slot) = self.reason.lock()
            && slot.is_none()
        {
            *slot = Some(reason);
        }
        self.terminated.store(true, Ordering::Release);
    }

    pub fn reason(&self) -> Option<TerminationReason> {
        self.reason.lock().ok().and_then(|r| r.clone())
    }

    pub fn snapshot(&self) -> DebateStatus {
        let failure = self
            .reason()
            .and_then(|r| r.detail().map(str::to_string));
        DebateStatus {
            generated: self.generated(),
            consumed: self.consumed(),
            total: self.total,
            terminated: self.is_terminated(),
            failure,
        }
    }
}
