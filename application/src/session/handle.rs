//! Handle to a running debate session

use super::status::{DebateStatus, StatusTracker, TerminationReason};
use crate::delivery::{PlaybackReport, PlaybackState};
use crate::use_cases::generation_worker::WorkerReport;
use roundtable_domain::{SessionId, Turn};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Result of a finished session
#[derive(Debug, Clone, Serialize)]
pub struct DebateOutcome {
    pub session_id: SessionId,
    /// Every committed turn, in generation order
    pub transcript: Vec<Turn>,
    /// Turns the playback controller finished presenting
    #[serde(skip)]
    pub shown: Vec<Turn>,
    pub reason: TerminationReason,
    pub status: DebateStatus,
    /// Where playback stopped
    #[serde(skip)]
    pub playback: PlaybackState,
}

impl DebateOutcome {
    pub fn is_complete(&self) -> bool {
        self.reason == TerminationReason::Completed
    }
}

/// Returned by `start_debate`. Dropping the handle does not stop the
/// session; call [`SessionHandle::cancel`] for that.
pub struct SessionHandle {
    id: SessionId,
    status: Arc<StatusTracker>,
    cancel: CancellationToken,
    worker: JoinHandle<WorkerReport>,
    playback: JoinHandle<PlaybackReport>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        status: Arc<StatusTracker>,
        cancel: CancellationToken,
        worker: JoinHandle<WorkerReport>,
        playback: JoinHandle<PlaybackReport>,
    ) -> Self {
        Self {
            id,
            status,
            cancel,
            worker,
            playback,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current counters. Calling this has no effect on the session.
    pub fn poll_status(&self) -> DebateStatus {
        self.status.snapshot()
    }

    /// Ask both tasks to stop. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared by the session's tasks
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Both tasks have exited
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished() && self.playback.is_finished()
    }

    /// Wait for generation and playback to stop
    pub async fn wait(self) -> DebateOutcome {
        let (transcript, reason) = match self.worker.await {
            Ok(report) => (report.session.transcript().to_vec(), report.reason),
            Err(e) => {
                error!(session = %self.id, error = %e, "Generation worker task failed");
                let reason = self.status.reason().unwrap_or_else(|| {
                    TerminationReason::Failed(format!("generation worker task failed: {}", e))
                });
                (Vec::new(), reason)
            }
        };

        let (shown, playback) = match self.playback.await {
            Ok(report) => (report.shown, report.state),
            Err(e) => {
                error!(session = %self.id, error = %e, "Playback task failed");
                (Vec::new(), PlaybackState::Cancelled)
            }
        };

        // A playback fault is recorded before the worker sees the cancel
        let reason = self.status.reason().unwrap_or(reason);

        DebateOutcome {
            session_id: self.id,
            transcript,
            shown,
            reason,
            status: self.status.snapshot(),
            playback,
        }
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("status", &self.status.snapshot())
            .finish()
    }
}
