//! Playback controller
//!
//! Consumes the delivery queue in generation order and hands each turn to
//! the presentation sink. Presentation of one turn finishes (or is
//! abandoned on cancellation) before the next one starts.

use super::queue::{DeliveryError, DeliveryQueue};
use crate::ports::presentation_sink::PresentationSink;
use crate::ports::progress::DebateProgressNotifier;
use crate::session::status::{StatusTracker, TerminationReason};
use roundtable_domain::Turn;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Waiting for the next turn
    Idle,
    /// Presenting the turn with this order
    Playing(u64),
    /// Queue closed and every generated turn presented
    Drained,
    /// Stopped by cancellation
    Cancelled,
}

impl PlaybackState {
    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackState::Drained | PlaybackState::Cancelled)
    }
}

/// What the controller presented before it stopped
#[derive(Debug, Clone)]
pub struct PlaybackReport {
    pub shown: Vec<Turn>,
    pub state: PlaybackState,
}

/// Fails the session and stops the worker if playback exits without
/// reaching a finished state.
struct ExitGuard {
    queue: Arc<DeliveryQueue>,
    status: Arc<StatusTracker>,
    cancel: CancellationToken,
    armed: bool,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if self.armed {
            self.status.terminate(TerminationReason::Failed(
                "playback stopped unexpectedly".to_string(),
            ));
            self.cancel.cancel();
            self.queue.close();
        }
    }
}

pub struct PlaybackController {
    queue: Arc<DeliveryQueue>,
    sink: Arc<dyn PresentationSink>,
    status: Arc<StatusTracker>,
    progress: Arc<dyn DebateProgressNotifier>,
    cancel: CancellationToken,
    poll_interval: Duration,
    state: PlaybackState,
    next_expected: u64,
    shown: Vec<Turn>,
}

impl PlaybackController {
    pub fn new(
        queue: Arc<DeliveryQueue>,
        sink: Arc<dyn PresentationSink>,
        status: Arc<StatusTracker>,
        progress: Arc<dyn DebateProgressNotifier>,
        cancel: CancellationToken,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            sink,
            status,
            progress,
            cancel,
            poll_interval,
            state: PlaybackState::Idle,
            next_expected: 1,
            shown: Vec::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    pub fn shown(&self) -> &[Turn] {
        &self.shown
    }

    /// Present turns until the queue drains or the session is cancelled
    pub async fn run(mut self) -> PlaybackReport {
        let mut guard = ExitGuard {
            queue: Arc::clone(&self.queue),
            status: Arc::clone(&self.status),
            cancel: self.cancel.clone(),
            armed: true,
        };
        while !self.state.is_finished() {
            self.step().await;
        }
        guard.armed = false;
        info!(
            shown = self.shown.len(),
            state = ?self.state,
            "Playback finished"
        );
        PlaybackReport {
            shown: self.shown,
            state: self.state,
        }
    }

    /// One iteration: wait for the next turn and present it
    async fn step(&mut self) {
        if self.cancel.is_cancelled() {
            self.state = PlaybackState::Cancelled;
            return;
        }

        let next = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.state = PlaybackState::Cancelled;
                return;
            }
            next = self.queue.recv_next(self.poll_interval) => next,
        };

        match next {
            Ok(Some(turn)) => self.present(turn).await,
            Ok(None) => {
                debug!(next_expected = self.next_expected, "Delivery queue closed");
                self.state = PlaybackState::Drained;
            }
            Err(DeliveryError::QueueTimeout { expected, .. }) => {
                trace!(expected, "Waiting for next turn");
            }
            Err(e) => {
                warn!(error = %e, "Unexpected delivery error");
            }
        }
    }

    async fn present(&mut self, turn: Turn) {
        let order = turn.order();
        if order != self.next_expected {
            warn!(
                order,
                expected = self.next_expected,
                "Out-of-order turn from delivery queue"
            );
        }
        self.state = PlaybackState::Playing(order);
        debug!(order, speaker = turn.speaker(), "Presenting turn");

        let finished = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = self.sink.render(&turn) => true,
        };
        if !finished {
            debug!(order, "Presentation abandoned");
            self.state = PlaybackState::Cancelled;
            return;
        }

        self.next_expected = order + 1;
        self.progress.on_turn_presented(&turn);
        self.shown.push(turn);
        self.status.record_consumed(self.shown.len() as u64);
        self.state = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::presentation_sink::NoPresentation;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use roundtable_domain::Role;
    use std::sync::Mutex;

    fn turn(order: u64) -> Turn {
        let role = Role::new("r", "Speaker", "persona", "alex");
        Turn::new(order, &role, 1, format!("turn {order}"))
    }

    /// Sink that records start/end events and sleeps while "playing"
    struct RecordingSink {
        events: Mutex<Vec<String>>,
        duration: Duration,
    }

    #[async_trait]
    impl PresentationSink for RecordingSink {
        async fn render(&self, turn: &Turn) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {}", turn.order()));
            tokio::time::sleep(self.duration).await;
            self.events
                .lock()
                .unwrap()
                .push(format!("end {}", turn.order()));
        }
    }

    fn controller(
        queue: Arc<DeliveryQueue>,
        sink: Arc<dyn PresentationSink>,
        cancel: CancellationToken,
    ) -> (PlaybackController, Arc<StatusTracker>) {
        let status = Arc::new(StatusTracker::new(6));
        let controller = PlaybackController::new(
            queue,
            sink,
            status.clone(),
            Arc::new(NoProgress),
            cancel,
            Duration::from_millis(10),
        );
        (controller, status)
    }

    #[tokio::test(start_paused = true)]
    async fn test_presents_in_order_one_at_a_time() {
        let queue = Arc::new(DeliveryQueue::new(8).unwrap());
        for order in [2, 3, 1] {
            queue.push(turn(order)).await.unwrap();
        }
        queue.close();

        let sink = Arc::new(RecordingSink {
            events: Mutex::new(Vec::new()),
            duration: Duration::from_millis(100),
        });
        let (controller, status) =
            controller(queue, sink.clone(), CancellationToken::new());
        let report = controller.run().await;

        assert_eq!(report.state, PlaybackState::Drained);
        let orders: Vec<u64> = report.shown.iter().map(|t| t.order()).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(
            *sink.events.lock().unwrap(),
            vec!["start 1", "end 1", "start 2", "end 2", "start 3", "end 3"]
        );
        assert_eq!(status.consumed(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_polling_through_timeouts() {
        let queue = Arc::new(DeliveryQueue::new(8).unwrap());
        let (controller, status) = controller(
            queue.clone(),
            Arc::new(NoPresentation),
            CancellationToken::new(),
        );
        let handle = tokio::spawn(controller.run());

        // Several poll intervals pass before anything arrives
        tokio::time::sleep(Duration::from_millis(55)).await;
        queue.push(turn(1)).await.unwrap();
        queue.close();

        let report = handle.await.unwrap();
        assert_eq!(report.state, PlaybackState::Drained);
        assert_eq!(report.shown.len(), 1);
        assert_eq!(status.consumed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_abandons_current_turn() {
        let queue = Arc::new(DeliveryQueue::new(8).unwrap());
        queue.push(turn(1)).await.unwrap();
        queue.push(turn(2)).await.unwrap();

        let sink = Arc::new(RecordingSink {
            events: Mutex::new(Vec::new()),
            duration: Duration::from_secs(10),
        });
        let cancel = CancellationToken::new();
        let (controller, status) = controller(queue, sink.clone(), cancel.clone());
        let handle = tokio::spawn(controller.run());

        tokio::time::sleep(Duration::from_secs(15)).await;
        cancel.cancel();

        let report = handle.await.unwrap();
        assert_eq!(report.state, PlaybackState::Cancelled);
        assert_eq!(report.shown.len(), 1);
        assert_eq!(status.consumed(), 1);
        assert_eq!(
            *sink.events.lock().unwrap(),
            vec!["start 1", "end 1", "start 2"]
        );
    }

    struct PanickingSink;

    #[async_trait]
    impl PresentationSink for PanickingSink {
        async fn render(&self, _turn: &Turn) {
            panic!("renderer crashed");
        }
    }

    #[tokio::test]
    async fn test_panicking_sink_fails_session_and_stops_producer() {
        let queue = Arc::new(DeliveryQueue::new(1).unwrap());
        queue.push(turn(1)).await.unwrap();
        let cancel = CancellationToken::new();
        let (controller, status) =
            controller(queue.clone(), Arc::new(PanickingSink), cancel.clone());

        let result = tokio::spawn(controller.run()).await;
        assert!(result.unwrap_err().is_panic());

        assert!(cancel.is_cancelled());
        assert!(status.is_terminated());
        assert_eq!(
            status.reason(),
            Some(TerminationReason::Failed(
                "playback stopped unexpectedly".to_string()
            ))
        );
        assert_eq!(queue.push(turn(2)).await, Err(DeliveryError::Closed));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let queue = Arc::new(DeliveryQueue::new(8).unwrap());
        queue.push(turn(1)).await.unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (controller, _status) = controller(queue, Arc::new(NoPresentation), cancel);
        let report = controller.run().await;
        assert_eq!(report.state, PlaybackState::Cancelled);
        assert!(report.shown.is_empty());
    }
}
