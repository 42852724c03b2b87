//! Order-aware bounded delivery queue
//!
//! Turns are keyed by generation order. The consumer only ever receives
//! the lowest order it has not consumed yet, no matter in which order the
//! producer pushed them.

use roundtable_domain::{ConfigError, Turn};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Default number of turns buffered ahead of the consumer
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The expected turn did not arrive in time. Transient.
    #[error("Turn {expected} did not arrive within {waited:?}")]
    QueueTimeout { expected: u64, waited: Duration },

    #[error("Delivery queue is closed")]
    Closed,

    #[error("Turn {0} was already delivered or queued")]
    DuplicateOrder(u64),
}

#[derive(Debug)]
struct QueueState {
    pending: BTreeMap<u64, Turn>,
    next_expected: u64,
    closed: bool,
}

/// Bounded queue between the generation worker and the playback controller
#[derive(Debug)]
pub struct DeliveryQueue {
    state: Mutex<QueueState>,
    capacity: usize,
    /// Signalled when a turn is pushed or the queue closes
    arrived: Notify,
    /// Signalled when a turn is taken or the queue closes
    freed: Notify,
}

impl DeliveryQueue {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidParameter(
                "delivery queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            state: Mutex::new(QueueState {
                pending: BTreeMap::new(),
                next_expected: 1,
                closed: false,
            }),
            capacity,
            arrived: Notify::new(),
            freed: Notify::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Turns waiting to be consumed
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Order the consumer will receive next
    pub fn next_expected(&self) -> u64 {
        self.lock().next_expected
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Queue a turn, waiting while the queue is full.
    ///
    /// The consumer's next expected order is admitted even when the queue
    /// is full, so a producer that pushes ahead can never starve it.
    pub async fn push(&self, turn: Turn) -> Result<(), DeliveryError> {
        let order = turn.order();
        loop {
            let freed = self.freed.notified();
            tokio::pin!(freed);
            freed.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return Err(DeliveryError::Closed);
                }
                if order < state.next_expected || state.pending.contains_key(&order) {
                    return Err(DeliveryError::DuplicateOrder(order));
                }
                if state.pending.len() < self.capacity || order == state.next_expected {
                    state.pending.insert(order, turn);
                    drop(state);
                    self.arrived.notify_waiters();
                    return Ok(());
                }
            }

            freed.await;
        }
    }

    /// Take the next turn in generation order.
    ///
    /// Waits up to `wait` for it. Returns `Ok(None)` once the queue is
    /// closed and the expected turn is not queued.
    pub async fn recv_next(&self, wait: Duration) -> Result<Option<Turn>, DeliveryError> {
        let deadline = Instant::now() + wait;
        loop {
            let arrived = self.arrived.notified();
            tokio::pin!(arrived);
            arrived.as_mut().enable();

            let expected = {
                let mut state = self.lock();
                let expected = state.next_expected;
                if let Some(turn) = state.pending.remove(&expected) {
                    state.next_expected += 1;
                    drop(state);
                    self.freed.notify_waiters();
                    return Ok(Some(turn));
                }
                if state.closed {
                    return Ok(None);
                }
                expected
            };

            if tokio::time::timeout_at(deadline, arrived).await.is_err() {
                return Err(DeliveryError::QueueTimeout {
                    expected,
                    waited: wait,
                });
            }
        }
    }

    /// Stop accepting turns. Queued turns stay receivable.
    pub fn close(&self) {
        self.lock().closed = true;
        self.arrived.notify_waiters();
        self.freed.notify_waiters();
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
