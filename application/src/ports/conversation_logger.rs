//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording debate events
//! (session start, generated turns, degraded retrieval, termination) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the debate
//! transcript in a machine-readable format (JSONL).

use crate::session::status::TerminationReason;
use roundtable_domain::{DebateSession, SessionId, Turn};
use serde_json::{Value, json};

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The logger adds the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "debate_started", "turn_generated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn debate_started(session: &DebateSession) -> Self {
        let participants: Vec<&str> = session
            .participants()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        Self::new(
            "debate_started",
            json!({
                "session": session.id().to_string(),
                "topic": session.topic().as_str(),
                "max_rounds": session.max_rounds(),
                "participants": participants,
            }),
        )
    }

    pub fn turn_generated(session: SessionId, turn: &Turn) -> Self {
        let mut payload = serde_json::to_value(turn).unwrap_or_else(|_| json!({}));
        if let Value::Object(map) = &mut payload {
            map.insert("session".to_string(), Value::String(session.to_string()));
        }
        Self::new("turn_generated", payload)
    }

    pub fn retrieval_degraded(session: SessionId, role: &str, reason: &str) -> Self {
        Self::new(
            "retrieval_degraded",
            json!({
                "session": session.to_string(),
                "role": role,
                "reason": reason,
            }),
        )
    }

    pub fn debate_finished(session: SessionId, reason: &TerminationReason, generated: u64) -> Self {
        Self::new(
            "debate_finished",
            json!({
                "session": session.to_string(),
                "reason": reason.as_str(),
                "detail": reason.detail(),
                "generated": generated,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible so logging never
/// disturbs the debate; write failures are ignored.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
