//! Progress notification port
//!
//! Defines the interface for reporting progress during a debate.

use crate::session::status::TerminationReason;
use roundtable_domain::Turn;

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Callbacks run on the
/// worker or playback task and must not block.
pub trait DebateProgressNotifier: Send + Sync {
    /// Called once before the first turn is generated
    fn on_debate_start(&self, _total_turns: u64) {}

    /// Called after a turn is committed and queued
    fn on_turn_generated(&self, _turn: &Turn) {}

    /// Called after a turn finished presenting
    fn on_turn_presented(&self, _turn: &Turn) {}

    /// Called when generation stops
    fn on_generation_finished(&self, _reason: &TerminationReason, _generated: u64) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {}
