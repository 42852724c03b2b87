//! Presentation port
//!
//! The playback controller hands turns to a [`PresentationSink`] one at a
//! time. Any pacing (reading delay, audio playback) belongs to the sink.

use async_trait::async_trait;
use roundtable_domain::Turn;

#[async_trait]
pub trait PresentationSink: Send + Sync {
    /// Present a turn, returning once presentation has finished.
    ///
    /// The controller drops this future if the session is cancelled
    /// mid-presentation.
    async fn render(&self, turn: &Turn);
}

/// Sink that presents nothing and returns immediately
pub struct NoPresentation;

#[async_trait]
impl PresentationSink for NoPresentation {
    async fn render(&self, _turn: &Turn) {}
}
