//! Console presentation of debate turns

use super::console::ConsoleFormatter;
use crate::config::Pacing;
use async_trait::async_trait;
use indicatif::MultiProgress;
use roundtable_application::PresentationSink;
use roundtable_domain::Turn;
use tracing::debug;

/// Prints each turn, then holds it on screen for its pacing delay.
///
/// When progress bars are shown, printing suspends them so the turn text
/// is not interleaved with a redraw.
pub struct ConsolePresentationSink {
    pacing: Pacing,
    bars: Option<MultiProgress>,
}

impl ConsolePresentationSink {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing, bars: None }
    }

    pub fn with_progress_bars(mut self, bars: MultiProgress) -> Self {
        self.bars = Some(bars);
        self
    }

    fn print(&self, text: &str) {
        match &self.bars {
            Some(bars) => bars.suspend(|| print!("{}", text)),
            None => print!("{}", text),
        }
    }
}

#[async_trait]
impl PresentationSink for ConsolePresentationSink {
    async fn render(&self, turn: &Turn) {
        self.print(&ConsoleFormatter::format_turn(turn));

        let hold = self.pacing.hold_for(turn);
        if !hold.is_zero() {
            debug!(order = turn.order(), hold_ms = hold.as_millis() as u64, "Holding turn");
            tokio::time::sleep(hold).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Role;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_render_waits_for_pacing() {
        let sink = ConsolePresentationSink::new(Pacing::default());
        let turn = Turn::new(1, &Role::new("a", "Alice", "p", "alex"), 1, "Short turn.");

        let start = tokio::time::Instant::now();
        sink.render(&turn).await;
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_pacing_returns_immediately() {
        let sink = ConsolePresentationSink::new(Pacing::instant());
        let turn = Turn::new(1, &Role::new("a", "Alice", "p", "alex"), 1, "Short turn.");

        let start = tokio::time::Instant::now();
        sink.render(&turn).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
