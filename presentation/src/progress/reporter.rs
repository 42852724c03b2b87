//! Progress reporting for debate execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtable_application::{DebateProgressNotifier, TerminationReason};
use roundtable_domain::Turn;
use std::sync::Mutex;

/// Reports progress with a generation bar and a playback bar
pub struct ProgressReporter {
    multi: MultiProgress,
    generation: Mutex<Option<ProgressBar>>,
    playback: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            generation: Mutex::new(None),
            playback: Mutex::new(None),
        }
    }

    /// Handle for printing around the bars
    pub fn multi(&self) -> MultiProgress {
        self.multi.clone()
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn add_bar(&self, prefix: &'static str, total: u64) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(Self::bar_style());
        pb.set_prefix(prefix);
        pb
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_debate_start(&self, total_turns: u64) {
        let generation = self.add_bar("Generating", total_turns);
        generation.set_message("Starting...");
        let playback = self.add_bar("Presented ", total_turns);

        if let Ok(mut slot) = self.generation.lock() {
            *slot = Some(generation);
        }
        if let Ok(mut slot) = self.playback.lock() {
            *slot = Some(playback);
        }
    }

    fn on_turn_generated(&self, turn: &Turn) {
        if let Ok(slot) = self.generation.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if turn.is_error() {
                format!("{} {}", "x".red(), turn.speaker())
            } else {
                format!("{} {}", "v".green(), turn.speaker())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_turn_presented(&self, _turn: &Turn) {
        if let Ok(slot) = self.playback.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.inc(1);
            if pb.length().is_some_and(|len| pb.position() >= len) {
                pb.finish_and_clear();
            }
        }
    }

    fn on_generation_finished(&self, reason: &TerminationReason, _generated: u64) {
        if let Ok(mut slot) = self.generation.lock()
            && let Some(pb) = slot.take()
        {
            let message = match reason {
                TerminationReason::Completed => "complete!".green().to_string(),
                TerminationReason::Cancelled => "cancelled".yellow().to_string(),
                TerminationReason::Failed(_) => "stopped".red().to_string(),
            };
            pb.finish_with_message(message);
        }
        if !matches!(reason, TerminationReason::Completed)
            && let Ok(mut slot) = self.playback.lock()
            && let Some(pb) = slot.take()
        {
            pb.abandon();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_debate_start(&self, total_turns: u64) {
        eprintln!("{} {} ({} turns)", "->".cyan(), "Debate started".bold(), total_turns);
    }

    fn on_turn_generated(&self, turn: &Turn) {
        if turn.is_error() {
            eprintln!("  {} turn {} {} (failed)", "x".red(), turn.order(), turn.speaker());
        } else {
            eprintln!("  {} turn {} {}", "v".green(), turn.order(), turn.speaker());
        }
    }

    fn on_generation_finished(&self, reason: &TerminationReason, generated: u64) {
        eprintln!("{} generation {} after {} turns", "->".cyan(), reason, generated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use roundtable_domain::Role;

    fn hidden_reporter() -> ProgressReporter {
        let reporter = ProgressReporter::new();
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    #[test]
    fn test_bars_track_generation_and_playback() {
        let reporter = hidden_reporter();
        let role = Role::new("a", "Alice", "p", "alex");
        reporter.on_debate_start(2);

        let first = Turn::new(1, &role, 1, "one");
        reporter.on_turn_generated(&first);
        reporter.on_turn_presented(&first);

        let generation = reporter.generation.lock().unwrap().clone().unwrap();
        assert_eq!(generation.position(), 1);
        let playback = reporter.playback.lock().unwrap().clone().unwrap();
        assert_eq!(playback.position(), 1);

        reporter.on_generation_finished(&TerminationReason::Completed, 2);
        assert!(reporter.generation.lock().unwrap().is_none());
        assert!(generation.is_finished());
    }

    #[test]
    fn test_failed_debate_abandons_playback_bar() {
        let reporter = hidden_reporter();
        reporter.on_debate_start(6);
        let playback = reporter.playback.lock().unwrap().clone().unwrap();

        reporter.on_generation_finished(&TerminationReason::Failed("boom".to_string()), 1);
        assert!(reporter.playback.lock().unwrap().is_none());
        assert!(playback.is_finished());
    }

    #[test]
    fn test_callbacks_before_start_are_ignored() {
        let reporter = hidden_reporter();
        let turn = Turn::new(1, &Role::new("a", "Alice", "p", "alex"), 1, "one");
        reporter.on_turn_generated(&turn);
        reporter.on_turn_presented(&turn);
        reporter.on_generation_finished(&TerminationReason::Cancelled, 0);
    }
}
