//! Console output formatter for debates

use colored::Colorize;
use roundtable_application::{DebateOutcome, TerminationReason};
use roundtable_domain::{Role, RoleRegistry, Topic, Turn};

/// Formats debate turns and results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed before the first turn
    pub fn header(topic: &Topic, participants: &[Role], rounds: u32) -> String {
        let mut output = String::new();
        output.push_str(&Self::banner("Roundtable Debate"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), topic));
        output.push_str(&format!("{} {}\n", "Rounds:".cyan().bold(), rounds));
        output.push_str(&format!("{}\n", "Participants:".cyan().bold()));
        for role in participants {
            output.push_str(&format!("  * {} ({})\n", role.name.bold(), role.title));
        }
        output
    }

    /// One turn as it is presented
    pub fn format_turn(turn: &Turn) -> String {
        let label = format!("── Round {} · {} ──", turn.round(), turn.speaker());
        if let Some(reason) = turn.failure() {
            return format!(
                "\n{}\n{}\n",
                label.red().bold(),
                format!("(no response: {})", reason).dimmed()
            );
        }

        let mut output = format!("\n{}\n{}\n", label.yellow().bold(), turn.content());
        if let Some(clip) = turn.audio() {
            output.push_str(&format!(
                "{}\n",
                format!("[audio {} {:.1}s]", clip.format, clip.duration_secs).dimmed()
            ));
        }
        output
    }

    /// Closing summary after the session stops
    pub fn format_summary(outcome: &DebateOutcome) -> String {
        let status = &outcome.status;
        let verdict = match &outcome.reason {
            TerminationReason::Completed => "Debate complete".green().bold(),
            TerminationReason::Cancelled => "Debate cancelled".yellow().bold(),
            TerminationReason::Failed(_) => "Debate stopped".red().bold(),
        };

        let mut output = String::new();
        output.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
        output.push_str(&format!("{}\n", verdict));
        output.push_str(&format!(
            "{} {}/{} generated, {} presented\n",
            "Turns:".cyan().bold(),
            status.generated,
            status.total,
            status.consumed
        ));
        let failed = outcome.transcript.iter().filter(|t| t.is_error()).count();
        if failed > 0 {
            output.push_str(&format!(
                "{} {} turn(s) without a response\n",
                "Warning:".yellow().bold(),
                failed
            ));
        }
        if let Some(detail) = outcome.reason.detail() {
            output.push_str(&format!("{} {}\n", "Reason:".red().bold(), detail));
        }
        output.push_str(&format!("{}\n", "=".repeat(60).cyan()));
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DebateOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Catalog listing for `--list-roles`
    pub fn format_roles(registry: &RoleRegistry) -> String {
        let defaults = RoleRegistry::default_participants();
        let mut output = format!("{}\n", "Available roles:".cyan().bold());
        for role in registry.iter() {
            let marker = if defaults.contains(&role.id) {
                " (default)".dimmed().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {:<18} {} - {}{}\n",
                role.id.as_str().bold(),
                role.name,
                role.title,
                marker
            ));
        }
        output
    }

    fn banner(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::DebateStatus;
    use roundtable_domain::SessionId;

    fn role(id: &str, name: &str) -> Role {
        Role::new(id, name, "persona", "alex")
    }

    fn outcome(reason: TerminationReason, transcript: Vec<Turn>) -> DebateOutcome {
        let generated = transcript.len() as u64;
        DebateOutcome {
            session_id: SessionId::new(),
            shown: transcript.clone(),
            transcript,
            status: DebateStatus {
                generated,
                consumed: generated,
                total: 6,
                terminated: true,
                failure: reason.detail().map(str::to_string),
            },
            reason,
            playback: roundtable_application::PlaybackState::Drained,
        }
    }

    #[test]
    fn test_format_turn() {
        let turn = Turn::new(4, &role("economist", "Economist"), 2, "Prices matter.");
        let text = ConsoleFormatter::format_turn(&turn);
        assert!(text.contains("Round 2 · Economist"));
        assert!(text.contains("Prices matter."));
        assert!(!text.contains("audio"));
    }

    #[test]
    fn test_header_lists_participants() {
        let topic = Topic::new("Should we tax carbon?").unwrap();
        let text = ConsoleFormatter::header(
            &topic,
            &[role("a", "Alice"), role("b", "Bob"), role("c", "Cleo")],
            3,
        );
        assert!(text.contains("Should we tax carbon?"));
        assert!(text.contains("Alice"));
        assert!(text.contains("Cleo"));
    }

    #[test]
    fn test_summary_reports_counts_and_reason() {
        let turns = vec![Turn::new(1, &role("a", "Alice"), 1, "hi")];
        let text = ConsoleFormatter::format_summary(&outcome(
            TerminationReason::Failed("3 consecutive model failures".to_string()),
            turns,
        ));
        assert!(text.contains("Debate stopped"));
        assert!(text.contains("1/6 generated, 1 presented"));
        assert!(text.contains("3 consecutive model failures"));

        let text = ConsoleFormatter::format_summary(&outcome(TerminationReason::Completed, vec![]));
        assert!(text.contains("Debate complete"));
        assert!(!text.contains("Reason:"));
    }

    #[test]
    fn test_json_has_transcript_and_reason() {
        let turns = vec![Turn::new(1, &role("a", "Alice"), 1, "hi")];
        let json = ConsoleFormatter::format_json(&outcome(TerminationReason::Cancelled, turns));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reason"]["reason"], "cancelled");
        assert_eq!(value["transcript"][0]["content"], "hi");
        assert_eq!(value["status"]["generated"], 1);
        assert!(value.get("shown").is_none());
    }

    #[test]
    fn test_roles_listing_marks_defaults() {
        let text = ConsoleFormatter::format_roles(&RoleRegistry::builtin());
        assert!(text.contains("environmentalist"));
        assert!(text.contains("(default)"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
