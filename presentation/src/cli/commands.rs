//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Turns as they are presented, then a summary
    Text,
    /// The full outcome as JSON once the debate ends
    Json,
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Roundtable - Personas debate a topic turn by turn")]
#[command(long_about = r#"
Roundtable runs a moderated debate between role-played participants.

Each round, every participant speaks once in a fixed order. Turns are
generated in the background and presented one at a time, so the next
speaker is usually ready before the current one finishes.

Participants may be given supporting references, fetched once per role
and reused for later rounds.

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables (e.g. ROUNDTABLE_DEBATE__ROUNDS=4)
2. --config <path>          Explicit config file
3. ./roundtable.toml        Project-level config
4. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Should cities ban private cars from their centres?"
  roundtable -r 4 --role ethicist --role economist --role tech_expert "Regulate AI?"
  roundtable --offline --pace 0 "Is nuclear power green?"
"#)]
pub struct Cli {
    /// The debate topic (not required with --list-roles, --clear-cache or --show-config)
    pub topic: Option<String>,

    /// Number of rounds (2-8)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Participant role ids in speaking order (can be specified multiple times)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Debate without supporting references
    #[arg(long)]
    pub no_rag: bool,

    /// Supporting references per role (1-5)
    #[arg(long, value_name = "N")]
    pub max_refs: Option<usize>,

    /// Synthesize speech for each turn
    #[arg(long)]
    pub tts: bool,

    /// Use built-in offline providers instead of remote endpoints
    #[arg(long)]
    pub offline: bool,

    /// Presentation pace multiplier (0 shows turns without delay)
    #[arg(long, value_name = "FACTOR")]
    pub pace: Option<f64>,

    /// Write a JSONL transcript to this path
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// List the available roles and exit
    #[arg(long)]
    pub list_roles: bool,

    /// Remove persisted supporting references and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
