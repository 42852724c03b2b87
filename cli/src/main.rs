//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{
    ConversationLogger, DebateProgressNotifier, NoConversationLogger, NoPresentation, NoProgress,
    PresentationSink, RetrievalCache, RetrievalStore, RunDebateInput, RunDebateUseCase,
    TerminationReason,
};
use roundtable_domain::RoleRegistry;
use roundtable_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, FileRetrievalStore, JsonlConversationLogger,
    ProviderKind, ProviderSet,
};
use roundtable_presentation::{
    Cli, ConsoleFormatter, ConsolePresentationSink, OutputConfig, OutputFormat, Pacing,
    ProgressReporter, SimpleProgress,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let registry = Arc::new(RoleRegistry::builtin());
    if cli.list_roles {
        print!("{}", ConsoleFormatter::format_roles(&registry));
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("Invalid configuration ({} problem(s))", issues.len());
    }

    if cli.clear_cache {
        match config.retrieval_store_dir() {
            Some(dir) => {
                let removed = FileRetrievalStore::new(&dir)
                    .clear()
                    .with_context(|| format!("Failed to clear {}", dir.display()))?;
                println!(
                    "Removed {} cached reference set(s) from {}",
                    removed,
                    dir.display()
                );
            }
            None => println!("Reference persistence is disabled; nothing to clear"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(topic) = cli.topic.clone() else {
        bail!("A debate topic is required. Use --list-roles to see the available roles.");
    };

    let output = output_config(&config, &cli);
    if !output.color {
        colored::control::set_override(false);
    }

    info!("Starting roundtable");

    // === Dependency Injection ===
    let kind = if cli.offline {
        ProviderKind::Offline
    } else {
        ProviderKind::Http
    };
    let providers = ProviderSet::from_config(&config, kind)?;

    let mut use_case = RunDebateUseCase::new(Arc::clone(&registry), providers.model)
        .with_params(config.worker_params());

    if let Some(provider) = providers.retrieval {
        let mut cache = RetrievalCache::new(provider)
            .with_ttl(config.cache_ttl())
            .with_fetch_timeout(config.retrieval_timeout());
        // Offline references must not end up in the shared store
        if !cli.offline
            && let Some(dir) = config.retrieval_store_dir()
        {
            info!(dir = %dir.display(), "Persisting supporting references");
            cache = cache.with_store(Arc::new(FileRetrievalStore::new(dir)));
        }
        use_case = use_case.with_retrieval(Arc::new(cache));
    }
    if let Some(speech) = providers.speech {
        use_case = use_case.with_speech(speech);
    }

    let text_output = config.output.format == FileOutputFormat::Text;
    // Bars only make sense next to the text transcript
    let reporter =
        (output.show_progress && text_output).then(|| Arc::new(ProgressReporter::new()));
    let progress: Arc<dyn DebateProgressNotifier> = match &reporter {
        Some(reporter) => reporter.clone() as Arc<dyn DebateProgressNotifier>,
        None if output.show_progress => Arc::new(SimpleProgress),
        None => Arc::new(NoProgress),
    };
    use_case = use_case.with_progress(progress);

    let logger: Arc<dyn ConversationLogger> = match &config.output.transcript {
        Some(path) => match JsonlConversationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => {
                warn!(path = %path, "Transcript disabled");
                Arc::new(NoConversationLogger)
            }
        },
        None => Arc::new(NoConversationLogger),
    };
    use_case = use_case.with_conversation_logger(logger);

    let sink: Arc<dyn PresentationSink> = if text_output {
        let mut sink = ConsolePresentationSink::new(pacing(&config));
        if let Some(reporter) = &reporter {
            sink = sink.with_progress_bars(reporter.multi());
        }
        Arc::new(sink)
    } else {
        Arc::new(NoPresentation)
    };

    let input = RunDebateInput::new(topic)
        .with_rounds(config.debate.rounds)
        .with_roles(config.role_ids())
        .with_rag(config.rag_settings())
        .with_tts(config.speech.enabled);

    if text_output {
        let participants = registry.resolve(&config.role_ids())?;
        let topic = roundtable_domain::Topic::new(input.topic.clone())?;
        println!(
            "{}",
            ConsoleFormatter::header(&topic, &participants, config.debate.rounds)
        );
    }

    // First Ctrl-C cancels the session, a second one exits immediately
    let shutdown = CancellationToken::new();
    let input = input.with_cancellation(shutdown.clone());
    let handle = use_case
        .start_debate(input, sink)
        .context("Could not start the debate")?;

    let ctrl_c = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            eprintln!("\nCancelling debate... (Ctrl-C again to quit)");
            shutdown.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    let outcome = handle.wait().await;
    ctrl_c.abort();

    let output = match config.output.format {
        FileOutputFormat::Text => ConsoleFormatter::format_summary(&outcome),
        FileOutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    println!("{}", output);

    Ok(match outcome.reason {
        TerminationReason::Completed => ExitCode::SUCCESS,
        TerminationReason::Cancelled => ExitCode::from(130),
        TerminationReason::Failed(_) => ExitCode::FAILURE,
    })
}

/// Command-line flags take precedence over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(rounds) = cli.rounds {
        config.debate.rounds = rounds;
    }
    if !cli.roles.is_empty() {
        config.debate.roles = cli.roles.clone();
    }
    if cli.no_rag {
        config.retrieval.enabled = false;
    }
    if let Some(max_refs) = cli.max_refs {
        config.retrieval.max_refs_per_role = max_refs;
    }
    if cli.tts {
        config.speech.enabled = true;
    }
    if let Some(pace) = cli.pace {
        config.playback.pace = pace;
    }
    if let Some(path) = &cli.transcript {
        config.output.transcript = Some(path.display().to_string());
    }
    if let Some(format) = cli.output {
        config.output.format = match format {
            OutputFormat::Text => FileOutputFormat::Text,
            OutputFormat::Json => FileOutputFormat::Json,
        };
    }
}

fn output_config(config: &FileConfig, cli: &Cli) -> OutputConfig {
    OutputConfig {
        color: config.output.color,
        show_progress: !cli.quiet,
    }
}

fn pacing(config: &FileConfig) -> Pacing {
    let playback = &config.playback;
    Pacing {
        pace: playback.pace,
        seconds_per_word: playback.seconds_per_word,
        min_seconds: playback.min_seconds,
        audio_buffer_seconds: playback.audio_buffer_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "roundtable",
            "--rounds",
            "5",
            "--role",
            "ethicist",
            "--role",
            "economist",
            "--role",
            "sociologist",
            "--no-rag",
            "--tts",
            "--pace",
            "0",
            "--transcript",
            "out/debate.jsonl",
            "-o",
            "json",
            "topic",
        ])
        .unwrap();
        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.debate.rounds, 5);
        assert_eq!(config.debate.roles, vec!["ethicist", "economist", "sociologist"]);
        assert!(!config.retrieval.enabled);
        assert!(config.speech.enabled);
        assert_eq!(config.output.transcript.as_deref(), Some("out/debate.jsonl"));
        assert_eq!(config.output.format, FileOutputFormat::Json);
        assert_eq!(pacing(&config).pace, 0.0);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["roundtable", "topic"]).unwrap();
        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_quiet_hides_progress() {
        let cli = Cli::try_parse_from(["roundtable", "--quiet", "topic"]).unwrap();
        let mut config = FileConfig::default();
        config.output.color = false;
        let output = output_config(&config, &cli);
        assert!(!output.show_progress);
        assert!(!output.color);
    }
}
