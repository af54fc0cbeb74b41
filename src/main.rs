use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vocards::cli::{Cli, Commands, ConfigAction};
use vocards::config::Config;
use vocards::error::VocardsError;
use vocards::pipeline::PipelineReport;
use vocards::vocab::{parse_vocab, read_vocab_file};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter());
    tracing::debug!(version = %vocards::version_string(), "vocards starting");

    match &cli.command {
        None | Some(Commands::Run) => {
            let config = load_config(&cli)?;
            let report = vocards::app::run(&config)
                .await
                .context("Cannot start the pipeline")?;
            if !cli.quiet {
                print_summary(&report);
            }
        }
        Some(Commands::Parse) => {
            let config = load_config(&cli)?;
            print_parsed(&config)?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, &cli)?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "vocards",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the `-q`/`-v` flags pick the level.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config.as_deref() {
        Some(path) => load_explicit(path)?,
        None => {
            let path = Config::default_path();
            Config::load_or_default(&path)
                .with_context(|| format!("Cannot load {}", path.display()))?
        }
    };

    Ok(apply_cli_overrides(config.with_env_overrides(), cli))
}

/// A config file named on the command line has to exist.
fn load_explicit(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(VocardsError::ConfigFileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Config::load_or_default(path).with_context(|| format!("Cannot load {}", path.display()))
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(vocab) = &cli.vocab {
        config.input.vocab_file = vocab.clone();
    }
    if let Some(deck) = &cli.deck {
        config.anki.deck = deck.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.pipeline.concurrency = concurrency;
        config.pipeline.enrich_workers = None;
        config.pipeline.speech_workers = None;
        config.pipeline.delivery_workers = None;
    }
    if let Some(dir) = &cli.audio_dir {
        config.pipeline.audio_dir = dir.clone();
    }
    config
}

fn print_parsed(config: &Config) -> Result<()> {
    let text = read_vocab_file(&config.input.vocab_file)?;
    let mut count = 0;
    for pair in parse_vocab(&text) {
        println!("{}  {}  {}", pair.translated, "→".dimmed(), pair.original);
        count += 1;
    }
    eprintln!(
        "{} record(s) in {}",
        count,
        config.input.vocab_file.display()
    );
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    let delivered = format!("{} delivered", report.delivered());
    let dropped = format!("{} dropped", report.dropped());
    println!(
        "{} of {} card(s): {}, {} ({})",
        "Done".bold(),
        report.seeded,
        delivered.green(),
        if report.dropped() > 0 {
            dropped.red().to_string()
        } else {
            dropped.dimmed().to_string()
        },
        humantime::format_duration(std::time::Duration::from_secs(report.elapsed.as_secs())),
    );
}

fn handle_config_command(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(cli)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = config_path(cli);
            let note = if path.exists() { "" } else { " (not found, using defaults)" };
            println!("{}{}", path.display(), note.dimmed());
        }
    }
    Ok(())
}
