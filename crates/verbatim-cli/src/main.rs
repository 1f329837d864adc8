//! Verbatim CLI - themes and verbatim quotes from interview transcripts.

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use verbatim_cli::commands;
use verbatim_cli::{load_session, Cli, CliError, Command, Config, Formatter};
use verbatim_extractor::Extractor;
use verbatim_llm::OpenAiProvider;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr)
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        match e.downcast_ref::<CliError>() {
            Some(cli_error) if cli_error.is_blocking_warning() => {
                eprintln!("Blocked: {}", cli_error);
            }
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let session = load_session(cli.command.manifest())?;
    debug!(
        "Session {} loaded: {} documents, {} alias rules",
        session.id(),
        session.documents().len(),
        session.alias_table().len()
    );

    if let Command::Mask(_) = cli.command {
        commands::execute_mask(&session, &formatter)?;
        return Ok(());
    }

    let mut extraction = config.extraction.clone();
    cli.command.apply_overrides(&mut extraction);

    // The blocking HTTP client must be created and dropped outside the runtime,
    // so it is declared before it and outlives it
    let provider = OpenAiProvider::with_timeout(
        config.provider.base_url.clone(),
        std::env::var(&config.provider.api_key_env).with_context(|| {
            format!("{} is not set", config.provider.api_key_env)
        })?,
        extraction.request_timeout(),
    )?;
    let extractor = Extractor::new(provider, extraction)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match &cli.command {
        Command::Mask(_) => {}
        Command::Themes(args) => {
            runtime.block_on(commands::execute_themes(args, &session, &extractor, &formatter))?;
        }
        Command::Quotes(args) => {
            runtime.block_on(commands::execute_quotes(args, &session, &extractor, &formatter))?;
        }
        Command::Chat(args) => {
            commands::execute_chat(
                args,
                &session,
                &extractor,
                &runtime,
                &formatter,
                config.settings.history_size,
            )?;
        }
    }

    Ok(())
}
