//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use verbatim_extractor::ExtractorConfig;

/// Verbatim - find themes and verbatim quotes in interview transcripts.
#[derive(Debug, Parser)]
#[command(name = "verbatim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VERBATIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Tables and Markdown (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the alias table and masked documents
    Mask(MaskArgs),

    /// Ask the model to propose themes per group
    Themes(ThemesArgs),

    /// Extract verbatim quotes for the manifest's themes
    Quotes(QuotesArgs),

    /// Ask questions about the transcripts
    Chat(ChatArgs),
}

/// Arguments for the mask command.
#[derive(Debug, Parser)]
pub struct MaskArgs {
    /// Run manifest (TOML)
    pub manifest: PathBuf,
}

/// Arguments for the themes command.
#[derive(Debug, Parser)]
pub struct ThemesArgs {
    /// Run manifest (TOML)
    pub manifest: PathBuf,

    /// How to group themes, e.g. "1) What can be improved 2) What is working"
    #[arg(short, long)]
    pub groups: String,

    /// Themes per group (1-10)
    #[arg(short, long)]
    pub max: Option<u32>,

    /// Sampling temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Write the themes as manifest TOML to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the quotes command.
#[derive(Debug, Parser)]
pub struct QuotesArgs {
    /// Run manifest (TOML)
    pub manifest: PathBuf,

    /// Quotes per participant per theme (1-5)
    #[arg(short, long)]
    pub max: Option<u32>,

    /// Sampling temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Additional notes for the model
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Documents processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write the Markdown report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the chat command.
#[derive(Debug, Parser)]
pub struct ChatArgs {
    /// Run manifest (TOML)
    pub manifest: PathBuf,

    /// Ask one question and exit; without it an interactive session starts
    #[arg(short, long)]
    pub question: Option<String>,

    /// Restrict to these participants (repeatable)
    #[arg(short, long = "participant")]
    pub participants: Vec<String>,

    /// Sampling temperature (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,
}

impl Command {
    /// Run manifest the command operates on.
    pub fn manifest(&self) -> &PathBuf {
        match self {
            Command::Mask(args) => &args.manifest,
            Command::Themes(args) => &args.manifest,
            Command::Quotes(args) => &args.manifest,
            Command::Chat(args) => &args.manifest,
        }
    }

    /// Apply command-line overrides on top of the configured defaults.
    pub fn apply_overrides(&self, config: &mut ExtractorConfig) {
        match self {
            Command::Mask(_) => {}
            Command::Themes(args) => {
                if let Some(max) = args.max {
                    config.theme_max_count = max;
                }
                if let Some(t) = args.temperature {
                    config.theme_temperature = t;
                }
            }
            Command::Quotes(args) => {
                if let Some(max) = args.max {
                    config.quote_max_count = max;
                }
                if let Some(t) = args.temperature {
                    config.quote_temperature = t;
                }
                if let Some(notes) = &args.notes {
                    config.additional_notes = notes.clone();
                }
                if let Some(n) = args.concurrency {
                    config.max_concurrent_requests = n;
                }
            }
            Command::Chat(args) => {
                if let Some(t) = args.temperature {
                    config.chat_temperature = t;
                }
            }
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_command() {
        let cli = Cli::parse_from(["verbatim", "mask", "run.toml"]);
        match cli.command {
            Command::Mask(args) => assert_eq!(args.manifest, PathBuf::from("run.toml")),
            _ => panic!("Expected Mask command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["verbatim", "mask", "run.toml", "--format", "json", "-v"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_themes_overrides() {
        let cli = Cli::parse_from([
            "verbatim",
            "themes",
            "run.toml",
            "--groups",
            "1) What works",
            "--max",
            "3",
            "-t",
            "0.2",
        ]);

        let mut config = ExtractorConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.theme_max_count, 3);
        assert_eq!(config.theme_temperature, 0.2);
        assert_eq!(config.quote_max_count, 1);
    }

    #[test]
    fn test_themes_requires_groups() {
        assert!(Cli::try_parse_from(["verbatim", "themes", "run.toml"]).is_err());
    }

    #[test]
    fn test_quotes_overrides() {
        let cli = Cli::parse_from([
            "verbatim",
            "quotes",
            "run.toml",
            "--notes",
            "Prefer short quotes",
            "--concurrency",
            "4",
        ]);

        let mut config = ExtractorConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.additional_notes, "Prefer short quotes");
        assert_eq!(config.max_concurrent_requests, 4);
        assert_eq!(config.quote_temperature, 0.3);
    }

    #[test]
    fn test_chat_participants() {
        let cli = Cli::parse_from([
            "verbatim", "chat", "run.toml", "-p", "Jane", "-p", "Omar", "-q", "Why?",
        ]);
        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.participants, vec!["Jane", "Omar"]);
                assert_eq!(args.question.as_deref(), Some("Why?"));
            }
            _ => panic!("Expected Chat command"),
        }
    }
}
