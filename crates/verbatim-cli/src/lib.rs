//! Verbatim CLI library.
//!
//! This library provides the core functionality for the `verbatim` command-line
//! interface: configuration and run manifests, command execution, output
//! formatting and the interactive chat.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod manifest;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use manifest::{load_session, Manifest};
pub use output::Formatter;
