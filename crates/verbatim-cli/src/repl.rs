//! Interactive chat over a session's transcripts.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use verbatim_domain::LlmProvider;
use verbatim_extractor::{Extractor, Session};

/// REPL command type.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Participants,
    Select(Vec<String>),
    Ask(String),
}

/// Run the interactive chat loop.
///
/// Every line that is not a REPL command is sent as a question over the
/// documents of the selected participants (all of them when none are
/// selected).
pub fn run_chat_repl<L>(
    session: &Session,
    extractor: &Extractor<L>,
    runtime: &Runtime,
    formatter: &Formatter,
    mut selected: Vec<String>,
    history_size: usize,
) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    println!(
        "{}",
        formatter.info("Verbatim chat - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = if selected.is_empty() {
            "verbatim> ".to_string()
        } else {
            format!("verbatim [{}]> ", selected.join(", "))
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    ReplCommand::Exit => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    ReplCommand::Help => print_help(formatter),
                    ReplCommand::Participants => print_participants(session, &selected),
                    ReplCommand::Select(names) => match validate_selection(session, names) {
                        Ok(names) => {
                            let message = if names.is_empty() {
                                "Using all documents".to_string()
                            } else {
                                format!("Using documents of {}", names.join(", "))
                            };
                            println!("{}", formatter.success(&message));
                            selected = names;
                        }
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    ReplCommand::Ask(question) => {
                        let answer = runtime.block_on(extractor.answer(
                            session,
                            &question,
                            selected.as_slice(),
                        ));
                        match answer {
                            Ok(answer) => match formatter.format_answer(&question, &answer) {
                                Ok(text) => println!("{}\n", text),
                                Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                            },
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> ReplCommand {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "exit" | "quit" | "q" if rest.is_empty() => ReplCommand::Exit,
        "help" | "?" if rest.is_empty() => ReplCommand::Help,
        "participants" if rest.is_empty() => ReplCommand::Participants,
        "select" => ReplCommand::Select(
            rest.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => ReplCommand::Ask(line.to_string()),
    }
}

/// Reject participant names the session does not know.
fn validate_selection(session: &Session, names: Vec<String>) -> Result<Vec<String>> {
    let unknown: Vec<&str> = names
        .iter()
        .filter(|n| !session.documents().iter().any(|d| &d.participant == *n))
        .map(String::as_str)
        .collect();

    if unknown.is_empty() {
        Ok(names)
    } else {
        Err(CliError::InvalidInput(format!(
            "Unknown participant(s): {}",
            unknown.join(", ")
        )))
    }
}

fn print_participants(session: &Session, selected: &[String]) {
    for doc in session.documents() {
        let marker = if selected.contains(&doc.participant) {
            "* "
        } else {
            "  "
        };
        println!("{}{} ({})", marker, doc.participant, doc.identifier);
    }
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>                - Ask about the selected transcripts");
    println!("  participants              - List participants (* = selected)");
    println!("  select <name>[, <name>]   - Restrict questions to these participants");
    println!("  select                    - Use every transcript again");
    println!("  help, ?                   - Show this help");
    println!("  exit, quit, q             - Exit chat");
    println!();
}
