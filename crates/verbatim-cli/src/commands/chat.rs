//! Chat command implementation.

use crate::cli::ChatArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::repl::run_chat_repl;
use std::fmt::Display;
use tokio::runtime::Runtime;
use verbatim_domain::LlmProvider;
use verbatim_extractor::{Extractor, Session};

/// Execute the chat command.
///
/// With `--question` the answer is printed once; otherwise an interactive
/// chat starts. The readiness gate runs before either.
pub fn execute_chat<L>(
    args: &ChatArgs,
    session: &Session,
    extractor: &Extractor<L>,
    runtime: &Runtime,
    formatter: &Formatter,
    history_size: usize,
) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    session.check_ready()?;

    match &args.question {
        Some(question) => {
            let answer = runtime.block_on(extractor.answer(
                session,
                question,
                args.participants.as_slice(),
            ))?;
            println!("{}", formatter.format_answer(question, &answer)?);
            Ok(())
        }
        None => run_chat_repl(
            session,
            extractor,
            runtime,
            formatter,
            args.participants.clone(),
            history_size,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::path::PathBuf;
    use verbatim_domain::{AliasKind, AliasRow};
    use verbatim_extractor::ExtractorConfig;
    use verbatim_llm::MockProvider;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_one_shot_question_filters_participants() {
        let mut session = Session::new();
        session.add_document("a.txt", "Jane", "Acme pays late.");
        session.add_document("b.txt", "Omar", "Acme pays well.");
        session.set_alias_rows(vec![AliasRow::new(AliasKind::Company, "Acme")]);

        let llm = MockProvider::new("[company_1] pays well, says Omar.");
        let extractor = Extractor::new(llm.clone(), ExtractorConfig::default()).unwrap();
        let args = ChatArgs {
            manifest: PathBuf::from("run.toml"),
            question: Some("How is pay?".to_string()),
            participants: vec!["Omar".to_string()],
            temperature: None,
        };

        execute_chat(
            &args,
            &session,
            &extractor,
            &runtime(),
            &Formatter::new(OutputFormat::Table, false),
            100,
        )
        .unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        let user = &requests[0].messages[1].content;
        assert!(user.contains("[company_1] pays well."));
        assert!(!user.contains("pays late"));
    }

    #[test]
    fn test_empty_session_blocks_chat() {
        let llm = MockProvider::default();
        let extractor = Extractor::new(llm.clone(), ExtractorConfig::default()).unwrap();
        let args = ChatArgs {
            manifest: PathBuf::from("run.toml"),
            question: Some("Anything?".to_string()),
            participants: vec![],
            temperature: None,
        };

        let result = execute_chat(
            &args,
            &Session::new(),
            &extractor,
            &runtime(),
            &Formatter::new(OutputFormat::Table, false),
            100,
        );
        assert!(result.unwrap_err().is_blocking_warning());
        assert_eq!(llm.call_count(), 0);
    }
}
