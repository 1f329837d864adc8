//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{parse_quote_response, parse_theme_response};
use crate::prompt::{chat_messages, quote_messages, theme_messages};
use crate::schema::{quote_schema, theme_schema};
use crate::session::Session;
use crate::types::{
    ChatRequest, ExtractionMetadata, QuoteExtractionResult, QuoteRequest, ThemeRequest,
};
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use verbatim_domain::{
    aggregate, CompletionRequest, ExtractedQuote, LlmProvider, QuoteRecord, ThemeDefinition,
};

/// Runs theme definition, quote extraction and chat against an LLM
///
/// Only masked text is ever placed in a request. Session-level operations
/// mask the documents and every piece of typed prompt text (grouping
/// instructions, notes, questions) with the session's alias table. They run
/// the readiness gate first, so a validation error means no call was made.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create a new Extractor, validating the configuration
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Ask the model to propose themes for each group
    pub async fn define_themes(
        &self,
        request: ThemeRequest,
    ) -> Result<Vec<ThemeDefinition>, ExtractorError> {
        let completion = CompletionRequest {
            model: self.config.model.clone(),
            messages: theme_messages(
                &request.corpus,
                &request.grouping_instructions,
                request.max_themes_per_group,
            ),
            temperature: request.temperature,
            response_schema: Some(theme_schema()),
        };

        debug!(
            "Theme prompt over {} documents, {} chars",
            request.corpus.len(),
            prompt_len(&completion)
        );

        let response = call_llm(
            Arc::clone(&self.llm_provider),
            completion,
            self.config.request_timeout(),
        )
        .await?;

        debug!("Theme response length: {} chars", response.len());

        let themes = parse_theme_response(&response)?;
        info!("Model proposed {} themes", themes.len());
        Ok(themes)
    }

    /// Extract verbatim quotes from one document
    pub async fn extract_quotes(
        &self,
        request: QuoteRequest,
    ) -> Result<Vec<ExtractedQuote>, ExtractorError> {
        run_quote_request(
            Arc::clone(&self.llm_provider),
            self.config.model.clone(),
            self.config.request_timeout(),
            request,
        )
        .await
    }

    /// Answer a free-form question over a corpus
    pub async fn ask(&self, request: ChatRequest) -> Result<String, ExtractorError> {
        let completion = CompletionRequest {
            model: self.config.model.clone(),
            messages: chat_messages(&request.corpus, &request.question),
            temperature: request.temperature,
            response_schema: None,
        };

        debug!(
            "Chat prompt over {} documents, {} chars",
            request.corpus.len(),
            prompt_len(&completion)
        );

        call_llm(
            Arc::clone(&self.llm_provider),
            completion,
            self.config.request_timeout(),
        )
        .await
    }

    /// Propose themes over every document of a session
    ///
    /// The returned themes may contain mask tokens; they are meant to be
    /// stored back into the session and unmasked only for display.
    pub async fn suggest_themes(
        &self,
        session: &Session,
        grouping_instructions: &str,
    ) -> Result<Vec<ThemeDefinition>, ExtractorError> {
        session.check_ready()?;
        if grouping_instructions.trim().is_empty() {
            return Err(ExtractorError::MissingGrouping);
        }

        info!(
            "Session {}: defining themes over {} documents",
            session.id(),
            session.documents().len()
        );

        self.define_themes(ThemeRequest {
            corpus: session.masked_corpus(),
            grouping_instructions: session.alias_table().mask(grouping_instructions),
            max_themes_per_group: self.config.theme_max_count,
            temperature: self.config.theme_temperature,
        })
        .await
    }

    /// Extract quotes for the session's active themes from every document
    ///
    /// Fails as a whole if any single document call fails.
    pub async fn extract_session_quotes(
        &self,
        session: &Session,
    ) -> Result<QuoteExtractionResult, ExtractorError> {
        session.check_ready()?;
        let themes = session.active_themes();
        if themes.is_empty() {
            return Err(ExtractorError::NoThemes);
        }

        let start_time = Instant::now();
        let documents = session.documents();
        let additional_notes = session.alias_table().mask(&self.config.additional_notes);

        info!(
            "Session {}: extracting quotes from {} documents for {} themes",
            session.id(),
            documents.len(),
            themes.len()
        );

        let jobs: Vec<QuoteRequest> = documents
            .iter()
            .map(|d| QuoteRequest {
                document_text: d.masked_text.clone(),
                themes: themes.clone(),
                max_quotes: self.config.quote_max_count,
                additional_notes: additional_notes.clone(),
                temperature: self.config.quote_temperature,
            })
            .collect();

        let batches = self.collect_batches(jobs).await?;

        let records: Vec<QuoteRecord> = batches
            .into_iter()
            .zip(documents)
            .flat_map(|(batch, document)| {
                batch
                    .into_iter()
                    .map(move |q| q.with_participant(document.participant.clone()))
            })
            .collect();

        let aggregated = aggregate(&records);

        let metadata = ExtractionMetadata {
            session_id: session.id(),
            model_name: self.config.model.clone(),
            documents_processed: documents.len(),
            quotes_extracted: records.len(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };

        info!(
            "Extraction complete: {} quotes from {} documents in {}ms",
            metadata.quotes_extracted, metadata.documents_processed, metadata.processing_time_ms
        );

        Ok(QuoteExtractionResult {
            records,
            aggregated,
            metadata,
        })
    }

    /// Answer a question over the session, restricted to the given
    /// participants (all when empty), with raw terms restored
    pub async fn answer<S: AsRef<str>>(
        &self,
        session: &Session,
        question: &str,
        participants: &[S],
    ) -> Result<String, ExtractorError> {
        session.check_ready()?;

        let corpus = session.masked_corpus_for(participants);
        if corpus.is_empty() {
            warn!("No documents match the selected participants");
            return Err(ExtractorError::EmptyInput);
        }

        info!(
            "Session {}: answering question over {} documents",
            session.id(),
            corpus.len()
        );

        let answer = self
            .ask(ChatRequest {
                corpus,
                question: session.alias_table().mask(question),
                temperature: self.config.chat_temperature,
            })
            .await?;

        Ok(session.alias_table().unmask(&answer))
    }

    /// Run one quote request per document, returning batches in document
    /// order regardless of completion order
    async fn collect_batches(
        &self,
        jobs: Vec<QuoteRequest>,
    ) -> Result<Vec<Vec<ExtractedQuote>>, ExtractorError> {
        let total = jobs.len();
        let limit = self.config.max_concurrent_requests;

        if limit <= 1 || total <= 1 {
            let mut batches = Vec::with_capacity(total);
            for (idx, job) in jobs.into_iter().enumerate() {
                debug!("Processing document {}/{}", idx + 1, total);
                batches.push(self.extract_quotes(job).await?);
            }
            return Ok(batches);
        }

        debug!("Processing {} documents, {} at a time", total, limit);

        let semaphore = Arc::new(Semaphore::new(limit));
        let mut tasks = JoinSet::new();

        for (idx, job) in jobs.into_iter().enumerate() {
            let llm = Arc::clone(&self.llm_provider);
            let model = self.config.model.clone();
            let request_timeout = self.config.request_timeout();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ExtractorError::Llm(format!("Semaphore closed: {}", e)))?;
                let quotes = run_quote_request(llm, model, request_timeout, job).await?;
                Ok::<_, ExtractorError>((idx, quotes))
            });
        }

        let mut slots: Vec<Option<Vec<ExtractedQuote>>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            let (idx, quotes) =
                joined.map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))??;
            debug!("Document {}/{} done", idx + 1, total);
            slots[idx] = Some(quotes);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ExtractorError::Llm("Missing quote batch".to_string()))
    }
}

async fn run_quote_request<L>(
    llm: Arc<L>,
    model: String,
    request_timeout: Duration,
    request: QuoteRequest,
) -> Result<Vec<ExtractedQuote>, ExtractorError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let completion = CompletionRequest {
        model,
        messages: quote_messages(
            &request.document_text,
            &request.themes,
            request.max_quotes,
            &request.additional_notes,
        ),
        temperature: request.temperature,
        response_schema: Some(quote_schema()),
    };

    debug!("Quote prompt length: {} chars", prompt_len(&completion));

    let response = call_llm(llm, completion, request_timeout).await?;
    let quotes = parse_quote_response(&response)?;

    debug!("Parsed {} quotes", quotes.len());
    Ok(quotes)
}

/// Call the provider on the blocking pool, bounded by a timeout
async fn call_llm<L>(
    llm: Arc<L>,
    request: CompletionRequest,
    request_timeout: Duration,
) -> Result<String, ExtractorError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    // LlmProvider is synchronous
    let call = tokio::task::spawn_blocking(move || {
        llm.complete(&request)
            .map_err(|e| ExtractorError::Llm(e.to_string()))
    });

    match timeout(request_timeout, call).await {
        Ok(joined) => {
            joined.map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
        }
        Err(_) => {
            warn!("LLM call exceeded {}s", request_timeout.as_secs());
            Err(ExtractorError::Timeout(request_timeout.as_secs()))
        }
    }
}

fn prompt_len(request: &CompletionRequest) -> usize {
    request.messages.iter().map(|m| m.content.len()).sum()
}
