//! Extraction orchestration.
//!
//! Turns a video reference into a validated extraction result:
//! - picks the prompt mode (transcript-grounded vs search-augmented)
//! - calls the completion backend with rate-limit-aware retry
//! - parses and validates the response text
//! - carries over citation sources from search grounding

pub mod backend;
pub mod error;
pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod retry;
pub mod transcript;

use tracing::{info, warn};

use crate::domain::GroundingSource;

pub use backend::{CompletionBackend, CompletionRequest, CompletionResponse};
pub use error::ExtractError;
pub use gemini::GeminiBackend;
pub use parse::{ParsedExtraction, VocabEntry};
pub use retry::{RetryEvent, RetryPolicy};
pub use transcript::{TranscriptClient, TranscriptInfo};

/// Input to one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Source video reference
    pub video_url: String,

    /// Supplemental transcript text; absence switches the run to
    /// search-augmented mode
    pub transcript: Option<String>,
}

/// A validated extraction result.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Title the model detected for the video
    pub title: String,

    /// Summary of the video content
    pub summary: String,

    /// Validated vocabulary records
    pub vocabulary: Vec<VocabEntry>,

    /// Citations from search grounding
    pub sources: Vec<GroundingSource>,
}

/// Drives a completion backend through the full extraction algorithm.
pub struct Orchestrator<B> {
    backend: B,
    retry: RetryPolicy,
}

impl<B: CompletionBackend> Orchestrator<B> {
    /// Create an orchestrator with the default retry policy
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run an extraction, discarding retry progress.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<Extraction, ExtractError> {
        self.extract_with_progress(request, |_| {}).await
    }

    /// Run an extraction, reporting each retry step to `on_retry`.
    ///
    /// The callback fires once per failed-but-retryable attempt, before
    /// the corresponding backoff sleep.
    pub async fn extract_with_progress(
        &self,
        request: &ExtractionRequest,
        mut on_retry: impl FnMut(RetryEvent),
    ) -> Result<Extraction, ExtractError> {
        let completion = prompt::build_request(&request.video_url, request.transcript.as_deref());
        info!(
            url = %request.video_url,
            backend = self.backend.name(),
            search = completion.enable_search,
            "Starting extraction"
        );

        let mut attempt = 0u32;
        let response = loop {
            attempt += 1;

            match self.backend.generate(&completion).await {
                Ok(response) => break response,
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Completion call rate limited, retrying"
                    );
                    on_retry(RetryEvent { attempt, delay });
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        let parsed = parse::parse_extraction(&response.text)?;
        info!(
            title = %parsed.title,
            words = parsed.vocabulary.len(),
            citations = response.citations.len(),
            "Extraction validated"
        );

        Ok(Extraction {
            title: parsed.title,
            summary: parsed.summary,
            vocabulary: parsed.vocabulary,
            sources: response.citations,
        })
    }
}
