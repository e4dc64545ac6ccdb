//! Typed failures for the extraction pipeline.

use thiserror::Error;

/// Failure taxonomy for an extraction run.
///
/// Only `RateLimited` is retryable; everything else terminates the run
/// immediately.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// No usable credential was available for the service.
    #[error("no API credential configured; run `vocabmaster set-key gemini` first")]
    MissingCredential,

    /// The service signalled a rate-limit/quota condition. Retried with
    /// backoff; surfaced only once the attempt cap is exhausted.
    #[error("rate limited by the completion service: {message}")]
    RateLimited { message: String },

    /// The response text could not be parsed or validated by either the
    /// strict or the fallback strategy.
    #[error("could not parse the completion response: {reason}")]
    InvalidResponseFormat { reason: String },

    /// The service reported a permission/access/model-availability
    /// rejection.
    #[error(
        "completion service rejected the request: {message}. \
         Check that the credential belongs to a project with access to \
         the model and search grounding"
    )]
    UpstreamRejected { message: String },

    /// Transport-level fault talking to an external service.
    #[error("network failure talking to {service}: {message}")]
    Network { service: String, message: String },
}

impl ExtractError {
    /// Whether the orchestrator may retry after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractError::RateLimited { .. })
    }
}
