//! Completion backend seam.
//!
//! The orchestrator talks to the completion service through this trait
//! so tests can substitute scripted backends for the real HTTP client.

use async_trait::async_trait;

use crate::domain::GroundingSource;

use super::error::ExtractError;

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Prompt content
    pub prompt: String,

    /// Structured-output schema, when the service supports one
    pub response_schema: Option<serde_json::Value>,

    /// Whether to enable the service's search-augmentation tool
    pub enable_search: bool,
}

/// What comes back from a completion call.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Raw response text (expected, but not guaranteed, to be JSON)
    pub text: String,

    /// Citations attached by search grounding, already filtered down to
    /// well-formed entries
    pub citations: Vec<GroundingSource>,
}

/// Trait for completion service backends
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Issue one completion request
    async fn generate(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ExtractError>;
}
