//! Gemini backend for vocabulary extraction.
//!
//! Calls the `generateContent` REST endpoint with an explicitly
//! injected API key. The key is a constructor argument; there is no
//! ambient/global credential lookup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::GroundingSource;

use super::backend::{CompletionBackend, CompletionRequest, CompletionResponse};
use super::error::ExtractError;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Gemini `generateContent` client
pub struct GeminiBackend {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a backend with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
        });

        if request.enable_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }

        if let Some(ref schema) = request.response_schema {
            body["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        body
    }
}

/// Error envelope returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: ApiError,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

/// Pull citations out of the grounding metadata, skipping entries that
/// lack a web title or URI.
fn collect_citations(response: &GenerateContentResponse) -> Vec<GroundingSource> {
    let chunks = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.as_slice())
        .unwrap_or_default();

    chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            Some(GroundingSource {
                title: web.title.clone()?,
                url: web.uri.clone()?,
            })
        })
        .collect()
}

fn response_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ExtractError> {
        let url = self.request_url();
        debug!(model = %self.model, search = request.enable_search, "Issuing completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| ExtractError::Network {
                service: "gemini".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let api_error = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error)
                .unwrap_or_default();
            let message = if api_error.message.is_empty() {
                format!("HTTP {}", status)
            } else {
                api_error.message
            };

            // 429 / quota exhaustion is the only retryable class
            if status.as_u16() == 429 || api_error.status == "RESOURCE_EXHAUSTED" {
                return Err(ExtractError::RateLimited { message });
            }
            return Err(ExtractError::UpstreamRejected { message });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| ExtractError::Network {
                service: "gemini".to_string(),
                message: e.to_string(),
            })?;

        let text = response_text(&parsed);
        if text.is_empty() {
            return Err(ExtractError::InvalidResponseFormat {
                reason: "completion response carried no text".to_string(),
            });
        }

        Ok(CompletionResponse {
            citations: collect_citations(&parsed),
            text,
        })
    }
}
