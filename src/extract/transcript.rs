//! Client for the transcript companion service.
//!
//! The service resolves a video URL to raw transcript text plus a
//! display title. A disabled/unavailable transcript is not an error:
//! it comes back as `transcript: None` and the orchestrator falls back
//! to search-augmented mode.

use serde::Deserialize;
use tracing::debug;

use super::error::ExtractError;

const TRANSCRIPT_DISABLED: &str = "TRANSCRIPT_DISABLED";

/// Result of a transcript lookup
#[derive(Debug, Clone)]
pub struct TranscriptInfo {
    /// Full transcript text; `None` when the video has none available
    pub transcript: Option<String>,

    /// Display title of the video
    pub title: String,

    /// Resolved video identifier
    pub video_id: String,
}

/// Wire envelope: either the transcript payload or an error marker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptEnvelope {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the transcript endpoint
pub struct TranscriptClient {
    endpoint: String,
    client: reqwest::Client,
}

impl TranscriptClient {
    /// Create a client for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the transcript and title for a video URL.
    ///
    /// `api_key` is the optional secondary credential forwarded to the
    /// service as a header.
    pub async fn fetch(
        &self,
        video_url: &str,
        api_key: Option<&str>,
    ) -> Result<TranscriptInfo, ExtractError> {
        debug!(url = %video_url, "Fetching transcript");

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("url", video_url)]);

        if let Some(key) = api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| ExtractError::Network {
            service: "transcript".to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Network {
                service: "transcript".to_string(),
                message: format!("HTTP {}: {}", status, body.trim()),
            });
        }

        let envelope: TranscriptEnvelope =
            response.json().await.map_err(|e| ExtractError::Network {
                service: "transcript".to_string(),
                message: e.to_string(),
            })?;

        Self::resolve(envelope)
    }

    fn resolve(envelope: TranscriptEnvelope) -> Result<TranscriptInfo, ExtractError> {
        match envelope.error.as_deref() {
            // Transcript unavailable is the search-mode fallback signal
            Some(TRANSCRIPT_DISABLED) => Ok(TranscriptInfo {
                transcript: None,
                title: envelope
                    .title
                    .unwrap_or_else(|| "YouTube Video (No Transcript)".to_string()),
                video_id: envelope.video_id.unwrap_or_default(),
            }),
            Some(other) => Err(ExtractError::Network {
                service: "transcript".to_string(),
                message: other.to_string(),
            }),
            None => Ok(TranscriptInfo {
                transcript: envelope.transcript,
                title: envelope.title.unwrap_or_else(|| "YouTube Video".to_string()),
                video_id: envelope.video_id.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_transcript_payload() {
        let envelope: TranscriptEnvelope = serde_json::from_str(
            r#"{"transcript": "hello world", "title": "A Video", "videoId": "abc123xyz00"}"#,
        )
        .unwrap();

        let info = TranscriptClient::resolve(envelope).unwrap();
        assert_eq!(info.transcript.as_deref(), Some("hello world"));
        assert_eq!(info.title, "A Video");
        assert_eq!(info.video_id, "abc123xyz00");
    }

    #[test]
    fn test_resolve_disabled_is_not_an_error() {
        let envelope: TranscriptEnvelope = serde_json::from_str(
            r#"{"error": "TRANSCRIPT_DISABLED", "videoId": "abc123xyz00"}"#,
        )
        .unwrap();

        let info = TranscriptClient::resolve(envelope).unwrap();
        assert!(info.transcript.is_none());
        assert_eq!(info.video_id, "abc123xyz00");
    }

    #[test]
    fn test_resolve_other_error_propagates() {
        let envelope: TranscriptEnvelope =
            serde_json::from_str(r#"{"error": "upstream exploded"}"#).unwrap();

        assert!(matches!(
            TranscriptClient::resolve(envelope),
            Err(ExtractError::Network { .. })
        ));
    }
}
