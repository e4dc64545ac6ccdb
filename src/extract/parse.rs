//! Resilient parsing and validation of completion responses.
//!
//! Even with a structured-output schema, search grounding can wrap the
//! JSON object in prose. Strategy: strict parse of the trimmed text
//! first, then a greedy first-`{`-to-last-`}` span extraction, then
//! give up with `InvalidResponseFormat`.

use serde::Deserialize;

use super::error::ExtractError;

/// A validated vocabulary record from the response.
///
/// `part_of_speech` is the canonical descriptor; `level` is accepted as
/// an alternate the model may emit instead. At least one must be
/// present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub word: String,

    #[serde(default)]
    pub part_of_speech: Option<String>,

    #[serde(default)]
    pub level: Option<String>,

    #[serde(alias = "definition")]
    pub translation: String,

    #[serde(alias = "sentence")]
    pub example: String,
}

/// The validated shape of a successful response.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedExtraction {
    #[serde(rename = "detectedTitle", alias = "title")]
    pub title: String,

    pub summary: String,

    pub vocabulary: Vec<VocabEntry>,
}

/// Greedy `{...}` span: from the first opening brace to the last
/// closing brace in the text.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn validate(parsed: ParsedExtraction) -> Result<ParsedExtraction, ExtractError> {
    for entry in &parsed.vocabulary {
        if entry.part_of_speech.is_none() && entry.level.is_none() {
            return Err(ExtractError::InvalidResponseFormat {
                reason: format!(
                    "vocabulary entry '{}' has neither a part of speech nor a level",
                    entry.word
                ),
            });
        }
    }
    Ok(parsed)
}

/// Parse and validate a completion response body.
pub fn parse_extraction(text: &str) -> Result<ParsedExtraction, ExtractError> {
    let trimmed = text.trim();

    let value = match serde_json::from_str::<ParsedExtraction>(trimmed) {
        Ok(parsed) => parsed,
        Err(strict_err) => {
            let span = json_span(trimmed).ok_or_else(|| ExtractError::InvalidResponseFormat {
                reason: strict_err.to_string(),
            })?;
            serde_json::from_str::<ParsedExtraction>(span).map_err(|e| {
                ExtractError::InvalidResponseFormat {
                    reason: e.to_string(),
                }
            })?
        }
    };

    validate(value)
}
