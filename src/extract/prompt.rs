//! Prompt construction for the two extraction modes.
//!
//! Transcript mode embeds the fetched transcript verbatim and restricts
//! extraction to it. Search mode asks the model to locate the video via
//! its own search tool and reason about the content.

use super::backend::CompletionRequest;

/// Prompt used when a transcript is available. No search tool needed.
pub fn transcript_prompt(url: &str, transcript: &str) -> String {
    format!(
        "I need you to analyze the YouTube video at {url}.\n\
         \n\
         Below is the full transcript of the video. Work ONLY from this \
         transcript; do not use outside knowledge about the video.\n\
         \n\
         TRANSCRIPT:\n\
         {transcript}\n\
         \n\
         STEP 1: Write a detailed 150-word English summary of the content.\n\
         STEP 2: Identify 10-12 advanced English vocabulary words actually \
         used in the transcript.\n\
         STEP 3: Return the results as a single JSON object with the fields \
         detectedTitle, summary, and vocabulary (word, partOfSpeech, \
         translation in Traditional Chinese, example sentence from the \
         transcript). Emit JSON only."
    )
}

/// Prompt used when no transcript is available. Relies on the service's
/// search-augmentation capability.
pub fn search_prompt(url: &str) -> String {
    format!(
        "I need you to analyze this specific YouTube video: {url}\n\
         \n\
         STEP 1: Use Google Search to find the EXACT content, transcript, \
         or detailed summary of this video.\n\
         STEP 2: Based on the video content, identify 10-12 advanced \
         English vocabulary words used in it.\n\
         STEP 3: Return the results in a structured JSON format with the \
         fields detectedTitle, summary, and vocabulary (word, partOfSpeech, \
         translation in Traditional Chinese, example sentence from the \
         video)."
    )
}

/// Structured-output schema naming the expected response fields.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "detectedTitle": {
                "type": "STRING",
                "description": "The full title of the analyzed video."
            },
            "summary": {
                "type": "STRING",
                "description": "A detailed 150-word summary of the video content in English."
            },
            "vocabulary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "partOfSpeech": { "type": "STRING", "description": "n, v, adj, or adv." },
                        "translation": { "type": "STRING", "description": "Traditional Chinese translation." },
                        "example": { "type": "STRING", "description": "The sentence from the video containing this word." }
                    },
                    "required": ["word", "partOfSpeech", "translation", "example"]
                }
            }
        },
        "required": ["detectedTitle", "summary", "vocabulary"]
    })
}

/// Select the extraction mode and build the completion request.
pub fn build_request(video_url: &str, transcript: Option<&str>) -> CompletionRequest {
    match transcript {
        Some(text) => CompletionRequest {
            prompt: transcript_prompt(video_url, text),
            response_schema: Some(response_schema()),
            enable_search: false,
        },
        None => CompletionRequest {
            prompt: search_prompt(video_url),
            response_schema: Some(response_schema()),
            enable_search: true,
        },
    }
}
