//! Generative extraction client
//!
//! Fallback path for files the local heuristics cannot read. Sends the
//! flattened text to an OpenAI-compatible chat-completions endpoint with a
//! fixed instruction asking for a `{"guests": [...]}` JSON object, and
//! turns the response into loose guest candidates.
//!
//! The input is truncated to a hard character budget before sending to
//! bound cost and latency. Failures are terminal: retrying is a caller
//! (re-upload) concern, not handled here.

use crate::models::GuestCandidate;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Default chat-completions endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default extraction model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Input budget: ~1000 lines of ~50 characters
const MAX_INPUT_LINES: usize = 1000;
const MAX_INPUT_CHARS: usize = MAX_INPUT_LINES * 50;

/// Transport timeout for one extraction call
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level keys accepted for the guest array, tried in order
const ARRAY_KEYS: [&str; 5] = ["guests", "data", "results", "invites", "list"];

const SYSTEM_PROMPT: &str = "You are an expert at extracting guest information from various file formats. \
Extract names, table numbers and seat numbers from the following data. \
Keep table values exactly as written (named tables are valid). \
Return a JSON object with a \"guests\" array containing objects with the format: \
{\"guests\": [{\"guest_name\": \"Full Name\", \"table_number\": \"1\", \"seat_number\": \"1\"}]}";

/// Extraction client errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Invalid response from extraction service: {0}")]
    Parse(String),

    #[error("No guest array found in extraction response")]
    NoGuestArray,
}

/// Extraction service settings resolved at startup
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl ExtractionConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Client for the generative extraction service
pub struct ExtractionClient {
    http_client: reqwest::Client,
    config: ExtractionConfig,
}

impl ExtractionClient {
    pub fn new(config: ExtractionConfig) -> Result<Self, ExtractionError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Extract guest tuples from flattened file content
    ///
    /// Returns loosely-typed candidates; field naming and value cleanup are
    /// the normalizer's concern.
    pub async fn extract_guests(&self, content: &str) -> Result<Vec<GuestCandidate>, ExtractionError> {
        let bounded = bound_content(content);
        if bounded.len() < content.len() {
            tracing::warn!(
                original_chars = content.chars().count(),
                budget = MAX_INPUT_CHARS,
                "File exceeds extraction input budget, truncating"
            );
        }

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!("Extract guest information from this file:\n\n{}", bounded)
                }
            ],
            "response_format": { "type": "json_object" }
        });

        tracing::debug!(model = %self.config.model, chars = bounded.chars().count(), "Sending extraction request");

        let response = self
            .http_client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Api(status.as_u16(), error_text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        let message = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ExtractionError::Parse("missing choices content".to_string()))?;

        let parsed: Value = serde_json::from_str(message)
            .map_err(|e| ExtractionError::Parse(format!("response is not JSON: {}", e)))?;

        let guests = find_guest_array(&parsed).ok_or(ExtractionError::NoGuestArray)?;

        tracing::info!(count = guests.len(), "Extraction service returned guest tuples");

        Ok(guests.iter().map(GuestCandidate::from_value).collect())
    }
}

/// Truncate content to the input budget with a hard character cut
fn bound_content(content: &str) -> &str {
    match content.char_indices().nth(MAX_INPUT_CHARS) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Locate the guest array in a parsed response
///
/// A top-level array is accepted as-is; otherwise the first matching key
/// from the accepted list wins. Anything else means the response is
/// unusable.
fn find_guest_array(value: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(items) = value {
        return Some(items);
    }

    let object = value.as_object()?;
    ARRAY_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
}
