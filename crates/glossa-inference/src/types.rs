//! Request and response types for the model endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request body for the responses endpoint.
#[derive(Debug, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: String,
    pub text: TextOptions,
}

/// Output-format options for a responses request.
#[derive(Debug, Serialize)]
pub struct TextOptions {
    pub format: TextFormat,
}

/// JSON-schema output constraint.
#[derive(Debug, Serialize)]
pub struct TextFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

impl TextFormat {
    /// Strict JSON-schema mode for the named schema.
    pub fn json_schema(name: &str, schema: Value) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            name: name.to_string(),
            schema,
            strict: true,
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Response from the responses endpoint.
///
/// The service has used several envelope shapes over time: a flat
/// `output_text` string, or an `output` array of items each carrying a
/// `content` array of text entries. Both are modeled; extraction prefers the
/// flat field.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<OutputItem>>,
}

/// Item in the `output` array.
#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Option<Vec<ContentEntry>>,
}

/// Entry in an output item's `content` array.
#[derive(Debug, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub text: Option<String>,
}

impl ResponsesResponse {
    /// Extract output text from whichever envelope shape the service used.
    ///
    /// Returns `None` when neither shape yields any text.
    pub fn extract_text(self) -> Option<String> {
        if let Some(text) = self.output_text {
            if !text.is_empty() {
                return Some(text);
            }
        }

        let pieces: Vec<String> = self
            .output?
            .into_iter()
            .filter_map(|item| item.content)
            .flatten()
            .filter_map(|entry| entry.text)
            .collect();

        if pieces.is_empty() {
            None
        } else {
            Some(pieces.join("\n"))
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error envelope from the model endpoint.
#[derive(Debug, Deserialize)]
pub struct ResponsesErrorEnvelope {
    pub error: ResponsesError,
}

/// Nested error object.
#[derive(Debug, Deserialize)]
pub struct ResponsesError {
    pub message: String,
    #[serde(rename = "type")]
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
