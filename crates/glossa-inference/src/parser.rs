//! Fallback JSON extraction and shape validation for model output text.
//!
//! Models wrap JSON in prose, code fences, or both. Extraction tries an
//! ordered list of string candidates and returns the first one that both
//! parses as JSON and validates against the expected shape:
//!
//! 1. the whole output text
//! 2. the contents of the first fenced code block (optionally tagged `json`)
//! 3. the substring between the first `[` and the last `]`
//! 4. the substring between the first `{` and the last `}`
//!
//! Validation is all-or-nothing per candidate: one malformed object makes
//! the whole candidate invalid rather than being dropped.

use serde_json::Value;

use glossa_core::{AssignmentCitation, Error, NoteDraft, Result};

/// Parse a notes array from model output text.
///
/// Accepts a bare array or an object with a `notes` key. Every note must
/// carry a non-empty `title` and three non-empty answer fields (legacy
/// `q1`/`q2`/`q3` key names are accepted).
pub fn parse_notes(text: &str) -> Result<Vec<NoteDraft>> {
    for candidate in json_candidates(text) {
        let Ok(value) = serde_json::from_str::<Value>(&candidate) else {
            continue;
        };
        if let Some(notes) = validate_notes(&value) {
            return Ok(notes);
        }
    }
    Err(Error::Parse(
        "model output did not contain a valid notes array".to_string(),
    ))
}

/// Parse an assignment-citation array from model output text.
///
/// Accepts a bare array or an object with an `assignments` key. Every
/// citation must carry a positive integer `line_number` (`line` is accepted
/// as an alias); `speaker` and `utterance` are optional.
pub fn parse_assignments(text: &str) -> Result<Vec<AssignmentCitation>> {
    for candidate in json_candidates(text) {
        let Ok(value) = serde_json::from_str::<Value>(&candidate) else {
            continue;
        };
        if let Some(citations) = validate_assignments(&value) {
            return Ok(citations);
        }
    }
    Err(Error::Parse(
        "model output did not contain a valid assignments array".to_string(),
    ))
}

/// Ordered extraction candidates for JSON parsing.
fn json_candidates(text: &str) -> Vec<String> {
    let mut candidates = vec![text.to_string()];
    if let Some(fenced) = fenced_block(text) {
        candidates.push(fenced);
    }
    if let Some(array) = delimited(text, '[', ']') {
        candidates.push(array);
    }
    if let Some(object) = delimited(text, '{', '}') {
        candidates.push(object);
    }
    candidates
}

/// Contents of the first ``` fenced block, with an optional `json` tag
/// stripped.
fn fenced_block(text: &str) -> Option<String> {
    let open = text.find("```")?;
    let rest = &text[open + 3..];
    let close = rest.find("```")?;
    let body = rest[..close].trim();
    let body = body.strip_prefix("json").unwrap_or(body);
    Some(body.trim().to_string())
}

/// Substring from the first `open` to the last `close`, inclusive.
fn delimited(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}

fn items_of<'a>(value: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get(key).and_then(Value::as_array),
        _ => None,
    }
}

fn validate_notes(value: &Value) -> Option<Vec<NoteDraft>> {
    let items = items_of(value, "notes")?;
    let mut notes = Vec::with_capacity(items.len());
    for item in items {
        let draft: NoteDraft = serde_json::from_value(item.clone()).ok()?;
        let complete = [&draft.title, &draft.answer_1, &draft.answer_2, &draft.answer_3]
            .iter()
            .all(|field| !field.trim().is_empty());
        if !complete {
            return None;
        }
        notes.push(draft);
    }
    Some(notes)
}

fn validate_assignments(value: &Value) -> Option<Vec<AssignmentCitation>> {
    let items = items_of(value, "assignments")?;
    let mut citations = Vec::with_capacity(items.len());
    for item in items {
        let citation: AssignmentCitation = serde_json::from_value(item.clone()).ok()?;
        if citation.line_number < 1 {
            return None;
        }
        citations.push(citation);
    }
    Some(citations)
}
