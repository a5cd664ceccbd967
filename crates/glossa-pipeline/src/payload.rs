//! Prompt payload serialization.
//!
//! Lines reach the model as a JSON array of `{line_number, speaker,
//! utterance}` objects. Blank speakers get a stand-in label; lines with
//! blank utterances are omitted entirely.

use serde::Serialize;

use glossa_core::{NoteDraft, Result, TranscriptLine, UNKNOWN_SPEAKER};

#[derive(Serialize)]
struct LinePayload<'a> {
    line_number: i32,
    speaker: &'a str,
    utterance: &'a str,
}

/// Serialize the in-scope lines for prompt composition.
pub fn transcript_payload(lines: &[TranscriptLine]) -> Result<String> {
    let payload: Vec<LinePayload<'_>> = lines
        .iter()
        .filter(|line| !line.utterance.trim().is_empty())
        .map(|line| LinePayload {
            line_number: line.line_number,
            speaker: if line.speaker.trim().is_empty() {
                UNKNOWN_SPEAKER
            } else {
                &line.speaker
            },
            utterance: &line.utterance,
        })
        .collect();
    Ok(serde_json::to_string(&payload)?)
}

/// Serialize one note draft for the assignment prompt.
pub fn note_payload(draft: &NoteDraft) -> Result<String> {
    Ok(serde_json::to_string(draft)?)
}
