//! Data model for the annotation-generation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Source marker for notes created by the generation pipeline.
pub const NOTE_SOURCE_LLM: &str = "llm";

/// Speaker label substituted when a transcript line has a blank speaker.
pub const UNKNOWN_SPEAKER: &str = "Unknown speaker";

// =============================================================================
// TRANSCRIPTS AND LINES
// =============================================================================

/// A transcript row as seen by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub status: TranscriptStatus,
}

/// A single transcript line.
///
/// `line_number` is unique within a transcript; `id` is the canonical
/// identifier note assignments reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub id: Uuid,
    pub line_number: i32,
    pub speaker: String,
    pub utterance: String,
}

/// Transcript generation lifecycle marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    NotGenerated,
    InProcess,
    Generated,
}

impl TranscriptStatus {
    /// Database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptStatus::NotGenerated => "not_generated",
            TranscriptStatus::InProcess => "in_process",
            TranscriptStatus::Generated => "generated",
        }
    }

    /// Parse the database representation.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "not_generated" => Ok(TranscriptStatus::NotGenerated),
            "in_process" => Ok(TranscriptStatus::InProcess),
            "generated" => Ok(TranscriptStatus::Generated),
            other => Err(Error::Internal(format!(
                "unknown transcript status '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// PROMPT SETTINGS
// =============================================================================

/// Stored prompt configuration for one transcript.
///
/// Several rows may exist per transcript; the most recently created one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSettings {
    pub id: Uuid,
    pub transcript_id: Uuid,
    pub creation_prompt: String,
    pub assignment_prompt: String,
    pub annotate_all_lines: bool,
    pub range_start_line: Option<i32>,
    pub range_end_line: Option<i32>,
    pub created_at_utc: DateTime<Utc>,
}

impl PromptSettings {
    /// Derive the line scope for this generation run.
    ///
    /// A range must be complete (both bounds present) and not inverted.
    pub fn line_scope(&self) -> Result<LineScope> {
        if self.annotate_all_lines {
            return Ok(LineScope::All);
        }
        match (self.range_start_line, self.range_end_line) {
            (Some(start), Some(end)) if start <= end => Ok(LineScope::Range { start, end }),
            (Some(start), Some(end)) => Err(Error::InvalidInput(format!(
                "inverted line range: start {} > end {}",
                start, end
            ))),
            _ => Err(Error::InvalidInput(
                "incomplete line range: both start and end are required".to_string(),
            )),
        }
    }
}

/// Subset of transcript lines eligible for annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScope {
    All,
    /// Inclusive on both ends.
    Range { start: i32, end: i32 },
}

impl LineScope {
    pub fn contains(&self, line_number: i32) -> bool {
        match self {
            LineScope::All => true,
            LineScope::Range { start, end } => (*start..=*end).contains(&line_number),
        }
    }
}

// =============================================================================
// NOTES AND ASSIGNMENTS
// =============================================================================

/// A note as parsed from model output, before persistence.
///
/// Legacy model outputs used `q1`/`q2`/`q3` for the answer fields; both key
/// spellings are accepted on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    #[serde(alias = "q1")]
    pub answer_1: String,
    #[serde(alias = "q2")]
    pub answer_2: String,
    #[serde(alias = "q3")]
    pub answer_3: String,
}

/// A persisted generated note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedNote {
    pub id: Uuid,
    pub transcript_id: Uuid,
    /// Strictly increasing per (transcript, source), continuing from the
    /// stored maximum.
    pub note_number: i32,
    pub title: String,
    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub source: String,
    pub created_at_utc: DateTime<Utc>,
}

/// A line citation as parsed from model output for one note.
///
/// `line` is accepted as an alias for `line_number`; speaker and utterance
/// are the fallback resolution key when the number is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentCitation {
    #[serde(alias = "line")]
    pub line_number: i64,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub utterance: Option<String>,
}

/// A parsed note together with its resolved supporting line ids.
#[derive(Debug, Clone)]
pub struct AnnotatedDraft {
    pub draft: NoteDraft,
    pub line_ids: Vec<Uuid>,
}

/// Result of one commit of generated notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    pub notes_created: i64,
    pub assignments_created: i64,
    pub status: TranscriptStatus,
}

// =============================================================================
// WORKSPACE USAGE
// =============================================================================

/// Per-workspace generation usage counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkspaceUsage {
    pub used_count: i32,
    pub usage_limit: i32,
}

// =============================================================================
// API KEYS
// =============================================================================

/// Caller role attached to an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(Error::Internal(format!("unknown role '{}'", other))),
        }
    }
}

/// An authenticated caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub role: Role,
}
