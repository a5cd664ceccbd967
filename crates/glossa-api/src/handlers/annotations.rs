//! Annotation generation and listing handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use glossa_core::{NoteStore, TranscriptStore};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

/// Response body for a successful generation run.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub transcript_id: Uuid,
    pub notes_created: i64,
    pub note_assignments_created: i64,
}

/// One generated note with its supporting line ids.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub note_number: i32,
    pub title: String,
    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub created_at_utc: DateTime<Utc>,
    pub line_ids: Vec<Uuid>,
}

/// Response body for the annotation listing.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub transcript_id: Uuid,
    pub notes: Vec<NoteResponse>,
}

/// Trigger annotation generation for a transcript.
///
/// Requires an admin API key scoped to the transcript's workspace. Quota is
/// consumed on attempt: a run that later fails upstream is not refunded.
///
/// # Returns
/// - 200 OK with created counts on success
/// - 400 Bad Request on an invalid or incomplete line-range configuration
/// - 401 Unauthorized without a valid bearer token
/// - 403 Forbidden for non-admin keys or another workspace's transcript
/// - 404 Not Found for unknown transcripts or missing prompt settings
/// - 429 Too Many Requests when the workspace quota is exhausted
/// - 502 Bad Gateway on model failure or malformed model output
pub async fn generate(
    State(state): State<AppState>,
    Path(transcript_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<GenerateResponse>, ApiError> {
    let key = auth::authenticate(&state, &headers).await?;
    auth::require_admin(&key)?;

    let transcript = state
        .db
        .transcripts
        .fetch(transcript_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("Transcript {} not found", transcript_id)))?;
    auth::require_workspace(&key, transcript.workspace_id)?;

    let report = state.pipeline.generate(transcript_id).await?;

    Ok(Json(GenerateResponse {
        success: true,
        transcript_id: report.transcript_id,
        notes_created: report.notes_created,
        note_assignments_created: report.note_assignments_created,
    }))
}

/// List generated annotations for a transcript.
///
/// Any role in the owning workspace may read.
pub async fn list(
    State(state): State<AppState>,
    Path(transcript_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ListResponse>, ApiError> {
    let key = auth::authenticate(&state, &headers).await?;

    let transcript = state
        .db
        .transcripts
        .fetch(transcript_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound(format!("Transcript {} not found", transcript_id)))?;
    auth::require_workspace(&key, transcript.workspace_id)?;

    let notes = state
        .db
        .notes
        .list_generated(transcript_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListResponse {
        success: true,
        transcript_id,
        notes: notes
            .into_iter()
            .map(|(note, line_ids)| NoteResponse {
                id: note.id,
                note_number: note.note_number,
                title: note.title,
                answer_1: note.answer_1,
                answer_2: note.answer_2,
                answer_3: note.answer_3,
                created_at_utc: note.created_at_utc,
                line_ids,
            })
            .collect(),
    }))
}
