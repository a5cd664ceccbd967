//! Trait seams between the pipeline and its collaborators.
//!
//! The Postgres implementations live in `glossa-db`; the model client and
//! its mock live in `glossa-inference`. The pipeline is written against
//! these traits only.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AnnotatedDraft, ApiKey, CommitOutcome, GeneratedNote, LineScope, PromptSettings, Transcript,
    TranscriptLine, TranscriptStatus, WorkspaceUsage,
};

/// Backend for JSON-schema constrained text generation.
#[async_trait]
pub trait JsonGenerator: Send + Sync {
    /// Request model output constrained to `schema` and return the raw
    /// output text, whatever envelope shape the service used.
    async fn request_json(&self, input: &str, schema_name: &str, schema: &Value)
        -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Read access to stored prompt settings.
#[async_trait]
pub trait PromptSettingsStore: Send + Sync {
    /// Latest prompt settings for a transcript, if any exist.
    async fn latest_for_transcript(&self, transcript_id: Uuid) -> Result<Option<PromptSettings>>;
}

/// Transcript rows, their lines, and the generation status marker.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn fetch(&self, transcript_id: Uuid) -> Result<Option<Transcript>>;

    /// In-scope lines with non-blank utterances, ordered by line number.
    async fn lines_in_scope(
        &self,
        transcript_id: Uuid,
        scope: LineScope,
    ) -> Result<Vec<TranscriptLine>>;

    async fn update_status(&self, transcript_id: Uuid, status: TranscriptStatus) -> Result<()>;
}

/// Per-workspace generation quota.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Atomically consume one generation unit if the limit permits.
    ///
    /// Fails with [`crate::Error::QuotaExceeded`] when the counter has
    /// already reached the limit; the counter is unchanged in that case.
    async fn reserve(&self, workspace_id: Uuid) -> Result<WorkspaceUsage>;
}

/// Transactional writer and reader for generated notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist drafts with their line assignments and recompute the final
    /// transcript status, all within one transaction.
    async fn commit_generated(
        &self,
        transcript_id: Uuid,
        drafts: &[AnnotatedDraft],
    ) -> Result<CommitOutcome>;

    /// List persisted llm notes with their assigned line ids, in note order.
    async fn list_generated(&self, transcript_id: Uuid)
        -> Result<Vec<(GeneratedNote, Vec<Uuid>)>>;
}

/// Bearer-token lookup for the HTTP surface.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    async fn lookup(&self, token: &str) -> Result<Option<ApiKey>>;
}
