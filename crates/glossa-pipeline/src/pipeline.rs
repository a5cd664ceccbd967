//! The annotation-generation orchestrator.
//!
//! Control flow per run: load settings and in-scope lines (failing fast on
//! an empty scope), reserve quota, mark the transcript `in_process`, one
//! creation call, parse, then one assignment call per note as a concurrent
//! all-or-nothing fan-out, resolve citations, and commit in a single
//! transaction that also recomputes the final status. Any failure between
//! the `in_process` write and the commit rolls the status back to
//! `not_generated` best-effort; commit failures surface as-is because the
//! transaction already failed atomically.

use std::sync::Arc;
use std::time::Instant;

use futures::future;
use tracing::{debug, info, warn};
use uuid::Uuid;

use glossa_core::{
    AnnotatedDraft, Error, JsonGenerator, NoteDraft, NoteStore, PromptSettings,
    PromptSettingsStore, QuotaStore, Result, TranscriptLine, TranscriptStatus, TranscriptStore,
};
use glossa_inference::prompt::PromptComposer;
use glossa_inference::schemas::{
    assignments_schema, notes_schema, ASSIGNMENTS_SCHEMA_NAME, NOTES_SCHEMA_NAME,
};
use glossa_inference::{parse_assignments, parse_notes};

use crate::payload;
use crate::resolver::LineResolver;

/// Result of a successful generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport {
    pub transcript_id: Uuid,
    pub notes_created: i64,
    pub note_assignments_created: i64,
}

/// Orchestrates one annotation-generation run per call.
pub struct AnnotationPipeline {
    settings: Arc<dyn PromptSettingsStore>,
    transcripts: Arc<dyn TranscriptStore>,
    quota: Arc<dyn QuotaStore>,
    notes: Arc<dyn NoteStore>,
    generator: Arc<dyn JsonGenerator>,
    composer: PromptComposer,
}

impl AnnotationPipeline {
    pub fn new(
        settings: Arc<dyn PromptSettingsStore>,
        transcripts: Arc<dyn TranscriptStore>,
        quota: Arc<dyn QuotaStore>,
        notes: Arc<dyn NoteStore>,
        generator: Arc<dyn JsonGenerator>,
        composer: PromptComposer,
    ) -> Self {
        Self {
            settings,
            transcripts,
            quota,
            notes,
            generator,
            composer,
        }
    }

    /// Run the full generation pipeline for one transcript.
    pub async fn generate(&self, transcript_id: Uuid) -> Result<GenerationReport> {
        let start = Instant::now();

        let transcript = self
            .transcripts
            .fetch(transcript_id)
            .await?
            .ok_or(Error::TranscriptNotFound(transcript_id))?;

        let settings = self
            .settings
            .latest_for_transcript(transcript_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("prompt settings for transcript {}", transcript_id))
            })?;

        let scope = settings.line_scope()?;
        let lines = self.transcripts.lines_in_scope(transcript_id, scope).await?;
        if lines.is_empty() {
            return Err(Error::InvalidInput(
                "no transcript lines in the requested scope".to_string(),
            ));
        }

        // Quota is consumed on attempt, before any external call; a failed
        // run is not refunded.
        let usage = self.quota.reserve(transcript.workspace_id).await?;
        debug!(
            subsystem = "pipeline",
            op = "reserve",
            workspace_id = %transcript.workspace_id,
            used_count = usage.used_count,
            usage_limit = usage.usage_limit,
            "Quota reserved"
        );

        self.transcripts
            .update_status(transcript_id, TranscriptStatus::InProcess)
            .await?;

        info!(
            subsystem = "pipeline",
            op = "generate",
            transcript_id = %transcript_id,
            line_count = lines.len(),
            "Starting annotation generation"
        );

        // Everything from here to the commit rolls status back on failure.
        let annotated = match self.generate_drafts(&settings, &lines).await {
            Ok(annotated) => annotated,
            Err(err) => {
                self.rollback_status(transcript_id).await;
                return Err(err);
            }
        };

        // Commit failures are surfaced as-is: the transaction failed
        // atomically, so no partial state exists to correct.
        let outcome = self.notes.commit_generated(transcript_id, &annotated).await?;

        info!(
            subsystem = "pipeline",
            op = "generate",
            transcript_id = %transcript_id,
            note_count = outcome.notes_created,
            assignment_count = outcome.assignments_created,
            status = outcome.status.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Annotation generation complete"
        );

        Ok(GenerationReport {
            transcript_id,
            notes_created: outcome.notes_created,
            note_assignments_created: outcome.assignments_created,
        })
    }

    /// Creation call, parse, and the assignment fan-out.
    async fn generate_drafts(
        &self,
        settings: &PromptSettings,
        lines: &[TranscriptLine],
    ) -> Result<Vec<AnnotatedDraft>> {
        let transcript_json = payload::transcript_payload(lines)?;

        let creation_prompt = self
            .composer
            .compose_creation(&settings.creation_prompt, &transcript_json);
        let raw = self
            .generator
            .request_json(&creation_prompt, NOTES_SCHEMA_NAME, &notes_schema())
            .await?;
        let drafts = parse_notes(&raw)?;

        info!(
            subsystem = "pipeline",
            op = "parse_notes",
            note_count = drafts.len(),
            "Parsed generated notes"
        );

        // Lookup maps are built once and shared read-only across the
        // fan-out.
        let resolver = LineResolver::new(lines);
        let schema = assignments_schema();

        // One call per note, joined all-or-nothing: the first failure
        // aborts the join and drops the remaining in-flight calls.
        future::try_join_all(drafts.into_iter().map(|draft| {
            let transcript_json = &transcript_json;
            let resolver = &resolver;
            let schema = &schema;
            let template = &settings.assignment_prompt;
            async move {
                let line_ids = self
                    .assign_lines(template, transcript_json, &draft, resolver, schema)
                    .await?;
                Ok::<_, Error>(AnnotatedDraft { draft, line_ids })
            }
        }))
        .await
    }

    /// One assignment call for one note.
    async fn assign_lines(
        &self,
        template: &str,
        transcript_json: &str,
        draft: &NoteDraft,
        resolver: &LineResolver,
        schema: &serde_json::Value,
    ) -> Result<Vec<Uuid>> {
        let note_json = payload::note_payload(draft)?;
        let prompt = self
            .composer
            .compose_assignment(template, transcript_json, &note_json);
        let raw = self
            .generator
            .request_json(&prompt, ASSIGNMENTS_SCHEMA_NAME, schema)
            .await?;
        let citations = parse_assignments(&raw)?;
        Ok(resolver.resolve_all(&citations))
    }

    /// Best-effort rollback to `not_generated`.
    ///
    /// A failed rollback write is logged and swallowed so it never masks
    /// the error that triggered it.
    async fn rollback_status(&self, transcript_id: Uuid) {
        if let Err(rollback_err) = self
            .transcripts
            .update_status(transcript_id, TranscriptStatus::NotGenerated)
            .await
        {
            warn!(
                subsystem = "pipeline",
                op = "rollback_status",
                transcript_id = %transcript_id,
                error = %rollback_err,
                "Failed to roll back transcript status"
            );
        }
    }
}
