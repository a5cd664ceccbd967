//! Prompt settings store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use glossa_core::{Error, PromptSettings, PromptSettingsStore, Result};

/// PostgreSQL implementation of [`PromptSettingsStore`].
#[derive(Clone)]
pub struct PgPromptSettingsStore {
    pool: PgPool,
}

impl PgPromptSettingsStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromptSettingsStore for PgPromptSettingsStore {
    async fn latest_for_transcript(&self, transcript_id: Uuid) -> Result<Option<PromptSettings>> {
        let row = sqlx::query(
            r#"
            SELECT id, transcript_id, note_creation_prompt, note_assignment_prompt,
                   annotate_all_lines, range_start_line, range_end_line, created_at_utc
            FROM prompt_settings
            WHERE transcript_id = $1
            ORDER BY created_at_utc DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(transcript_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| PromptSettings {
            id: r.get("id"),
            transcript_id: r.get("transcript_id"),
            creation_prompt: r.get("note_creation_prompt"),
            assignment_prompt: r.get("note_assignment_prompt"),
            annotate_all_lines: r.get("annotate_all_lines"),
            range_start_line: r.get("range_start_line"),
            range_end_line: r.get("range_end_line"),
            created_at_utc: r.get("created_at_utc"),
        }))
    }
}
