//! Transcript store implementation: rows, lines, and generation status.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use glossa_core::{
    Error, LineScope, Result, Transcript, TranscriptLine, TranscriptStatus, TranscriptStore,
};

/// PostgreSQL implementation of [`TranscriptStore`].
#[derive(Clone)]
pub struct PgTranscriptStore {
    pool: PgPool,
}

impl PgTranscriptStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranscriptStore for PgTranscriptStore {
    async fn fetch(&self, transcript_id: Uuid) -> Result<Option<Transcript>> {
        let row = sqlx::query(
            "SELECT id, workspace_id, annotation_status FROM transcript WHERE id = $1",
        )
        .bind(transcript_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| {
            Ok(Transcript {
                id: r.get("id"),
                workspace_id: r.get("workspace_id"),
                status: TranscriptStatus::parse(r.get("annotation_status"))?,
            })
        })
        .transpose()
    }

    async fn lines_in_scope(
        &self,
        transcript_id: Uuid,
        scope: LineScope,
    ) -> Result<Vec<TranscriptLine>> {
        // Blank utterances never reach the prompt payload, so they are
        // filtered here and the resolver maps are built from the same set.
        let rows = match scope {
            LineScope::All => {
                sqlx::query(
                    r#"
                    SELECT id, line_number, speaker, utterance
                    FROM transcript_line
                    WHERE transcript_id = $1 AND btrim(utterance) <> ''
                    ORDER BY line_number
                    "#,
                )
                .bind(transcript_id)
                .fetch_all(&self.pool)
                .await
            }
            LineScope::Range { start, end } => {
                sqlx::query(
                    r#"
                    SELECT id, line_number, speaker, utterance
                    FROM transcript_line
                    WHERE transcript_id = $1
                      AND line_number BETWEEN $2 AND $3
                      AND btrim(utterance) <> ''
                    ORDER BY line_number
                    "#,
                )
                .bind(transcript_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| TranscriptLine {
                id: r.get("id"),
                line_number: r.get("line_number"),
                speaker: r.get("speaker"),
                utterance: r.get("utterance"),
            })
            .collect())
    }

    async fn update_status(&self, transcript_id: Uuid, status: TranscriptStatus) -> Result<()> {
        let result = sqlx::query("UPDATE transcript SET annotation_status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(transcript_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::TranscriptNotFound(transcript_id));
        }
        Ok(())
    }
}
