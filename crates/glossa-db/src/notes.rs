//! Generated-note store: the transactional commit writer and read access.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use glossa_core::{
    AnnotatedDraft, CommitOutcome, Error, GeneratedNote, NoteStore, Result, TranscriptStatus,
    NOTE_SOURCE_LLM,
};

/// PostgreSQL implementation of [`NoteStore`].
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn commit_generated(
        &self,
        transcript_id: Uuid,
        drafts: &[AnnotatedDraft],
    ) -> Result<CommitOutcome> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Numbering continues from the stored maximum, read fresh inside the
        // transaction so interleaved runs cannot reuse a number.
        let row = sqlx::query(
            "SELECT COALESCE(MAX(note_number), 0) AS max_number
             FROM note WHERE transcript_id = $1 AND source = $2",
        )
        .bind(transcript_id)
        .bind(NOTE_SOURCE_LLM)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;
        let start: i32 = row.get::<i32, _>("max_number") + 1;

        let now = Utc::now();
        let mut notes_created: i64 = 0;
        let mut assignments_created: i64 = 0;

        for (index, annotated) in drafts.iter().enumerate() {
            let note_id = Uuid::now_v7();
            sqlx::query(
                r#"
                INSERT INTO note (id, transcript_id, note_number, title,
                                  answer_1, answer_2, answer_3, source, created_at_utc)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(note_id)
            .bind(transcript_id)
            .bind(start + index as i32)
            .bind(&annotated.draft.title)
            .bind(&annotated.draft.answer_1)
            .bind(&annotated.draft.answer_2)
            .bind(&annotated.draft.answer_3)
            .bind(NOTE_SOURCE_LLM)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
            notes_created += 1;

            for line_id in &annotated.line_ids {
                let result = sqlx::query(
                    "INSERT INTO note_assignment (note_id, line_id) VALUES ($1, $2)
                     ON CONFLICT (note_id, line_id) DO NOTHING",
                )
                .bind(note_id)
                .bind(line_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
                assignments_created += result.rows_affected() as i64;
            }
        }

        // Final status comes from what is actually persisted, not from the
        // in-memory draft count.
        let persisted: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM note WHERE transcript_id = $1 AND source = $2",
        )
        .bind(transcript_id)
        .bind(NOTE_SOURCE_LLM)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?
        .get("n");

        let status = if persisted > 0 {
            TranscriptStatus::Generated
        } else {
            TranscriptStatus::NotGenerated
        };

        sqlx::query("UPDATE transcript SET annotation_status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(transcript_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "note_writer",
            op = "commit_generated",
            transcript_id = %transcript_id,
            note_count = notes_created,
            assignment_count = assignments_created,
            status = status.as_str(),
            "Committed generated notes"
        );

        Ok(CommitOutcome {
            notes_created,
            assignments_created,
            status,
        })
    }

    async fn list_generated(
        &self,
        transcript_id: Uuid,
    ) -> Result<Vec<(GeneratedNote, Vec<Uuid>)>> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.transcript_id, n.note_number, n.title,
                   n.answer_1, n.answer_2, n.answer_3, n.source, n.created_at_utc,
                   a.line_id
            FROM note n
            LEFT JOIN note_assignment a ON a.note_id = n.id
            WHERE n.transcript_id = $1 AND n.source = $2
            ORDER BY n.note_number, a.line_id
            "#,
        )
        .bind(transcript_id)
        .bind(NOTE_SOURCE_LLM)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut notes: Vec<(GeneratedNote, Vec<Uuid>)> = Vec::new();
        for row in rows {
            let note_id: Uuid = row.get("id");
            let line_id: Option<Uuid> = row.get("line_id");

            match notes.last_mut() {
                Some((note, line_ids)) if note.id == note_id => {
                    if let Some(line_id) = line_id {
                        line_ids.push(line_id);
                    }
                }
                _ => {
                    let note = GeneratedNote {
                        id: note_id,
                        transcript_id: row.get("transcript_id"),
                        note_number: row.get("note_number"),
                        title: row.get("title"),
                        answer_1: row.get("answer_1"),
                        answer_2: row.get("answer_2"),
                        answer_3: row.get("answer_3"),
                        source: row.get("source"),
                        created_at_utc: row.get("created_at_utc"),
                    };
                    notes.push((note, line_id.into_iter().collect()));
                }
            }
        }
        Ok(notes)
    }
}
