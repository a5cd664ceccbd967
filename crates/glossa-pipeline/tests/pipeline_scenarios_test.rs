//! End-to-end pipeline scenarios against in-memory stores and the mock
//! generator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use glossa_core::{
    AnnotatedDraft, CommitOutcome, Error, GeneratedNote, LineScope, NoteStore, PromptSettings,
    PromptSettingsStore, QuotaStore, Result, Transcript, TranscriptLine, TranscriptStatus,
    TranscriptStore, WorkspaceUsage, NOTE_SOURCE_LLM,
};
use glossa_inference::prompt::{PromptBoilerplate, PromptComposer};
use glossa_inference::schemas::{ASSIGNMENTS_SCHEMA_NAME, NOTES_SCHEMA_NAME};
use glossa_inference::MockGenerator;
use glossa_pipeline::AnnotationPipeline;

// =============================================================================
// IN-MEMORY WORLD
// =============================================================================

struct World {
    transcript: Transcript,
    settings: Option<PromptSettings>,
    lines: Vec<TranscriptLine>,
    usage: Mutex<WorkspaceUsage>,
    status_history: Mutex<Vec<TranscriptStatus>>,
    committed: Mutex<Vec<AnnotatedDraft>>,
    fail_rollback: AtomicBool,
}

impl World {
    fn new(lines: Vec<TranscriptLine>, settings_kind: SettingsKind, used: i32, limit: i32) -> Self {
        let transcript_id = Uuid::new_v4();
        let settings = match settings_kind {
            SettingsKind::Missing => None,
            SettingsKind::AllLines => Some(settings(transcript_id, true, None, None)),
            SettingsKind::Range(start, end) => {
                Some(settings(transcript_id, false, Some(start), Some(end)))
            }
        };
        Self {
            transcript: Transcript {
                id: transcript_id,
                workspace_id: Uuid::new_v4(),
                status: TranscriptStatus::NotGenerated,
            },
            settings,
            lines,
            usage: Mutex::new(WorkspaceUsage {
                used_count: used,
                usage_limit: limit,
            }),
            status_history: Mutex::new(Vec::new()),
            committed: Mutex::new(Vec::new()),
            fail_rollback: AtomicBool::new(false),
        }
    }

    fn current_status(&self) -> TranscriptStatus {
        self.status_history
            .lock()
            .unwrap()
            .last()
            .copied()
            .unwrap_or(self.transcript.status)
    }

    fn used(&self) -> i32 {
        self.usage.lock().unwrap().used_count
    }

    fn persisted_notes(&self) -> usize {
        self.committed.lock().unwrap().len()
    }
}

enum SettingsKind {
    Missing,
    AllLines,
    Range(i32, i32),
}

fn settings(
    transcript_id: Uuid,
    all: bool,
    start: Option<i32>,
    end: Option<i32>,
) -> PromptSettings {
    PromptSettings {
        id: Uuid::new_v4(),
        transcript_id,
        creation_prompt: "Find themes in <<transcript>>.".to_string(),
        assignment_prompt: "Cite lines for <<note>> in <<transcript>>.".to_string(),
        annotate_all_lines: all,
        range_start_line: start,
        range_end_line: end,
        created_at_utc: Utc::now(),
    }
}

fn line(number: i32, speaker: &str, utterance: &str) -> TranscriptLine {
    TranscriptLine {
        id: Uuid::new_v4(),
        line_number: number,
        speaker: speaker.to_string(),
        utterance: utterance.to_string(),
    }
}

#[async_trait]
impl PromptSettingsStore for World {
    async fn latest_for_transcript(&self, _transcript_id: Uuid) -> Result<Option<PromptSettings>> {
        Ok(self.settings.clone())
    }
}

#[async_trait]
impl TranscriptStore for World {
    async fn fetch(&self, transcript_id: Uuid) -> Result<Option<Transcript>> {
        if transcript_id == self.transcript.id {
            Ok(Some(self.transcript.clone()))
        } else {
            Ok(None)
        }
    }

    async fn lines_in_scope(
        &self,
        _transcript_id: Uuid,
        scope: LineScope,
    ) -> Result<Vec<TranscriptLine>> {
        Ok(self
            .lines
            .iter()
            .filter(|l| scope.contains(l.line_number) && !l.utterance.trim().is_empty())
            .cloned()
            .collect())
    }

    async fn update_status(&self, _transcript_id: Uuid, status: TranscriptStatus) -> Result<()> {
        if status == TranscriptStatus::NotGenerated && self.fail_rollback.load(Ordering::SeqCst) {
            return Err(Error::Internal("simulated status write failure".to_string()));
        }
        self.status_history.lock().unwrap().push(status);
        Ok(())
    }
}

#[async_trait]
impl QuotaStore for World {
    async fn reserve(&self, _workspace_id: Uuid) -> Result<WorkspaceUsage> {
        let mut usage = self.usage.lock().unwrap();
        if usage.used_count < usage.usage_limit {
            usage.used_count += 1;
            Ok(*usage)
        } else {
            Err(Error::QuotaExceeded {
                used: usage.used_count,
                limit: usage.usage_limit,
            })
        }
    }
}

#[async_trait]
impl NoteStore for World {
    async fn commit_generated(
        &self,
        transcript_id: Uuid,
        drafts: &[AnnotatedDraft],
    ) -> Result<CommitOutcome> {
        let mut assignments_created = 0i64;
        let status = {
            let mut committed = self.committed.lock().unwrap();
            for draft in drafts {
                assignments_created += draft.line_ids.len() as i64;
                committed.push(draft.clone());
            }
            if committed.is_empty() {
                TranscriptStatus::NotGenerated
            } else {
                TranscriptStatus::Generated
            }
        };
        self.update_status(transcript_id, status).await?;
        Ok(CommitOutcome {
            notes_created: drafts.len() as i64,
            assignments_created,
            status,
        })
    }

    async fn list_generated(
        &self,
        transcript_id: Uuid,
    ) -> Result<Vec<(GeneratedNote, Vec<Uuid>)>> {
        let committed = self.committed.lock().unwrap();
        Ok(committed
            .iter()
            .enumerate()
            .map(|(index, annotated)| {
                (
                    GeneratedNote {
                        id: Uuid::new_v4(),
                        transcript_id,
                        note_number: index as i32 + 1,
                        title: annotated.draft.title.clone(),
                        answer_1: annotated.draft.answer_1.clone(),
                        answer_2: annotated.draft.answer_2.clone(),
                        answer_3: annotated.draft.answer_3.clone(),
                        source: NOTE_SOURCE_LLM.to_string(),
                        created_at_utc: Utc::now(),
                    },
                    annotated.line_ids.clone(),
                )
            })
            .collect())
    }
}

fn pipeline(world: &Arc<World>, generator: &MockGenerator) -> AnnotationPipeline {
    AnnotationPipeline::new(
        world.clone(),
        world.clone(),
        world.clone(),
        world.clone(),
        Arc::new(generator.clone()),
        PromptComposer::new(PromptBoilerplate::new("Respond with JSON only.")),
    )
}

fn notes_json(titles: &[&str]) -> String {
    let notes: Vec<serde_json::Value> = titles
        .iter()
        .map(|title| {
            serde_json::json!({
                "title": title,
                "answer_1": "first answer",
                "answer_2": "second answer",
                "answer_3": "third answer"
            })
        })
        .collect();
    serde_json::json!({ "notes": notes }).to_string()
}

fn assignments_json(line_numbers: &[i32]) -> String {
    let assignments: Vec<serde_json::Value> = line_numbers
        .iter()
        .map(|n| serde_json::json!({ "line_number": n }))
        .collect();
    serde_json::json!({ "assignments": assignments }).to_string()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn scenario_full_run_generates_notes_and_assignments() {
    let world = Arc::new(World::new(
        vec![
            line(1, "Ana", "I think we should start."),
            line(2, "Ben", "Agreed, let us begin."),
            line(3, "Ana", "The budget worries me."),
        ],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator = MockGenerator::new()
        .with_response(
            NOTES_SCHEMA_NAME,
            format!("```json\n{}\n```", notes_json(&["Kickoff", "Budget concerns"])),
        )
        .with_response(ASSIGNMENTS_SCHEMA_NAME, assignments_json(&[1, 2]))
        .with_response(ASSIGNMENTS_SCHEMA_NAME, assignments_json(&[3, 3]));

    let report = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap();

    assert_eq!(report.notes_created, 2);
    // the duplicate citation of line 3 is deduplicated before the commit
    assert_eq!(report.note_assignments_created, 3);
    assert_eq!(world.current_status(), TranscriptStatus::Generated);
    assert_eq!(world.persisted_notes(), 2);
    assert_eq!(world.used(), 1);
    assert_eq!(generator.call_count(NOTES_SCHEMA_NAME), 1);
    assert_eq!(generator.call_count(ASSIGNMENTS_SCHEMA_NAME), 2);
}

#[tokio::test]
async fn scenario_inverted_range_fails_before_any_external_call() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::Range(5, 3),
        0,
        10,
    ));
    let generator = MockGenerator::new();

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(generator.calls().is_empty());
    assert_eq!(world.used(), 0, "quota must not be consumed");
    assert!(world.status_history.lock().unwrap().is_empty());
}

#[tokio::test]
async fn scenario_quota_exhausted_fails_before_any_external_call() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        3,
        3,
    ));
    let generator = MockGenerator::new();

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::QuotaExceeded { used: 3, limit: 3 }));
    assert!(generator.calls().is_empty());
    assert_eq!(world.used(), 3, "counter unchanged when exhausted");
}

#[tokio::test]
async fn scenario_failed_assignment_call_aborts_whole_run() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello"), line(2, "Ben", "goodbye")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator = MockGenerator::new()
        .with_response(NOTES_SCHEMA_NAME, notes_json(&["One", "Two"]))
        .with_response(ASSIGNMENTS_SCHEMA_NAME, assignments_json(&[1]))
        .with_failure(ASSIGNMENTS_SCHEMA_NAME, "model unavailable");

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
    assert_eq!(world.persisted_notes(), 0, "no partial persistence");
    assert_eq!(world.current_status(), TranscriptStatus::NotGenerated);
    // in_process was set, then rolled back
    let history = world.status_history.lock().unwrap().clone();
    assert_eq!(
        history,
        vec![TranscriptStatus::InProcess, TranscriptStatus::NotGenerated]
    );
}

#[tokio::test]
async fn scenario_unparseable_creation_output_rolls_back() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator =
        MockGenerator::new().with_response(NOTES_SCHEMA_NAME, "I could not find any themes.");

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(world.current_status(), TranscriptStatus::NotGenerated);
    assert_eq!(world.used(), 1, "quota is consumed on attempt, not success");
}

#[tokio::test]
async fn scenario_rollback_failure_never_masks_original_error() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    world.fail_rollback.store(true, Ordering::SeqCst);
    let generator = MockGenerator::new().with_failure(NOTES_SCHEMA_NAME, "creation failed");

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    match err {
        Error::Upstream(msg) => assert_eq!(msg, "creation failed"),
        other => panic!("rollback error leaked: {}", other),
    }
}

#[tokio::test]
async fn scenario_unresolvable_citations_are_dropped_silently() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator = MockGenerator::new()
        .with_response(NOTES_SCHEMA_NAME, notes_json(&["Only"]))
        .with_response(ASSIGNMENTS_SCHEMA_NAME, assignments_json(&[99]));

    let report = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap();

    assert_eq!(report.notes_created, 1);
    assert_eq!(report.note_assignments_created, 0);
    assert_eq!(world.current_status(), TranscriptStatus::Generated);
}

#[tokio::test]
async fn scenario_zero_notes_leaves_status_not_generated() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator = MockGenerator::new().with_response(NOTES_SCHEMA_NAME, notes_json(&[]));

    let report = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap();

    assert_eq!(report.notes_created, 0);
    assert_eq!(report.note_assignments_created, 0);
    assert_eq!(world.current_status(), TranscriptStatus::NotGenerated);
    assert_eq!(generator.call_count(ASSIGNMENTS_SCHEMA_NAME), 0);
}

#[tokio::test]
async fn scenario_missing_prompt_settings_is_not_found() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::Missing,
        0,
        10,
    ));
    let generator = MockGenerator::new();

    let err = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert!(generator.calls().is_empty());
    assert_eq!(world.used(), 0);
}

#[tokio::test]
async fn scenario_unknown_transcript_is_not_found() {
    let world = Arc::new(World::new(
        vec![line(1, "Ana", "hello")],
        SettingsKind::AllLines,
        0,
        10,
    ));
    let generator = MockGenerator::new();

    let err = pipeline(&world, &generator)
        .generate(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TranscriptNotFound(_)));
}

#[tokio::test]
async fn scenario_range_scope_restricts_payload_and_resolution() {
    let world = Arc::new(World::new(
        vec![
            line(1, "Ana", "outside"),
            line(2, "Ben", "inside"),
            line(3, "Ana", "also inside"),
            line(4, "Ben", "outside again"),
        ],
        SettingsKind::Range(2, 3),
        0,
        10,
    ));
    let generator = MockGenerator::new()
        .with_response(NOTES_SCHEMA_NAME, notes_json(&["Scoped"]))
        // cites one in-scope and one out-of-scope line
        .with_response(ASSIGNMENTS_SCHEMA_NAME, assignments_json(&[1, 2]));

    let report = pipeline(&world, &generator)
        .generate(world.transcript.id)
        .await
        .unwrap();

    // line 1 is outside the scope, so only line 2 resolves
    assert_eq!(report.note_assignments_created, 1);

    let creation_call = &generator.calls()[0];
    assert!(creation_call.input.contains("inside"));
    assert!(!creation_call.input.contains("outside"));
}
