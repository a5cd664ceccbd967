//! Prompt composition from stored templates.
//!
//! Templates may reference the serialized transcript (or note) through a
//! named placeholder; when the placeholder is absent the payload is appended
//! as a labeled section instead, so older templates keep working.

use glossa_core::Result;

/// Placeholder replaced with the serialized transcript.
pub const TRANSCRIPT_PLACEHOLDER: &str = "<<transcript>>";

/// Placeholder replaced with the serialized note.
pub const NOTE_PLACEHOLDER: &str = "<<note>>";

/// Static boilerplate appended to every composed prompt.
///
/// Loaded once at startup and injected into the composer; never re-read per
/// call.
#[derive(Debug, Clone, Default)]
pub struct PromptBoilerplate {
    text: String,
}

impl PromptBoilerplate {
    /// Wrap already-loaded boilerplate text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load boilerplate from a file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            text: std::fs::read_to_string(path)?,
        })
    }

    /// No boilerplate.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Composes final prompt text from templates and serialized payloads.
///
/// Pure function of its inputs; the only state is the injected boilerplate.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    boilerplate: PromptBoilerplate,
}

impl PromptComposer {
    pub fn new(boilerplate: PromptBoilerplate) -> Self {
        Self { boilerplate }
    }

    /// Compose the note-creation prompt from the stored template and the
    /// serialized transcript.
    pub fn compose_creation(&self, template: &str, transcript_json: &str) -> String {
        let prompt = substitute(template, TRANSCRIPT_PLACEHOLDER, "Transcript", transcript_json);
        self.with_boilerplate(prompt)
    }

    /// Compose the line-assignment prompt for one note.
    pub fn compose_assignment(
        &self,
        template: &str,
        transcript_json: &str,
        note_json: &str,
    ) -> String {
        let prompt = substitute(template, TRANSCRIPT_PLACEHOLDER, "Transcript", transcript_json);
        let prompt = substitute(&prompt, NOTE_PLACEHOLDER, "Note", note_json);
        self.with_boilerplate(prompt)
    }

    fn with_boilerplate(&self, prompt: String) -> String {
        if self.boilerplate.text.is_empty() {
            prompt
        } else {
            format!("{}\n\n{}", prompt, self.boilerplate.text)
        }
    }
}

/// Replace all occurrences of `placeholder`, or append a labeled section
/// when the template never mentions it.
fn substitute(template: &str, placeholder: &str, label: &str, value: &str) -> String {
    if template.contains(placeholder) {
        template.replace(placeholder, value)
    } else {
        format!("{}\n\n{}:\n{}", template, label, value)
    }
}
