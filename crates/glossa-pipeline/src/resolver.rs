//! Citation-to-line resolution.
//!
//! Built once per generation run from the in-scope line set, then shared
//! read-only across the assignment fan-out. Two lookup tiers: line number
//! first, then a normalized speaker+utterance key. Citations neither tier
//! can resolve are dropped silently.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use glossa_core::{AssignmentCitation, TranscriptLine};

/// Two-tier lookup from cited lines to canonical line ids.
pub struct LineResolver {
    by_number: HashMap<i32, Uuid>,
    by_text: HashMap<String, Uuid>,
}

impl LineResolver {
    /// Build the lookup maps; the first occurrence wins in both tiers.
    pub fn new(lines: &[TranscriptLine]) -> Self {
        let mut by_number = HashMap::with_capacity(lines.len());
        let mut by_text = HashMap::with_capacity(lines.len());
        for line in lines {
            by_number.entry(line.line_number).or_insert(line.id);
            by_text
                .entry(text_key(&line.speaker, &line.utterance))
                .or_insert(line.id);
        }
        Self { by_number, by_text }
    }

    /// Resolve one citation, line-number tier first.
    pub fn resolve(&self, citation: &AssignmentCitation) -> Option<Uuid> {
        if let Ok(number) = i32::try_from(citation.line_number) {
            if let Some(id) = self.by_number.get(&number) {
                return Some(*id);
            }
        }

        let speaker = citation.speaker.as_deref()?;
        let utterance = citation.utterance.as_deref()?;
        self.by_text.get(&text_key(speaker, utterance)).copied()
    }

    /// Resolve a citation list into a deduplicated, order-preserving id
    /// list; unresolvable citations are dropped.
    pub fn resolve_all(&self, citations: &[AssignmentCitation]) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for citation in citations {
            if let Some(id) = self.resolve(citation) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

fn text_key(speaker: &str, utterance: &str) -> String {
    format!(
        "{}::{}",
        speaker.trim().to_lowercase(),
        utterance.trim().to_lowercase()
    )
}
