//! Fallback strategy for quizzes registered with metadata only.
//!
//! Reads a loose record shape:
//! `{ "archetype" | "dominant" | "result": "...", "scores": {...}, "tags": [...], "completed_at": ... }`
//! and relies entirely on the tag-matching fallback for course scores. The
//! quiz's registered tags are added to the record's own.

use crate::error::NormalizeError;
use crate::model::{Course, QuizMetadata, QuizOutcome, QuizResult};
use crate::scoring;
use crate::traits::{BookPick, QuizStrategy, RawQuizState};

use super::{
    base_tags, completion_flag_set, display_label, payload_object, read_answers, read_label,
    read_scores, read_string_list, read_timestamp, TIMESTAMP_KEYS,
};

const ARCHETYPE_KEYS: &[&str] = &["archetype"];
const DOMINANT_KEYS: &[&str] = &["dominant", "dominant_trait", "dominantTrait", "result"];

/// Strategy that understands any quiz storing a single resolved label.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

impl QuizStrategy for GenericStrategy {
    fn name(&self) -> &str {
        "generic"
    }

    fn is_complete(&self, raw: &RawQuizState) -> bool {
        if !completion_flag_set(raw) {
            return false;
        }
        let Ok(record) = payload_object("generic", raw) else {
            return false;
        };
        if record.get("completed").and_then(|v| v.as_bool()) == Some(false) {
            return false;
        }
        read_label(record, ARCHETYPE_KEYS).is_some() || read_label(record, DOMINANT_KEYS).is_some()
    }

    fn parse(&self, meta: &QuizMetadata, raw: &RawQuizState) -> Result<QuizResult, NormalizeError> {
        let record = payload_object(&meta.id, raw)?;

        let (outcome, weak_areas) = if let Some(archetype) = read_label(record, ARCHETYPE_KEYS) {
            let answers = read_answers(record, "answers");
            (QuizOutcome::Archetype { archetype, answers }, Vec::new())
        } else if let Some(dominant) = read_label(record, DOMINANT_KEYS) {
            let scores = read_scores(&meta.id, record, "scores")?;
            let weak = scoring::weak_areas(&scores);
            (QuizOutcome::Traits { scores, dominant }, weak)
        } else {
            return Err(NormalizeError::Incomplete {
                quiz_id: meta.id.clone(),
            });
        };

        let mut result = QuizResult {
            quiz_id: meta.id.clone(),
            completed_at: read_timestamp(record, TIMESTAMP_KEYS),
            outcome,
            weak_areas,
            tags: Vec::new(),
        };
        let mut tags = base_tags(&meta.id, result.label());
        let declared = meta.tags.iter().map(|t| t.trim().to_lowercase());
        for tag in read_string_list(record, "tags").into_iter().chain(declared) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        result.tags = tags;
        Ok(result)
    }

    fn match_course(&self, _result: &QuizResult, _course: &Course) -> f64 {
        0.0
    }

    fn match_books(&self, _result: &QuizResult) -> Vec<BookPick> {
        Vec::new()
    }

    /// Names the result when one of its tags (other than the quiz id) shows
    /// up in the course.
    fn reason(&self, result: &QuizResult, course: &Course) -> Option<String> {
        let text = course.searchable_text();
        result
            .tags
            .iter()
            .filter(|t| *t != &result.quiz_id.to_lowercase())
            .any(|t| text.contains(t.as_str()))
            .then(|| format!("Connects with your {} result", display_label(result.label())))
    }
}
