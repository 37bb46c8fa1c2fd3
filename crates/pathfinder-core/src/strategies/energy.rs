//! The trait-based energy quiz.
//!
//! Stored record:
//! `{ "scores": { "clarity": 4, "drive": 2, "grounding": 7 }, "dominant": "grounding", "completed_at": "..." }`

use crate::error::NormalizeError;
use crate::model::{Course, QuizMetadata, QuizOutcome, QuizResult};
use crate::scoring;
use crate::traits::{BookPick, QuizStrategy, RawQuizState};

use super::{
    base_tags, best_weight, display_label, matching_rules, payload_object, primary_keywords,
    read_label, read_scores, read_timestamp, Rule, TIMESTAMP_KEYS,
};

pub const CLARITY: &str = "clarity";
pub const DRIVE: &str = "drive";
pub const GROUNDING: &str = "grounding";

/// The three energies the quiz scores.
pub const TRAITS: &[&str] = &[CLARITY, DRIVE, GROUNDING];

const DOMINANT_KEYS: &[&str] = &["dominant", "dominant_trait", "dominantTrait"];

/// Weight for a course that strengthens a weak trait.
const WEAK_AREA_WEIGHT: f64 = 0.4;

const RULES: &[Rule] = &[
    Rule {
        label: GROUNDING,
        keywords: &["meditation", "mindful", "awareness", "breath", "calm", "rest"],
        weight: 0.8,
        reason: "Gentle awareness practice to lift heavy, grounded energy",
    },
    Rule {
        label: GROUNDING,
        keywords: &["restorative", "gentle", "nature"],
        weight: 0.6,
        reason: "A gentle pace that meets grounded energy where it is",
    },
    Rule {
        label: DRIVE,
        keywords: &["discipline", "service", "karma", "action", "focus"],
        weight: 0.8,
        reason: "Channels your driven energy into purposeful practice",
    },
    Rule {
        label: DRIVE,
        keywords: &["meditation", "calm", "breath"],
        weight: 0.6,
        reason: "Balances restless drive with stillness",
    },
    Rule {
        label: CLARITY,
        keywords: &["philosophy", "wisdom", "scripture", "self-inquiry", "vedanta"],
        weight: 0.8,
        reason: "Deepens the clear, reflective energy you already bring",
    },
    Rule {
        label: CLARITY,
        keywords: &["contemplation", "meditation", "silence"],
        weight: 0.6,
        reason: "Refines your natural clarity through contemplation",
    },
];

const BOOKS: &[(&str, &str, &str)] = &[
    (
        GROUNDING,
        "The Miracle of Mindfulness",
        "Simple daily mindfulness to gently lift heavy energy",
    ),
    (
        GROUNDING,
        "Wherever You Go, There You Are",
        "Short meditations that fit a slower rhythm",
    ),
    (
        DRIVE,
        "The Bhagavad Gita",
        "Teaches action without attachment to its results",
    ),
    (
        DRIVE,
        "Light on Yoga",
        "Gives restless energy a disciplined physical practice",
    ),
    (CLARITY, "The Upanishads", "Rewards a clear, contemplative mind"),
    (
        CLARITY,
        "I Am That",
        "Direct self-inquiry for a steady, reflective nature",
    ),
];

/// Strategy for the energy quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyStrategy;

impl QuizStrategy for EnergyStrategy {
    fn name(&self) -> &str {
        "energy"
    }

    /// Complete once the record has a non-empty score map and a dominant trait.
    fn is_complete(&self, raw: &RawQuizState) -> bool {
        let Ok(record) = payload_object("energy", raw) else {
            return false;
        };
        let has_scores = record
            .get("scores")
            .and_then(|v| v.as_object())
            .is_some_and(|m| !m.is_empty());
        has_scores && read_label(record, DOMINANT_KEYS).is_some()
    }

    fn parse(&self, meta: &QuizMetadata, raw: &RawQuizState) -> Result<QuizResult, NormalizeError> {
        let record = payload_object(&meta.id, raw)?;
        let scores = read_scores(&meta.id, record, "scores")?;
        if scores.is_empty() {
            return Err(NormalizeError::Incomplete {
                quiz_id: meta.id.clone(),
            });
        }
        let dominant = read_label(record, DOMINANT_KEYS).ok_or_else(|| NormalizeError::Incomplete {
            quiz_id: meta.id.clone(),
        })?;

        let weak_areas = scoring::weak_areas(&scores);
        let tags = base_tags(&meta.id, &dominant);

        Ok(QuizResult {
            quiz_id: meta.id.clone(),
            completed_at: read_timestamp(record, TIMESTAMP_KEYS),
            outcome: QuizOutcome::Traits { scores, dominant },
            weak_areas,
            tags,
        })
    }

    fn match_course(&self, result: &QuizResult, course: &Course) -> f64 {
        let Some(dominant) = result.dominant_trait() else {
            return 0.0;
        };
        let mut score = best_weight(RULES, dominant, course);
        if weak_area_hit(result, course).is_some() {
            score = score.max(WEAK_AREA_WEIGHT);
        }
        score
    }

    fn match_books(&self, result: &QuizResult) -> Vec<BookPick> {
        let Some(dominant) = result.dominant_trait() else {
            return Vec::new();
        };
        BOOKS
            .iter()
            .filter(|(label, _, _)| *label == dominant)
            .map(|(_, title, reason)| BookPick::new(title, reason))
            .collect()
    }

    fn reason(&self, result: &QuizResult, course: &Course) -> Option<String> {
        let dominant = result.dominant_trait()?;
        if let Some(rule) = matching_rules(RULES, dominant, course).next() {
            return Some(rule.reason.to_string());
        }
        weak_area_hit(result, course).map(|weak| {
            format!(
                "Builds up {}, the energy that scored lowest for you",
                display_label(weak)
            )
        })
    }

    fn referenced_books(&self) -> Vec<&str> {
        BOOKS.iter().map(|(_, title, _)| *title).collect()
    }
}

/// First weak trait whose primary theme the course covers.
fn weak_area_hit<'a>(result: &'a QuizResult, course: &Course) -> Option<&'a str> {
    result
        .weak_areas
        .iter()
        .map(String::as_str)
        .find(|weak| course.mentions_any(primary_keywords(RULES, weak)))
}
