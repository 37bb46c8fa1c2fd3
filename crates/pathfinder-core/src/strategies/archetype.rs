//! The archetype quiz.
//!
//! Completion is flagged under one key and the result stored under another:
//! `{ "archetype": "seeker", "answers": { "q1": "seeker", "q2": "healer" }, "completed_at": "..." }`

use crate::error::NormalizeError;
use crate::model::{Course, QuizMetadata, QuizOutcome, QuizResult};
use crate::scoring;
use crate::traits::{BookPick, QuizStrategy, RawQuizState};

use super::{
    base_tags, best_weight, completion_flag_set, display_label, matching_rules, payload_object,
    primary_keywords, read_answers, read_label, read_timestamp, Rule, TIMESTAMP_KEYS,
};

pub const SEEKER: &str = "seeker";
pub const DEVOTEE: &str = "devotee";
pub const WARRIOR: &str = "warrior";
pub const HEALER: &str = "healer";

pub const ARCHETYPES: &[&str] = &[SEEKER, DEVOTEE, WARRIOR, HEALER];

const ARCHETYPE_KEYS: &[&str] = &["archetype", "result"];

const WEAK_AREA_WEIGHT: f64 = 0.4;

const RULES: &[Rule] = &[
    Rule {
        label: SEEKER,
        keywords: &["philosophy", "wisdom", "self-inquiry", "vedanta", "scripture"],
        weight: 0.8,
        reason: "Feeds the Seeker's hunger for understanding",
    },
    Rule {
        label: SEEKER,
        keywords: &["meditation", "contemplation"],
        weight: 0.5,
        reason: "Gives the Seeker's questions a contemplative home",
    },
    Rule {
        label: DEVOTEE,
        keywords: &["devotion", "bhakti", "chanting", "kirtan", "heart"],
        weight: 0.8,
        reason: "Opens the Devotee's heart through devotional practice",
    },
    Rule {
        label: WARRIOR,
        keywords: &["discipline", "service", "karma", "action"],
        weight: 0.8,
        reason: "Gives the Warrior a disciplined path of service",
    },
    Rule {
        label: WARRIOR,
        keywords: &["focus", "strength"],
        weight: 0.6,
        reason: "Sharpens the Warrior's focus",
    },
    Rule {
        label: HEALER,
        keywords: &["healing", "restorative", "body", "breath", "asana"],
        weight: 0.8,
        reason: "Supports the Healer's care for body and breath",
    },
];

const BOOKS: &[(&str, &str, &str)] = &[
    (SEEKER, "I Am That", "Answers the Seeker's questions head-on"),
    (
        SEEKER,
        "The Upanishads",
        "The source texts behind the Seeker's inquiry",
    ),
    (
        DEVOTEE,
        "Autobiography of a Yogi",
        "A life of devotion told from the inside",
    ),
    (
        DEVOTEE,
        "The Bhagavad Gita",
        "The classic song of devotion and surrender",
    ),
    (
        WARRIOR,
        "The Bhagavad Gita",
        "A warrior's dialogue on right action",
    ),
    (WARRIOR, "Light on Yoga", "Discipline made physical"),
    (
        HEALER,
        "Light on Yoga",
        "The definitive guide to healing through posture and breath",
    ),
    (
        HEALER,
        "The Miracle of Mindfulness",
        "Mindful care for yourself and others",
    ),
];

/// Strategy for the archetype quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchetypeStrategy;

impl QuizStrategy for ArchetypeStrategy {
    fn name(&self) -> &str {
        "archetype"
    }

    /// Complete once the completion flag is set and an archetype is resolved.
    fn is_complete(&self, raw: &RawQuizState) -> bool {
        if !completion_flag_set(raw) {
            return false;
        }
        payload_object("archetype", raw)
            .ok()
            .and_then(|record| read_label(record, ARCHETYPE_KEYS))
            .is_some()
    }

    fn parse(&self, meta: &QuizMetadata, raw: &RawQuizState) -> Result<QuizResult, NormalizeError> {
        let record = payload_object(&meta.id, raw)?;
        let archetype =
            read_label(record, ARCHETYPE_KEYS).ok_or_else(|| NormalizeError::Incomplete {
                quiz_id: meta.id.clone(),
            })?;
        let answers = read_answers(record, "answers");

        // Archetypes nobody leaned towards still count, with zero.
        let weak_areas = if answers.is_empty() {
            Vec::new()
        } else {
            scoring::weak_areas(&scoring::tally(answers.values(), ARCHETYPES))
        };
        let tags = base_tags(&meta.id, &archetype);

        // Completion may be flagged with a timestamp instead of `true`.
        let completed_at = read_timestamp(record, TIMESTAMP_KEYS).or_else(|| {
            raw.completion
                .as_ref()
                .and_then(|v| v.as_object())
                .and_then(|m| read_timestamp(m, TIMESTAMP_KEYS))
        });

        Ok(QuizResult {
            quiz_id: meta.id.clone(),
            completed_at,
            outcome: QuizOutcome::Archetype { archetype, answers },
            weak_areas,
            tags,
        })
    }

    fn match_course(&self, result: &QuizResult, course: &Course) -> f64 {
        let Some(archetype) = result.archetype() else {
            return 0.0;
        };
        let mut score = best_weight(RULES, archetype, course);
        if weak_area_hit(result, course).is_some() {
            score = score.max(WEAK_AREA_WEIGHT);
        }
        score
    }

    fn match_books(&self, result: &QuizResult) -> Vec<BookPick> {
        let Some(archetype) = result.archetype() else {
            return Vec::new();
        };
        BOOKS
            .iter()
            .filter(|(label, _, _)| *label == archetype)
            .map(|(_, title, reason)| BookPick::new(title, reason))
            .collect()
    }

    fn reason(&self, result: &QuizResult, course: &Course) -> Option<String> {
        let archetype = result.archetype()?;
        if let Some(rule) = matching_rules(RULES, archetype, course).next() {
            return Some(rule.reason.to_string());
        }
        weak_area_hit(result, course).map(|weak| {
            format!(
                "Strengthens the {} side of your path, the one you leaned on least",
                display_label(weak)
            )
        })
    }

    fn referenced_books(&self) -> Vec<&str> {
        BOOKS.iter().map(|(_, title, _)| *title).collect()
    }
}

fn weak_area_hit<'a>(result: &'a QuizResult, course: &Course) -> Option<&'a str> {
    result
        .weak_areas
        .iter()
        .map(String::as_str)
        .find(|weak| course.mentions_any(primary_keywords(RULES, weak)))
}
