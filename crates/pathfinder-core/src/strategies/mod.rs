//! Built-in quiz strategies and the helpers they share.
//!
//! Each strategy owns its record shape and its rule tables. The energy and
//! archetype quizzes ship with the engine; [`GenericStrategy`] handles any
//! quiz registered with metadata alone.

pub mod archetype;
pub mod energy;
pub mod generic;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::model::{Course, QuizMetadata};
use crate::traits::{QuizStrategy, RawQuizState};

pub use archetype::ArchetypeStrategy;
pub use energy::EnergyStrategy;
pub use generic::GenericStrategy;

/// Id of the built-in trait-based energy quiz.
pub const ENERGY_QUIZ_ID: &str = "energy";
/// Id of the built-in archetype quiz.
pub const ARCHETYPE_QUIZ_ID: &str = "archetype";

/// Metadata and strategies for the quizzes that ship with the engine.
pub fn builtin_quizzes() -> Vec<(QuizMetadata, Arc<dyn QuizStrategy>)> {
    vec![
        (
            QuizMetadata::new(ENERGY_QUIZ_ID, "Energy Quiz", "energy-quiz-state", 1)
                .with_description("Which of the three energies (clarity, drive, grounding) leads you")
                .with_tags(&["energy", "gunas", "balance"]),
            Arc::new(EnergyStrategy),
        ),
        (
            QuizMetadata::new(
                ARCHETYPE_QUIZ_ID,
                "Spiritual Archetype Quiz",
                "archetype-quiz-completed",
                2,
            )
            .with_result_key("archetype-quiz-result")
            .with_description("Seeker, Devotee, Warrior or Healer: how you approach the path")
            .with_tags(&["archetype", "path", "temperament"]),
            Arc::new(ArchetypeStrategy),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// "If the label is X and the course mentions any of K, contribute W."
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
    pub weight: f64,
    pub reason: &'static str,
}

/// Rules for `label` that the course satisfies, in table order.
pub(crate) fn matching_rules<'a>(
    rules: &'a [Rule],
    label: &'a str,
    course: &'a Course,
) -> impl Iterator<Item = &'a Rule> + 'a {
    rules
        .iter()
        .filter(move |r| r.label == label && course.mentions_any(r.keywords))
}

/// Highest weight among the rules `label` satisfies, or 0.
pub(crate) fn best_weight(rules: &[Rule], label: &str, course: &Course) -> f64 {
    matching_rules(rules, label, course)
        .map(|r| r.weight)
        .fold(0.0, f64::max)
}

/// Keywords of the first rule for `label`, i.e. its primary theme.
pub(crate) fn primary_keywords(rules: &[Rule], label: &str) -> &'static [&'static str] {
    rules
        .iter()
        .find(|r| r.label == label)
        .map(|r| r.keywords)
        .unwrap_or(&[])
}

/// "seeker" → "Seeker".
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Record helpers
// ---------------------------------------------------------------------------

/// The JSON object stored under the result key.
pub(crate) fn payload_object<'a>(
    quiz_id: &str,
    raw: &'a RawQuizState,
) -> Result<&'a Map<String, Value>, NormalizeError> {
    match &raw.payload {
        None | Some(Value::Null) => Err(NormalizeError::MissingPayload {
            quiz_id: quiz_id.to_string(),
        }),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(NormalizeError::malformed(quiz_id, "payload is not an object")),
    }
}

/// `false` (boolean or string), `null` or a missing value under the completion
/// key means "not done".
pub(crate) fn completion_flag_set(raw: &RawQuizState) -> bool {
    match &raw.completion {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        // Local storage stringifies booleans.
        Some(Value::String(s)) => {
            let s = s.trim();
            !(s.is_empty() || s.eq_ignore_ascii_case("false"))
        }
        Some(_) => true,
    }
}

/// First non-empty string among `keys`, lowercased and trimmed.
pub(crate) fn read_label(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .find(|s| !s.is_empty())
}

/// A trait → number map. Errors on non-numeric entries.
pub(crate) fn read_scores(
    quiz_id: &str,
    record: &Map<String, Value>,
    key: &str,
) -> Result<BTreeMap<String, f64>, NormalizeError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, v)| {
                v.as_f64()
                    .map(|n| (name.trim().to_lowercase(), n))
                    .ok_or_else(|| {
                        NormalizeError::malformed(quiz_id, format!("score for '{name}' is not a number"))
                    })
            })
            .collect(),
        Some(_) => Err(NormalizeError::malformed(quiz_id, format!("'{key}' is not an object"))),
    }
}

/// A question id → chosen category map. Non-string answers are skipped.
pub(crate) fn read_answers(record: &Map<String, Value>, key: &str) -> BTreeMap<String, String> {
    record
        .get(key)
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(q, a)| a.as_str().map(|a| (q.clone(), a.trim().to_lowercase())))
                .collect()
        })
        .unwrap_or_default()
}

/// A string array; anything else reads as empty.
pub(crate) fn read_string_list(record: &Map<String, Value>, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// RFC 3339 string or epoch milliseconds.
pub(crate) fn read_timestamp(record: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().filter_map(|k| record.get(*k)).find_map(|v| match v {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

pub(crate) const TIMESTAMP_KEYS: &[&str] = &["completed_at", "completedAt", "timestamp"];

/// Quiz id plus label, the tags every built-in result carries.
pub(crate) fn base_tags(quiz_id: &str, label: &str) -> Vec<String> {
    let mut tags = vec![quiz_id.to_lowercase()];
    if !tags.iter().any(|t| t == label) {
        tags.push(label.to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn builtin_quizzes_are_ordered_and_unique() {
        let quizzes = builtin_quizzes();
        assert_eq!(quizzes.len(), 2);
        assert_eq!(quizzes[0].0.id, ENERGY_QUIZ_ID);
        assert_eq!(quizzes[1].0.id, ARCHETYPE_QUIZ_ID);
        assert!(quizzes[0].0.priority < quizzes[1].0.priority);
        assert_ne!(quizzes[1].0.completion_key, quizzes[1].0.result_key);
    }

    #[test]
    fn timestamps_accept_rfc3339_and_millis() {
        let rec = obj(json!({"completed_at": "2026-03-01T10:00:00Z"}));
        let ts = read_timestamp(&rec, TIMESTAMP_KEYS).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T10:00:00+00:00");

        let rec = obj(json!({"timestamp": 1_700_000_000_000i64}));
        assert!(read_timestamp(&rec, TIMESTAMP_KEYS).is_some());

        let rec = obj(json!({"completed_at": "yesterday"}));
        assert!(read_timestamp(&rec, TIMESTAMP_KEYS).is_none());
    }

    #[test]
    fn scores_must_be_numeric() {
        let rec = obj(json!({"scores": {"Drive": 3, "clarity": 1.5}}));
        let scores = read_scores("q", &rec, "scores").unwrap();
        assert_eq!(scores.get("drive"), Some(&3.0));

        let rec = obj(json!({"scores": {"drive": "lots"}}));
        assert!(read_scores("q", &rec, "scores").unwrap_err().is_malformed());

        let rec = obj(json!({"scores": [1, 2]}));
        assert!(read_scores("q", &rec, "scores").is_err());
    }

    #[test]
    fn labels_are_normalized() {
        let rec = obj(json!({"dominant": "  ", "result": " Seeker "}));
        assert_eq!(read_label(&rec, &["dominant", "result"]), Some("seeker".into()));
        assert_eq!(read_label(&rec, &["missing"]), None);
    }

    #[test]
    fn completion_flag_semantics() {
        assert!(!completion_flag_set(&RawQuizState::default()));
        let done = RawQuizState {
            completion: Some(json!(true)),
            payload: None,
        };
        assert!(completion_flag_set(&done));
        let not_done = RawQuizState {
            completion: Some(json!(false)),
            payload: None,
        };
        assert!(!completion_flag_set(&not_done));
        let stringified = RawQuizState {
            completion: Some(json!("false")),
            payload: None,
        };
        assert!(!completion_flag_set(&stringified));
        assert!(completion_flag_set(&RawQuizState {
            completion: Some(json!("true")),
            payload: None,
        }));
    }

    #[test]
    fn display_label_capitalizes() {
        assert_eq!(display_label("seeker"), "Seeker");
        assert_eq!(display_label(""), "");
    }
}
