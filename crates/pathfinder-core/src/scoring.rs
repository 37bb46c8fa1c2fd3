//! Shared scoring heuristics and fixed thresholds.
//!
//! Match scores are a deterministic heuristic, not a probability: rule
//! weights and tag overlap are combined per quiz, averaged across quizzes,
//! and clamped to [0, 1].

use std::collections::BTreeMap;

use crate::model::Course;

/// Scores above this are `primary`.
pub const PRIMARY_THRESHOLD: f64 = 0.7;
/// Scores above this (and not primary) are `secondary`.
pub const SECONDARY_THRESHOLD: f64 = 0.5;
/// Scores above this are a `perfect` match.
pub const PERFECT_TIER_THRESHOLD: f64 = 0.8;
/// Scores above this (and not perfect) are a `high` match.
pub const HIGH_TIER_THRESHOLD: f64 = 0.6;
/// Courses at or below this are not considered relevant.
pub const MIN_RELEVANT_SCORE: f64 = 0.1;
/// Score given to fallback courses when nothing is relevant.
pub const FALLBACK_SCORE: f64 = 0.5;
/// Weight of the generic tag-overlap fraction.
pub const TAG_MATCH_WEIGHT: f64 = 0.5;
/// A trait below this share of the respondent's mean is a weak area.
pub const WEAK_AREA_RATIO: f64 = 0.7;

/// Clamp into [0, 1]. NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Unweighted mean, or `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Traits scoring below 70% of the unweighted mean across all traits.
///
/// Returned in key order. An empty map or a non-positive mean yields nothing.
pub fn weak_areas(scores: &BTreeMap<String, f64>) -> Vec<String> {
    let Some(avg) = mean(scores.values().copied()) else {
        return Vec::new();
    };
    if avg <= 0.0 {
        return Vec::new();
    }
    let cutoff = avg * WEAK_AREA_RATIO;
    scores
        .iter()
        .filter(|(_, score)| **score < cutoff)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Count answers per category. Every name in `categories` appears in the
/// output, with zero if nobody picked it; unknown answers are counted too.
pub fn tally<'a, I>(answers: I, categories: &[&str]) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts: BTreeMap<String, f64> = categories
        .iter()
        .map(|c| (c.to_string(), 0.0))
        .collect();
    for answer in answers {
        *counts.entry(answer.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Fraction of `tags` found in the course's searchable text.
pub fn tag_fraction(tags: &[String], course: &Course) -> f64 {
    if tags.is_empty() {
        return 0.0;
    }
    let text = course.searchable_text();
    let hits = tags
        .iter()
        .filter(|t| !t.is_empty() && text.contains(&t.to_lowercase()))
        .count();
    hits as f64 / tags.len() as f64
}

/// One quiz's contribution to a course: the rule score plus the weighted
/// tag overlap, capped at 1.
pub fn quiz_contribution(rule_score: f64, tag_fraction: f64) -> f64 {
    clamp_unit(clamp_unit(rule_score) + TAG_MATCH_WEIGHT * clamp_unit(tag_fraction))
}
