//! Course matcher.
//!
//! Scores every catalog course against the completed quiz results. Each
//! quiz contributes its strategy's rule score plus the weighted tag overlap;
//! contributions are averaged so more quizzes dilute rather than inflate.
//! The output is ranked but not truncated.

use crate::model::{Course, CourseRecommendation, QuizResult};
use crate::registry::QuizRegistry;
use crate::scoring::{
    clamp_unit, mean, quiz_contribution, tag_fraction, FALLBACK_SCORE, MIN_RELEVANT_SCORE,
};

/// How many courses the zero-knowledge fallback returns, and the floor on
/// how many a scored run returns.
pub const FALLBACK_COURSE_COUNT: usize = 3;

/// Reason used when no quiz has a specific one for a course.
pub const GENERIC_REASON: &str = "Complements your spiritual journey";

/// Reason attached to fallback courses.
pub const FOUNDATIONAL_REASON: &str = "A foundational course to begin your journey";

/// Match score of one course across all results, in [0, 1].
pub fn score_course(registry: &QuizRegistry, results: &[QuizResult], course: &Course) -> f64 {
    let per_quiz = results.iter().map(|result| {
        let strategy = registry.strategy_for(&result.quiz_id);
        quiz_contribution(
            strategy.match_course(result, course),
            tag_fraction(&result.tags, course),
        )
    });
    clamp_unit(mean(per_quiz).unwrap_or(0.0))
}

/// Rank courses for the given results, best first.
///
/// With no results, or when nothing scores above the relevance threshold,
/// the first few catalog courses come back as `explore` picks. Otherwise
/// relevant courses are returned in descending score order (ties keep
/// catalog order), topped up with the next-best courses if fewer than
/// [`FALLBACK_COURSE_COUNT`] are relevant.
pub fn match_courses(
    registry: &QuizRegistry,
    results: &[QuizResult],
    courses: &[Course],
) -> Vec<CourseRecommendation> {
    if courses.is_empty() {
        return Vec::new();
    }
    if results.is_empty() {
        return fallback_courses(courses);
    }

    let mut ranked: Vec<(&Course, f64)> = courses
        .iter()
        .map(|course| (course, score_course(registry, results, course)))
        .collect();

    if ranked.iter().all(|(_, score)| *score <= MIN_RELEVANT_SCORE) {
        tracing::debug!("no course scored above {MIN_RELEVANT_SCORE}, using fallback");
        return fallback_courses(courses);
    }

    // Stable: equal scores keep catalog order.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let relevant = ranked
        .iter()
        .filter(|(_, score)| *score > MIN_RELEVANT_SCORE)
        .count();
    ranked.truncate(relevant.max(FALLBACK_COURSE_COUNT));

    ranked
        .into_iter()
        .map(|(course, score)| {
            let reason = course_reason(registry, results, course);
            CourseRecommendation::new(course.clone(), score, reason)
        })
        .collect()
}

/// The first completed quiz (in priority order) with something to say
/// about the course, or the generic reason.
pub fn course_reason(registry: &QuizRegistry, results: &[QuizResult], course: &Course) -> String {
    results
        .iter()
        .find_map(|result| {
            registry
                .strategy_for(&result.quiz_id)
                .reason(result, course)
                .filter(|r| !r.trim().is_empty())
        })
        .unwrap_or_else(|| GENERIC_REASON.to_string())
}

/// The first catalog courses as `explore` picks with a fixed score.
pub fn fallback_courses(courses: &[Course]) -> Vec<CourseRecommendation> {
    courses
        .iter()
        .take(FALLBACK_COURSE_COUNT)
        .map(|course| {
            CourseRecommendation::new(course.clone(), FALLBACK_SCORE, FOUNDATIONAL_REASON.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseCategory, MatchTier, QuizOutcome};
    use std::collections::BTreeMap;

    fn course(id: &str, title: &str, description: &str) -> Course {
        Course {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            features: vec![],
        }
    }

    fn catalog() -> Vec<Course> {
        vec![
            course("karma", "Karma Yoga", "Discipline through service and action"),
            course("sit", "Sitting Practice", "Meditation and breath awareness"),
            course("study", "Vedanta Study", "Philosophy and scripture"),
            course("calm", "Calm Evenings", "Mindful rest before sleep"),
            course("misc", "Cooking Class", "Sattvic recipes"),
        ]
    }

    fn energy(dominant: &str) -> QuizResult {
        let mut scores = BTreeMap::new();
        scores.insert("clarity".to_string(), 4.0);
        scores.insert("drive".to_string(), 4.0);
        scores.insert("grounding".to_string(), 4.0);
        QuizResult {
            quiz_id: "energy".into(),
            completed_at: None,
            outcome: QuizOutcome::Traits {
                scores,
                dominant: dominant.into(),
            },
            weak_areas: vec![],
            tags: vec!["energy".into(), dominant.into()],
        }
    }

    fn archetype(label: &str) -> QuizResult {
        QuizResult {
            quiz_id: "archetype".into(),
            completed_at: None,
            outcome: QuizOutcome::Archetype {
                archetype: label.into(),
                answers: BTreeMap::new(),
            },
            weak_areas: vec![],
            tags: vec!["archetype".into(), label.into()],
        }
    }

    #[test]
    fn no_results_falls_back_to_first_three() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let recs = match_courses(&registry, &[], &catalog());
        let ids: Vec<&str> = recs.iter().map(|r| r.course.id.as_str()).collect();
        assert_eq!(ids, vec!["karma", "sit", "study"]);
        for rec in &recs {
            assert_eq!(rec.category, CourseCategory::Explore);
            assert_eq!(rec.tier, MatchTier::Good);
            assert!((rec.score - FALLBACK_SCORE).abs() < f64::EPSILON);
            assert_eq!(rec.reason, FOUNDATIONAL_REASON);
        }
    }

    #[test]
    fn empty_catalog_gives_nothing() {
        let registry = QuizRegistry::with_builtin_quizzes();
        assert!(match_courses(&registry, &[energy("drive")], &[]).is_empty());
        assert!(match_courses(&registry, &[], &[]).is_empty());
    }

    #[test]
    fn grounding_ranks_calming_courses_first() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let recs = match_courses(&registry, &[energy("grounding")], &catalog());
        let ids: Vec<&str> = recs.iter().map(|r| r.course.id.as_str()).collect();
        // Both calming courses tie at 0.8 and keep catalog order.
        assert_eq!(&ids[..2], &["sit", "calm"]);
        let karma_pos = ids.iter().position(|id| *id == "karma").unwrap();
        assert!(karma_pos >= 2);
        assert_eq!(recs[0].category, CourseCategory::Primary);
    }

    #[test]
    fn scores_are_averaged_across_quizzes() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let sit = &catalog()[1];
        let one = score_course(&registry, &[energy("grounding")], sit);
        let two = score_course(&registry, &[energy("grounding"), archetype("warrior")], sit);
        assert!((one - 0.8).abs() < 1e-9);
        // Warrior contributes 0 for a sitting course: (0.8 + 0.0) / 2
        assert!((two - 0.4).abs() < 1e-9, "got {two}");
    }

    #[test]
    fn tag_overlap_adds_half_weight() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let c = course("x", "Warrior Training", "strength");
        // Rule 0.6 (focus/strength) + 0.5 * (1 of 2 tags) = 0.85
        let score = score_course(&registry, &[archetype("warrior")], &c);
        assert!((score - 0.85).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn every_score_is_within_unit_interval() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let results = vec![energy("drive"), archetype("warrior")];
        for rec in match_courses(&registry, &results, &catalog()) {
            assert!((0.0..=1.0).contains(&rec.score));
        }
    }

    #[test]
    fn nothing_relevant_falls_back() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let courses = vec![
            course("a", "Cooking", "recipes"),
            course("b", "Gardening", "soil"),
        ];
        let recs = match_courses(&registry, &[energy("unknown-trait")], &courses);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.reason == FOUNDATIONAL_REASON));
    }

    #[test]
    fn few_relevant_courses_are_topped_up() {
        let registry = QuizRegistry::with_builtin_quizzes();
        // Only the study (0.8) and sitting (0.5) courses are relevant to a seeker.
        let recs = match_courses(&registry, &[archetype("seeker")], &catalog());
        let ids: Vec<&str> = recs.iter().map(|r| r.course.id.as_str()).collect();
        assert_eq!(ids, vec!["study", "sit", "karma"]);
        assert_eq!(recs[2].score, 0.0);
        assert_eq!(recs[2].reason, GENERIC_REASON);
    }

    #[test]
    fn reasons_come_from_first_quiz_with_an_opinion() {
        let registry = QuizRegistry::with_builtin_quizzes();
        let study = &catalog()[2];
        let results = vec![energy("grounding"), archetype("seeker")];
        // Grounding has nothing to say about scripture; the seeker rule does.
        assert_eq!(
            course_reason(&registry, &results, study),
            "Feeds the Seeker's hunger for understanding"
        );
        let misc = &catalog()[4];
        assert_eq!(course_reason(&registry, &results, misc), GENERIC_REASON);
    }
}
