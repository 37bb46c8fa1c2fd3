//! Analysis narrator.
//!
//! Short written summaries of the normalized results. Every branch has a
//! fallback template, so nothing here can fail.

use crate::model::{QuizOutcome, QuizResult};
use crate::strategies::display_label;

pub const WELCOME: &str =
    "Welcome! Take a quiz to discover your spiritual path and receive personalized recommendations.";

const TRAIT_NOTES: &[(&str, &str)] = &[
    (
        "grounding",
        "You draw strength from stillness and steadiness; gentle awareness practices will help lift and brighten that energy.",
    ),
    (
        "drive",
        "You are moved by action and ambition; practices that channel that fire into focused service will serve you well.",
    ),
    (
        "clarity",
        "You lean towards balance and insight; contemplative study will deepen what already comes naturally.",
    ),
];

const ARCHETYPE_NOTES: &[(&str, &str)] = &[
    (
        "seeker",
        "You come to practice with questions and find meaning in understanding how things really are.",
    ),
    (
        "devotee",
        "You walk the path of the heart, where love and surrender open the way.",
    ),
    (
        "warrior",
        "You grow through discipline and right action, meeting challenges head-on.",
    ),
    (
        "healer",
        "You are drawn to restore balance in body and breath, for yourself and for others.",
    ),
];

/// Hand-authored stories for combinations that come up often. Matched in
/// either order.
const PAIRINGS: &[(&str, &str, &str)] = &[
    (
        "grounding",
        "seeker",
        "A grounded Seeker: your steady energy gives your questions room to settle. Quiet contemplation and slow study of the classic texts suit you better than intensive retreats.",
    ),
    (
        "drive",
        "warrior",
        "A driven Warrior: you have fire and the will to direct it. Karma yoga and disciplined daily practice turn that intensity into service instead of burnout.",
    ),
    (
        "clarity",
        "devotee",
        "A clear-minded Devotee: your balanced nature lets devotion flow without getting lost in emotion. Chanting and bhakti practice pair naturally with quiet reflection.",
    ),
];

/// The main analysis text.
///
/// With two or more results this describes the two highest-priority ones;
/// `results` is expected in registry order.
pub fn single_quiz_analysis(results: &[QuizResult]) -> String {
    match results {
        [] => WELCOME.to_string(),
        [only] => describe(only),
        [first, second, ..] => format!(
            "Across your quizzes, {} and {}. The recommendations below draw on both.",
            headline(first),
            headline(second)
        ),
    }
}

/// A blended story for the two highest-priority results, or `None` with
/// fewer than two.
pub fn combined_analysis(results: &[QuizResult]) -> Option<String> {
    let [first, second, ..] = results else {
        return None;
    };
    let known = authored_pairing(first, second).or_else(|| authored_pairing(second, first));
    Some(match known {
        Some(text) => text.to_string(),
        None => generic_blend(first.label(), second.label()),
    })
}

/// Pairings are keyed on a dominant trait from one quiz and an archetype
/// from the other.
fn authored_pairing(traits: &QuizResult, archetype: &QuizResult) -> Option<&'static str> {
    let dominant = traits.dominant_trait()?;
    let archetype = archetype.archetype()?;
    PAIRINGS
        .iter()
        .find(|(t, a, _)| *t == dominant && *a == archetype)
        .map(|(_, _, text)| *text)
}

/// Template used for any pairing without a hand-authored story.
pub fn generic_blend(first: &str, second: &str) -> String {
    format!(
        "Your {} and {} results each bring something different. Let {} set the rhythm of your practice and {} shape what you explore next.",
        display_label(first),
        display_label(second),
        display_label(first),
        display_label(second)
    )
}

fn headline(result: &QuizResult) -> String {
    match &result.outcome {
        QuizOutcome::Traits { dominant, .. } => {
            format!("your dominant energy is {}", display_label(dominant))
        }
        QuizOutcome::Archetype { archetype, .. } => {
            format!("you resonate with the {} archetype", display_label(archetype))
        }
    }
}

fn describe(result: &QuizResult) -> String {
    let (notes, fallback) = match result.outcome {
        QuizOutcome::Traits { .. } => (
            TRAIT_NOTES,
            "The recommendations below are tuned to that energy.",
        ),
        QuizOutcome::Archetype { .. } => (
            ARCHETYPE_NOTES,
            "The recommendations below are tuned to that path.",
        ),
    };
    let note = notes
        .iter()
        .find(|(label, _)| *label == result.label())
        .map_or(fallback, |(_, note)| *note);

    // Sentence case for a standalone paragraph.
    let mut text = display_label(&headline(result));
    text.push_str(". ");
    text.push_str(note);

    if !result.weak_areas.is_empty() {
        let weak: Vec<String> = result.weak_areas.iter().map(|w| display_label(w)).collect();
        text.push_str(&format!(
            " You may also benefit from building up {}.",
            weak.join(" and ")
        ));
    }
    text
}
