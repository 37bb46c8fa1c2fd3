//! Core data model types for pathfinder.
//!
//! These are the types shared by every stage of the engine: quiz metadata
//! owned by the registry, normalized quiz results, catalog entries, and the
//! recommendation records the engine hands back to its host.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    HIGH_TIER_THRESHOLD, PERFECT_TIER_THRESHOLD, PRIMARY_THRESHOLD, SECONDARY_THRESHOLD,
};

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

/// Static description of a quiz type known to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizMetadata {
    /// Unique identifier, also the key strategies are registered under.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the quiz assesses.
    #[serde(default)]
    pub description: String,
    /// Labels used for generic matching.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Store key whose presence marks the quiz as completed.
    pub completion_key: String,
    /// Store key holding the result payload. Often equal to `completion_key`.
    pub result_key: String,
    /// Lower values are offered first and rank first.
    #[serde(default)]
    pub priority: i32,
}

impl QuizMetadata {
    /// Metadata whose completion and result live under the same store key.
    pub fn new(id: &str, name: &str, storage_key: &str, priority: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            tags: BTreeSet::new(),
            completion_key: storage_key.to_string(),
            result_key: storage_key.to_string(),
            priority,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_result_key(mut self, key: &str) -> Self {
        self.result_key = key.to_string();
        self
    }
}

/// The quiz-specific part of a normalized result.
///
/// Variants describe result *shapes*, not quiz ids, so a new trait-scored
/// quiz can reuse `Traits` without touching this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuizOutcome {
    /// A quiz that counts answers per trait and names a dominant one.
    Traits {
        scores: BTreeMap<String, f64>,
        dominant: String,
    },
    /// A quiz that resolves the respondent to a single archetype.
    Archetype {
        archetype: String,
        #[serde(default)]
        answers: BTreeMap<String, String>,
    },
}

/// A completed quiz, normalized into the shape every scorer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Id of the owning quiz in the registry.
    pub quiz_id: String,
    /// When the respondent finished, if the record says.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: QuizOutcome,
    /// Traits scoring well below the respondent's own average.
    #[serde(default)]
    pub weak_areas: Vec<String>,
    /// Free-form labels for the tag-matching fallback.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuizResult {
    pub fn dominant_trait(&self) -> Option<&str> {
        match &self.outcome {
            QuizOutcome::Traits { dominant, .. } => Some(dominant),
            QuizOutcome::Archetype { .. } => None,
        }
    }

    pub fn archetype(&self) -> Option<&str> {
        match &self.outcome {
            QuizOutcome::Archetype { archetype, .. } => Some(archetype),
            QuizOutcome::Traits { .. } => None,
        }
    }

    /// The dominant trait or archetype, whichever this result carries.
    pub fn label(&self) -> &str {
        match &self.outcome {
            QuizOutcome::Traits { dominant, .. } => dominant,
            QuizOutcome::Archetype { archetype, .. } => archetype,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Bullet-point features shown on the course card.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Course {
    /// Lowercased title, description and features, used for keyword matching.
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.description.len() + self.features.len() * 24,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.description);
        for feature in &self.features {
            text.push(' ');
            text.push_str(feature);
        }
        text.to_lowercase()
    }

    /// Case-insensitive substring check against any of `keywords`.
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        let text = self.searchable_text();
        keywords.iter().any(|k| text.contains(&k.to_lowercase()))
    }
}

/// Reading level of a curated book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Topical shelf a book sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookCategory {
    Philosophy,
    Practice,
    Meditation,
    Scripture,
}

impl fmt::Display for BookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookCategory::Philosophy => write!(f, "philosophy"),
            BookCategory::Practice => write!(f, "practice"),
            BookCategory::Meditation => write!(f, "meditation"),
            BookCategory::Scripture => write!(f, "scripture"),
        }
    }
}

impl FromStr for BookCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "philosophy" => Ok(BookCategory::Philosophy),
            "practice" => Ok(BookCategory::Practice),
            "meditation" => Ok(BookCategory::Meditation),
            "scripture" => Ok(BookCategory::Scripture),
            other => Err(format!("unknown book category: {other}")),
        }
    }
}

/// A book on the curated reading list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub category: BookCategory,
    pub difficulty: Difficulty,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Where a course lands on the recommendations page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseCategory {
    Primary,
    Secondary,
    Explore,
}

impl CourseCategory {
    pub fn from_score(score: f64) -> Self {
        if score > PRIMARY_THRESHOLD {
            CourseCategory::Primary
        } else if score > SECONDARY_THRESHOLD {
            CourseCategory::Secondary
        } else {
            CourseCategory::Explore
        }
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseCategory::Primary => write!(f, "primary"),
            CourseCategory::Secondary => write!(f, "secondary"),
            CourseCategory::Explore => write!(f, "explore"),
        }
    }
}

/// Badge shown next to a course's match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Perfect,
    High,
    Good,
}

impl MatchTier {
    pub fn from_score(score: f64) -> Self {
        if score > PERFECT_TIER_THRESHOLD {
            MatchTier::Perfect
        } else if score > HIGH_TIER_THRESHOLD {
            MatchTier::High
        } else {
            MatchTier::Good
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Perfect => write!(f, "perfect"),
            MatchTier::High => write!(f, "high"),
            MatchTier::Good => write!(f, "good"),
        }
    }
}

/// A scored course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub course: Course,
    /// Always within [0, 1].
    pub score: f64,
    pub category: CourseCategory,
    pub tier: MatchTier,
    pub reason: String,
}

impl CourseRecommendation {
    /// Build a recommendation, clamping the score and deriving category and tier.
    pub fn new(course: Course, score: f64, reason: String) -> Self {
        let score = crate::scoring::clamp_unit(score);
        Self {
            course,
            score,
            category: CourseCategory::from_score(score),
            tier: MatchTier::from_score(score),
            reason,
        }
    }
}

/// A book pulled from the curated list with the reason it was picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecommendation {
    pub title: String,
    pub author: String,
    pub reason: String,
    pub category: BookCategory,
    pub difficulty: Difficulty,
}

impl BookRecommendation {
    pub fn from_book(book: &Book, reason: &str) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            reason: reason.to_string(),
            category: book.category,
            difficulty: book.difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, description: &str, features: &[&str]) -> Course {
        Course {
            id: "c".into(),
            title: title.into(),
            description: description.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn difficulty_display_parse_and_order() {
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
        assert_eq!(
            "Advanced".parse::<Difficulty>().unwrap(),
            Difficulty::Advanced
        );
        assert!("expert".parse::<Difficulty>().is_err());
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(CourseCategory::from_score(0.71), CourseCategory::Primary);
        assert_eq!(CourseCategory::from_score(0.7), CourseCategory::Secondary);
        assert_eq!(CourseCategory::from_score(0.51), CourseCategory::Secondary);
        assert_eq!(CourseCategory::from_score(0.5), CourseCategory::Explore);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(MatchTier::from_score(0.81), MatchTier::Perfect);
        assert_eq!(MatchTier::from_score(0.8), MatchTier::High);
        assert_eq!(MatchTier::from_score(0.6), MatchTier::Good);
    }

    #[test]
    fn recommendation_clamps_score() {
        let rec = CourseRecommendation::new(course("A", "", &[]), 1.4, "why".into());
        assert_eq!(rec.score, 1.0);
        assert_eq!(rec.category, CourseCategory::Primary);
        assert_eq!(rec.tier, MatchTier::Perfect);

        let rec = CourseRecommendation::new(course("A", "", &[]), -0.2, "why".into());
        assert_eq!(rec.score, 0.0);
        assert_eq!(rec.category, CourseCategory::Explore);
    }

    #[test]
    fn searchable_text_covers_features_case_insensitively() {
        let c = course("Breath Work", "Calm the mind", &["Daily MEDITATION audio"]);
        assert!(c.mentions_any(&["meditation"]));
        assert!(c.mentions_any(&["Calm"]));
        assert!(!c.mentions_any(&["scripture"]));
    }

    #[test]
    fn result_accessors_follow_outcome() {
        let result = QuizResult {
            quiz_id: "archetype".into(),
            completed_at: None,
            outcome: QuizOutcome::Archetype {
                archetype: "seeker".into(),
                answers: BTreeMap::new(),
            },
            weak_areas: vec![],
            tags: vec![],
        };
        assert_eq!(result.label(), "seeker");
        assert_eq!(result.archetype(), Some("seeker"));
        assert!(result.dominant_trait().is_none());
    }

    #[test]
    fn quiz_result_serde_roundtrip() {
        let mut scores = BTreeMap::new();
        scores.insert("grounding".to_string(), 6.0);
        let result = QuizResult {
            quiz_id: "energy".into(),
            completed_at: None,
            outcome: QuizOutcome::Traits {
                scores,
                dominant: "grounding".into(),
            },
            weak_areas: vec![],
            tags: vec!["energy".into()],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"kind\":\"traits\""));
        let back: QuizResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
