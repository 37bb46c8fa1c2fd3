//! Book recommender.
//!
//! Unions each completed quiz's curated picks, first occurrence wins, then
//! orders the result easiest first.

use std::collections::HashSet;

use crate::model::{BookRecommendation, QuizResult};
use crate::registry::QuizRegistry;
use crate::traits::{BookPick, CatalogSource};

/// Titles offered when no quiz produced a pick.
pub const FOUNDATIONAL_TITLES: &[&str] = &[
    "The Bhagavad Gita",
    "The Miracle of Mindfulness",
    "Autobiography of a Yogi",
];

pub const FOUNDATIONAL_REASON: &str = "A foundational text for any spiritual path";

/// Curated picks across every result, de-duplicated by title.
///
/// Results are visited in the order given, so a higher-priority quiz keeps
/// its reason for a title a later quiz also picks.
pub fn collect_picks(registry: &QuizRegistry, results: &[QuizResult]) -> Vec<BookPick> {
    let mut seen = HashSet::new();
    results
        .iter()
        .flat_map(|result| registry.strategy_for(&result.quiz_id).match_books(result))
        .filter(|pick| seen.insert(pick.title.to_lowercase()))
        .collect()
}

/// Books for the given results, ordered beginner to advanced.
///
/// Falls back to [`FOUNDATIONAL_TITLES`] when there are no picks. Titles
/// the catalog does not carry are dropped; nothing is ever invented.
pub fn recommend_books(
    registry: &QuizRegistry,
    results: &[QuizResult],
    catalog: &dyn CatalogSource,
) -> Vec<BookRecommendation> {
    let mut picks = collect_picks(registry, results);
    if picks.is_empty() {
        picks = FOUNDATIONAL_TITLES
            .iter()
            .map(|title| BookPick::new(title, FOUNDATIONAL_REASON))
            .collect();
    }

    let mut books: Vec<BookRecommendation> = picks
        .iter()
        .filter_map(|pick| match catalog.find_book(&pick.title) {
            Some(book) => Some(BookRecommendation::from_book(book, &pick.reason)),
            None => {
                tracing::warn!("book '{}' is not in the catalog, skipping", pick.title);
                None
            }
        })
        .collect();

    // Stable: equal difficulty keeps pick order.
    books.sort_by_key(|b| b.difficulty);
    books
}
