//! Recommendation engine orchestrator.
//!
//! Reads every registered quiz through the normalizer, hands the results to
//! the course matcher, book recommender and narrator, and assembles the
//! capped bundle. No scoring happens here.

use std::sync::Arc;

use crate::books::recommend_books;
use crate::matcher::match_courses;
use crate::model::{QuizMetadata, QuizResult};
use crate::narrator;
use crate::normalizer::normalize_results;
use crate::registry::QuizRegistry;
use crate::report::UnifiedRecommendations;
use crate::traits::{CatalogSource, QuizStore, QuizStrategy};

/// Configuration for the recommendation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Most courses in a bundle.
    pub max_courses: usize,
    /// Most books in a bundle.
    pub max_books: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_courses: 3,
            max_books: 2,
        }
    }
}

/// The recommendation engine.
///
/// Registration takes `&mut self`; do it at start-up. [`generate`](Self::generate)
/// only reads, so a built engine can be shared behind an `Arc`.
pub struct RecommendationEngine {
    registry: QuizRegistry,
    store: Arc<dyn QuizStore>,
    catalog: Arc<dyn CatalogSource>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(
        registry: QuizRegistry,
        store: Arc<dyn QuizStore>,
        catalog: Arc<dyn CatalogSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            store,
            catalog,
            config,
        }
    }

    pub fn registry(&self) -> &QuizRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Add or replace a quiz type. Without a strategy it is parsed and
    /// matched generically.
    pub fn register_quiz(&mut self, metadata: QuizMetadata) {
        tracing::debug!("registering quiz '{}' (priority {})", metadata.id, metadata.priority);
        self.registry.register(metadata);
    }

    /// Attach a strategy to a quiz id, registered or not.
    pub fn register_strategy(&mut self, quiz_id: &str, strategy: Arc<dyn QuizStrategy>) {
        self.registry.register_strategy(quiz_id, strategy);
    }

    /// Normalized results for every completed quiz, in priority order.
    pub fn results(&self) -> Vec<QuizResult> {
        normalize_results(&self.registry, self.store.as_ref())
    }

    /// Build a fresh recommendation bundle from the current store contents.
    pub fn generate(&self) -> UnifiedRecommendations {
        let results = self.results();
        let has_history = !results.is_empty();

        let next_quiz = self
            .registry
            .list()
            .iter()
            .find(|quiz| !results.iter().any(|r| r.quiz_id == quiz.id))
            .cloned();

        let mut courses = match_courses(&self.registry, &results, self.catalog.courses());
        courses.truncate(self.config.max_courses);

        let mut books = recommend_books(&self.registry, &results, self.catalog.as_ref());
        books.truncate(self.config.max_books);

        let analysis = narrator::single_quiz_analysis(&results);
        let combined_analysis = if results.len() >= 2 {
            narrator::combined_analysis(&results)
        } else {
            None
        };

        tracing::info!(
            completed = results.len(),
            courses = courses.len(),
            books = books.len(),
            "generated recommendations"
        );

        UnifiedRecommendations {
            next_quiz,
            courses,
            books,
            analysis,
            combined_analysis,
            has_history,
        }
    }
}
