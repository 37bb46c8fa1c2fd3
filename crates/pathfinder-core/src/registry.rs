//! The quiz registry.
//!
//! An explicit object the host builds once and hands to the engine. It keeps
//! quiz metadata sorted by priority and maps quiz ids to their strategies.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::QuizMetadata;
use crate::strategies::{builtin_quizzes, GenericStrategy};
use crate::traits::QuizStrategy;

/// Known quiz types, ordered by priority ascending.
#[derive(Clone)]
pub struct QuizRegistry {
    quizzes: Vec<QuizMetadata>,
    strategies: HashMap<String, Arc<dyn QuizStrategy>>,
    fallback: Arc<dyn QuizStrategy>,
}

impl Default for QuizRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuizRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut strategies: Vec<(&str, &str)> = self
            .strategies
            .iter()
            .map(|(id, s)| (id.as_str(), s.name()))
            .collect();
        strategies.sort_unstable();
        f.debug_struct("QuizRegistry")
            .field("quizzes", &self.quizzes)
            .field("strategies", &strategies)
            .finish()
    }
}

impl QuizRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            quizzes: Vec::new(),
            strategies: HashMap::new(),
            fallback: Arc::new(GenericStrategy),
        }
    }

    /// A registry with the energy and archetype quizzes.
    pub fn with_builtin_quizzes() -> Self {
        let mut registry = Self::new();
        for (metadata, strategy) in builtin_quizzes() {
            registry.register_strategy(&metadata.id, strategy);
            registry.register(metadata);
        }
        registry
    }

    /// All quizzes, lowest priority value first.
    pub fn list(&self) -> &[QuizMetadata] {
        &self.quizzes
    }

    /// Insert or replace by id, then re-sort by priority.
    ///
    /// The sort is stable, so quizzes sharing a priority keep the order in
    /// which they were first registered.
    pub fn register(&mut self, metadata: QuizMetadata) {
        match self.quizzes.iter_mut().find(|q| q.id == metadata.id) {
            Some(existing) => {
                tracing::debug!("replacing quiz '{}'", metadata.id);
                *existing = metadata;
            }
            None => {
                tracing::debug!("registering quiz '{}'", metadata.id);
                self.quizzes.push(metadata);
            }
        }
        self.quizzes.sort_by_key(|q| q.priority);
    }

    /// Attach the strategy that understands `quiz_id`'s stored records.
    ///
    /// Quizzes without one use [`GenericStrategy`].
    pub fn register_strategy(&mut self, quiz_id: &str, strategy: Arc<dyn QuizStrategy>) {
        self.strategies.insert(quiz_id.to_string(), strategy);
    }

    pub fn get(&self, quiz_id: &str) -> Option<&QuizMetadata> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }

    /// Position of `quiz_id` in priority order.
    pub fn rank_of(&self, quiz_id: &str) -> Option<usize> {
        self.quizzes.iter().position(|q| q.id == quiz_id)
    }

    /// The strategy for `quiz_id`, or the generic one.
    pub fn strategy_for(&self, quiz_id: &str) -> &dyn QuizStrategy {
        self.strategies
            .get(quiz_id)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Whether `quiz_id` has a dedicated strategy.
    pub fn has_strategy(&self, quiz_id: &str) -> bool {
        self.strategies.contains_key(quiz_id)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}
