//! Result normalizer.
//!
//! Walks the registry in priority order, reads each quiz's stored state and
//! keeps only the quizzes whose strategy says they are complete. Missing or
//! malformed state is the same as "not completed": logged, never raised.

use crate::error::NormalizeError;
use crate::model::{QuizMetadata, QuizResult};
use crate::registry::QuizRegistry;
use crate::traits::{QuizStore, RawQuizState};

/// Normalized results for every completed quiz, in registry priority order.
pub fn normalize_results(registry: &QuizRegistry, store: &dyn QuizStore) -> Vec<QuizResult> {
    registry
        .list()
        .iter()
        .filter_map(|meta| match normalize_one(registry, store, meta) {
            Ok(result) => Some(result),
            Err(e) if e.is_malformed() => {
                tracing::warn!("ignoring quiz '{}': {e}", e.quiz_id());
                None
            }
            Err(e) => {
                tracing::debug!("skipping quiz '{}': {e}", e.quiz_id());
                None
            }
        })
        .collect()
}

/// Normalize a single quiz.
pub fn normalize_one(
    registry: &QuizRegistry,
    store: &dyn QuizStore,
    meta: &QuizMetadata,
) -> Result<QuizResult, NormalizeError> {
    let raw = RawQuizState::read(store, meta);
    if raw.is_empty() {
        return Err(NormalizeError::MissingPayload {
            quiz_id: meta.id.clone(),
        });
    }

    let strategy = registry.strategy_for(&meta.id);
    if !strategy.is_complete(&raw) {
        return Err(NormalizeError::Incomplete {
            quiz_id: meta.id.clone(),
        });
    }
    strategy.parse(meta, &raw)
}
