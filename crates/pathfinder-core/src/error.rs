//! Normalization error types.
//!
//! These never escape the engine: the normalizer classifies them, logs them
//! and treats the quiz as not completed. They exist so strategies can say
//! *why* a stored record was rejected without string matching.

use thiserror::Error;

/// Reasons a stored quiz record cannot become a `QuizResult`.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Nothing is stored under the quiz's keys.
    #[error("no stored state for quiz '{quiz_id}'")]
    MissingPayload { quiz_id: String },

    /// A record exists but the quiz is still in progress.
    #[error("quiz '{quiz_id}' is not completed")]
    Incomplete { quiz_id: String },

    /// The record does not have the shape the strategy expects.
    #[error("malformed record for quiz '{quiz_id}': {reason}")]
    Malformed { quiz_id: String, reason: String },
}

impl NormalizeError {
    /// The quiz the error belongs to.
    pub fn quiz_id(&self) -> &str {
        match self {
            NormalizeError::MissingPayload { quiz_id }
            | NormalizeError::Incomplete { quiz_id }
            | NormalizeError::Malformed { quiz_id, .. } => quiz_id,
        }
    }

    /// Returns `true` if the record was present but unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, NormalizeError::Malformed { .. })
    }

    pub(crate) fn malformed(quiz_id: &str, reason: impl Into<String>) -> Self {
        NormalizeError::Malformed {
            quiz_id: quiz_id.to_string(),
            reason: reason.into(),
        }
    }
}
