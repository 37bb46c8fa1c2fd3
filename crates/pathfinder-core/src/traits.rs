//! Core trait definitions at the engine's seams.
//!
//! The host implements [`QuizStore`] (its durable client-side store) and
//! usually [`CatalogSource`]; each quiz type implements [`QuizStrategy`].

use serde_json::Value;

use crate::error::NormalizeError;
use crate::model::{Book, Course, QuizMetadata, QuizResult};

// ---------------------------------------------------------------------------
// Quiz store
// ---------------------------------------------------------------------------

/// Read-only key-value lookup against the store holding quiz state.
///
/// The engine never writes. Implementations should return `None` for
/// anything they cannot read rather than failing.
pub trait QuizStore: Send + Sync {
    fn read(&self, key: &str) -> Option<Value>;
}

/// Everything stored for one quiz, read through its metadata keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuizState {
    /// Value under the completion key.
    pub completion: Option<Value>,
    /// Value under the result key. Same as `completion` when the keys coincide.
    pub payload: Option<Value>,
}

impl RawQuizState {
    /// Read both keys for `meta`, touching the store once when they coincide.
    pub fn read(store: &dyn QuizStore, meta: &QuizMetadata) -> Self {
        let completion = store.read(&meta.completion_key);
        let payload = if meta.result_key == meta.completion_key {
            completion.clone()
        } else {
            store.read(&meta.result_key)
        };
        Self {
            completion,
            payload,
        }
    }

    /// State where both keys hold the same record.
    pub fn single(record: Value) -> Self {
        Self {
            completion: Some(record.clone()),
            payload: Some(record),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completion.is_none() && self.payload.is_none()
    }
}

// ---------------------------------------------------------------------------
// Quiz strategy
// ---------------------------------------------------------------------------

/// A book picked for a result, with the reason shown to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPick {
    pub title: String,
    pub reason: String,
}

impl BookPick {
    pub fn new(title: &str, reason: &str) -> Self {
        Self {
            title: title.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the engine needs to know about one quiz type.
///
/// Adding a quiz means registering one implementation of this trait; no
/// scorer has to change.
pub trait QuizStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// The single gate deciding whether stored state counts as finished.
    fn is_complete(&self, raw: &RawQuizState) -> bool;

    /// Map stored state into a `QuizResult`. Only called when
    /// [`is_complete`](Self::is_complete) returned `true`.
    fn parse(&self, meta: &QuizMetadata, raw: &RawQuizState) -> Result<QuizResult, NormalizeError>;

    /// Quiz-specific rule score for a course, in [0, 1]. The generic tag
    /// overlap is added by the matcher and must not be included here.
    fn match_course(&self, result: &QuizResult, course: &Course) -> f64;

    /// Zero to two curated titles for this result, most relevant first.
    fn match_books(&self, result: &QuizResult) -> Vec<BookPick>;

    /// One-sentence reason this course suits the result, if a rule applies.
    fn reason(&self, result: &QuizResult, course: &Course) -> Option<String>;

    /// Every title [`match_books`](Self::match_books) can return.
    fn referenced_books(&self) -> Vec<&str> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Catalog source
// ---------------------------------------------------------------------------

/// Read-only access to the course and book catalogs.
pub trait CatalogSource: Send + Sync {
    /// Courses in declaration order; ties in ranking keep this order.
    fn courses(&self) -> &[Course];

    /// The curated book list.
    fn books(&self) -> &[Book];

    /// Case-insensitive lookup by title.
    fn find_book(&self, title: &str) -> Option<&Book> {
        self.books()
            .iter()
            .find(|b| b.title.eq_ignore_ascii_case(title))
    }
}
