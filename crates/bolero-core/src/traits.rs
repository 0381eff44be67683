//! Persistence seam for word documents.
//!
//! Implemented by the `bolero-store` crate. Calls are blocking; the store
//! only has to guarantee last-write-wins per document.

use crate::error::StoreError;
use crate::model::{PracticeLog, WordRecord};

/// Document store holding one [`WordRecord`] per word key.
pub trait WordRepository: Send + Sync {
    /// Human-readable backend name (e.g. "json").
    fn name(&self) -> &str;

    /// Every record in the store, ordered by word key.
    fn fetch_all(&self) -> Result<Vec<WordRecord>, StoreError>;

    /// The record stored under `word`, or [`StoreError::NotFound`].
    fn fetch_one(&self, word: &str) -> Result<WordRecord, StoreError>;

    /// Insert or fully replace the document keyed by `record.word`.
    fn upsert(&self, record: &WordRecord) -> Result<(), StoreError>;

    /// Replace only the practice log of an existing document.
    fn update_practice_log(&self, word: &str, log: &PracticeLog) -> Result<(), StoreError>;

    /// Whether a document exists under `word`.
    fn contains(&self, word: &str) -> Result<bool, StoreError> {
        match self.fetch_one(word) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
