//! In-memory store for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use bolero_core::error::StoreError;
use bolero_core::model::{PracticeLog, WordRecord};
use bolero_core::traits::WordRepository;

/// A word store that keeps everything in a map, for exercising the engine
/// without touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, WordRecord>>,
    /// Number of writes made.
    write_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `records`.
    pub fn with_records(records: impl IntoIterator<Item = WordRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.records.lock() {
            map.extend(records.into_iter().map(|r| (r.word.clone(), r)));
        }
        store
    }

    /// Get the number of writes made to this store.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, WordRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Io("memory store lock poisoned".into()))
    }
}

impl WordRepository for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_all(&self) -> Result<Vec<WordRecord>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn fetch_one(&self, word: &str) -> Result<WordRecord, StoreError> {
        self.lock()?
            .get(word)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(word.to_string()))
    }

    fn upsert(&self, record: &WordRecord) -> Result<(), StoreError> {
        self.lock()?.insert(record.word.clone(), record.clone());
        self.write_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn update_practice_log(&self, word: &str, log: &PracticeLog) -> Result<(), StoreError> {
        let mut records = self.lock()?;
        let record = records
            .get_mut(word)
            .ok_or_else(|| StoreError::NotFound(word.to_string()))?;
        record.practice_data = log.clone();
        self.write_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
