//! JSON document file store.
//!
//! The whole vocabulary lives in one JSON array of word documents. Every call
//! reads the file, and every write replaces it atomically through a temporary
//! file in the same directory.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use bolero_core::error::StoreError;
use bolero_core::model::{PracticeLog, WordRecord};
use bolero_core::traits::WordRepository;

/// A [`WordRepository`] backed by a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `path`. The file does not have to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, WordRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let records: Vec<WordRecord> = serde_json::from_str(&content).map_err(|e| {
            StoreError::Serialization(format!("{}: {e}", self.path.display()))
        })?;
        Ok(records.into_iter().map(|r| (r.word.clone(), r)).collect())
    }

    fn save(&self, records: &BTreeMap<String, WordRecord>) -> Result<(), StoreError> {
        let documents: Vec<&WordRecord> = records.values().collect();
        let json = serde_json::to_string_pretty(&documents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| io_error(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), words = records.len(), "store written");
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {e}", path.display()))
}

impl WordRepository for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch_all(&self) -> Result<Vec<WordRecord>, StoreError> {
        Ok(self.load()?.into_values().collect())
    }

    fn fetch_one(&self, word: &str) -> Result<WordRecord, StoreError> {
        self.load()?
            .remove(word)
            .ok_or_else(|| StoreError::NotFound(word.to_string()))
    }

    fn upsert(&self, record: &WordRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.insert(record.word.clone(), record.clone());
        self.save(&records)
    }

    fn update_practice_log(&self, word: &str, log: &PracticeLog) -> Result<(), StoreError> {
        let mut records = self.load()?;
        let record = records
            .get_mut(word)
            .ok_or_else(|| StoreError::NotFound(word.to_string()))?;
        record.practice_data = log.clone();
        self.save(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolero_core::model::{Direction, Gender, WordClass, WordDraft};
    use chrono::NaiveDate;

    fn record(word: &str) -> WordRecord {
        WordDraft {
            word: word.into(),
            meaning: format!("{word}-en"),
            class: WordClass::Noun,
            gender: Gender::Feminine,
            ..Default::default()
        }
        .into_record(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        .unwrap()
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("words.json"));
        assert!(store.fetch_all().unwrap().is_empty());
        assert!(store.fetch_one("Lampe").unwrap_err().is_not_found());
        assert!(!store.contains("Lampe").unwrap());
    }

    #[test]
    fn upsert_replaces_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("words.json"));
        store.upsert(&record("Lampe")).unwrap();
        store.upsert(&record("Blume")).unwrap();

        let mut changed = record("Lampe");
        changed.meaning = "light".into();
        store.upsert(&changed).unwrap();

        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].word, "Blume");
        assert_eq!(store.fetch_one("Lampe").unwrap().meaning, "light");
    }

    #[test]
    fn practice_log_update_touches_only_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("words.json"));
        store.upsert(&record("Lampe")).unwrap();

        let mut log = PracticeLog::default();
        let at = NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_micro_opt(9, 15, 0, 250)
            .unwrap();
        log.record(Direction::ToSource, at, false);
        store.update_practice_log("Lampe", &log).unwrap();

        let stored = store.fetch_one("Lampe").unwrap();
        assert_eq!(stored.practice_data, log);
        assert_eq!(stored.meaning, "Lampe-en");

        let err = store.update_practice_log("Blume", &log).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn file_holds_plain_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        let store = JsonFileStore::new(&path);
        store.upsert(&record("Lampe")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[0]["word"], "Lampe");
        assert_eq!(raw[0]["cls"], "Noun");
        assert_eq!(raw[0]["see_also"], serde_json::json!(["NA", "NA"]));
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.fetch_all(),
            Err(StoreError::Serialization(_))
        ));
    }
}
