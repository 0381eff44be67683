//! Practice engine.
//!
//! Ties the pure aggregations and the quiz logic to an injected
//! [`WordRepository`]. Every read works on a fresh snapshot of the store.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::Serialize;

use crate::error::{QuizError, StoreError, WordError};
use crate::model::{WordDraft, WordPatch, WordRecord};
use crate::quiz::{self, Answer, QuizRequest, QuizResult, QuizSheet, DEFAULT_PRACTICE_BACKDATE_DAYS};
use crate::reporting::{self, Dashboard};
use crate::statistics::{compute_stats, rank_difficulty, DifficultyRanking, WordStats};
use crate::traits::WordRepository;

/// Configuration for the practice engine.
#[derive(Debug, Clone)]
pub struct PracticeConfig {
    /// Days subtracted from the submission time when results are logged.
    pub backdate_days: i64,
    /// First day of the daily report.
    pub report_start: NaiveDate,
    /// Number of rows in the last-failures table.
    pub last_failures_limit: usize,
}

/// First day covered by the daily report unless configured otherwise.
pub fn default_report_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 4, 1).unwrap_or_default()
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            backdate_days: DEFAULT_PRACTICE_BACKDATE_DAYS,
            report_start: default_report_start(),
            last_failures_limit: 10,
        }
    }
}

/// Outcome of a persisted quiz submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub result: QuizResult,
    /// Timestamp the outcomes were logged under.
    pub logged_at: NaiveDateTime,
}

/// What an import did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// Word and reason, for drafts that were not stored.
    pub skipped: Vec<(String, String)>,
}

/// The practice engine.
pub struct PracticeEngine {
    repository: Arc<dyn WordRepository>,
    config: PracticeConfig,
}

impl PracticeEngine {
    pub fn new(repository: Arc<dyn WordRepository>, config: PracticeConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    pub fn repository_name(&self) -> &str {
        self.repository.name()
    }

    /// Every stored record.
    pub fn snapshot(&self) -> Result<Vec<WordRecord>, StoreError> {
        self.repository.fetch_all()
    }

    pub fn stats(&self) -> Result<Vec<WordStats>, StoreError> {
        Ok(compute_stats(&self.snapshot()?))
    }

    pub fn ranking(&self) -> Result<DifficultyRanking, StoreError> {
        Ok(rank_difficulty(&self.stats()?))
    }

    /// Dashboard aggregations from the configured start date through `today`.
    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard, StoreError> {
        let records = self.snapshot()?;
        Ok(reporting::build_dashboard(
            &records,
            self.config.report_start,
            today,
            self.config.last_failures_limit,
        ))
    }

    /// Draw a quiz from the current vocabulary.
    pub fn generate_quiz<R: Rng + ?Sized>(
        &self,
        request: &QuizRequest,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<QuizSheet, QuizError> {
        let records = self.snapshot()?;
        let ranking = rank_difficulty(&compute_stats(&records));
        quiz::generate_quiz(&records, &ranking, request, now, rng)
    }

    /// Score a sheet and append the outcomes to each word's practice log.
    ///
    /// Nothing is written if scoring fails.
    pub fn submit(
        &self,
        sheet: &QuizSheet,
        answers: &BTreeMap<String, Answer>,
        now: NaiveDateTime,
    ) -> Result<Submission, QuizError> {
        let logged_at = quiz::practice_timestamp(now, self.config.backdate_days)?;
        let records = self.snapshot()?;
        let result = quiz::score_quiz(sheet, answers, &records)?;

        for (word, outcome) in &result.outcomes {
            if !outcome.is_scored() {
                continue;
            }
            let Some(record) = records.iter().find(|r| &r.word == word) else {
                continue;
            };
            let mut log = record.practice_data.clone();
            outcome.append_to(&mut log, logged_at);
            self.repository.update_practice_log(word, &log)?;
        }

        tracing::info!(
            sheet = %sheet.id,
            passed = result.passed_count(),
            scored = result.scored_count(),
            %logged_at,
            "quiz submitted"
        );
        Ok(Submission { result, logged_at })
    }

    /// Validate and store a new word.
    pub fn add_word(&self, draft: WordDraft, today: NaiveDate) -> Result<WordRecord, WordError> {
        let record = draft.into_record(today)?;
        if self.repository.contains(&record.word)? {
            return Err(WordError::AlreadyExists(record.word));
        }
        self.repository.upsert(&record)?;
        tracing::info!(word = %record.word, class = %record.class, "word added");
        Ok(record)
    }

    /// Apply a patch to a stored word, keeping its practice history.
    pub fn update_word(&self, word: &str, patch: WordPatch) -> Result<WordRecord, WordError> {
        let existing = self.repository.fetch_one(word)?;
        let updated = patch.apply(&existing)?;
        self.repository.upsert(&updated)?;
        tracing::info!(word, "word updated");
        Ok(updated)
    }

    /// Store a batch of drafts.
    ///
    /// New words are added. Existing words are replaced field by field when
    /// `replace_existing` is set (history kept) and skipped otherwise. Invalid
    /// drafts are skipped with their validation message.
    pub fn import(
        &self,
        drafts: Vec<WordDraft>,
        today: NaiveDate,
        replace_existing: bool,
    ) -> Result<ImportSummary, StoreError> {
        let mut summary = ImportSummary::default();
        for draft in drafts {
            let word = draft.word.clone();
            let record = match draft.into_record(today) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(%word, "skipping invalid word: {e}");
                    summary.skipped.push((word, e.to_string()));
                    continue;
                }
            };

            match self.repository.fetch_one(&record.word) {
                Ok(existing) if replace_existing => {
                    let mut record = record;
                    record.practice_data = existing.practice_data;
                    self.repository.upsert(&record)?;
                    summary.updated.push(word);
                }
                Ok(_) => summary.skipped.push((word, "already exists".to_string())),
                Err(e) if e.is_not_found() => {
                    self.repository.upsert(&record)?;
                    summary.added.push(word);
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(
            added = summary.added.len(),
            updated = summary.updated.len(),
            skipped = summary.skipped.len(),
            "import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::model::{DefiniteArticle, Direction, Gender, PracticeLog, WordClass};
    use crate::quiz::{Prompt, QuizQuestion, QuizVerdict};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    #[derive(Default)]
    struct InMemory {
        records: Mutex<BTreeMap<String, WordRecord>>,
    }

    impl WordRepository for InMemory {
        fn name(&self) -> &str {
            "in-memory"
        }

        fn fetch_all(&self) -> Result<Vec<WordRecord>, StoreError> {
            Ok(self.records.lock().unwrap().values().cloned().collect())
        }

        fn fetch_one(&self, word: &str) -> Result<WordRecord, StoreError> {
            self.records
                .lock()
                .unwrap()
                .get(word)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(word.to_string()))
        }

        fn upsert(&self, record: &WordRecord) -> Result<(), StoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(record.word.clone(), record.clone());
            Ok(())
        }

        fn update_practice_log(&self, word: &str, log: &PracticeLog) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .get_mut(word)
                .ok_or_else(|| StoreError::NotFound(word.to_string()))?;
            record.practice_data = log.clone();
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_hms_opt(18, 30, 0).unwrap()
    }

    fn draft(word: &str, meaning: &str, class: WordClass, gender: Gender) -> WordDraft {
        WordDraft {
            word: word.into(),
            meaning: meaning.into(),
            class,
            gender,
            ..Default::default()
        }
    }

    fn engine() -> PracticeEngine {
        let engine = PracticeEngine::new(Arc::new(InMemory::default()), PracticeConfig::default());
        for d in [
            draft("Haus", "house", WordClass::Noun, Gender::Neuter),
            draft("Tisch", "table", WordClass::Noun, Gender::Masculine),
            draft("schnell", "fast", WordClass::Adjective, Gender::NotApplicable),
        ] {
            engine.add_word(d, today()).unwrap();
        }
        engine
    }

    #[test]
    fn add_rejects_duplicates_and_invalid_drafts() {
        let engine = engine();
        let dup = engine.add_word(
            draft("Haus", "home", WordClass::Noun, Gender::Neuter),
            today(),
        );
        assert!(matches!(dup, Err(WordError::AlreadyExists(w)) if w == "Haus"));

        let invalid = engine.add_word(draft("Baum", " ", WordClass::Noun, Gender::Masculine), today());
        assert!(matches!(invalid, Err(WordError::Validation(_))));
        assert!(!engine.repository.contains("Baum").unwrap());
    }

    #[test]
    fn update_of_missing_word_is_not_found() {
        let engine = engine();
        let err = engine.update_word("Baum", WordPatch::default()).unwrap_err();
        assert!(matches!(err, WordError::Store(ref e) if e.is_not_found()));
    }

    #[test]
    fn submit_logs_backdated_outcomes() {
        let engine = engine();
        let sheet = QuizSheet {
            id: Uuid::nil(),
            created_at: now(),
            request: QuizRequest {
                class: None,
                difficulty: None,
                size: 2,
            },
            questions: vec![
                QuizQuestion {
                    word: "schnell".into(),
                    prompt: Prompt::Translate {
                        shown: "schnell".into(),
                        article_hint: None,
                    },
                    answer: None,
                },
                QuizQuestion {
                    word: "Haus".into(),
                    prompt: Prompt::NounWithArticle {
                        shown: "house".into(),
                    },
                    answer: None,
                },
            ],
        };
        let answers = BTreeMap::from([
            ("schnell".to_string(), Answer::text("fast")),
            (
                "Haus".to_string(),
                Answer::with_article(DefiniteArticle::Das, "Haus"),
            ),
        ]);

        let submission = engine.submit(&sheet, &answers, now()).unwrap();
        assert_eq!(submission.result.verdict(), QuizVerdict::AllPassed);
        assert_eq!(
            submission.logged_at,
            NaiveDate::from_ymd_opt(2024, 6, 10)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        );

        let haus = engine.repository.fetch_one("Haus").unwrap();
        assert!(haus.practice_data.to_target.is_empty());
        assert_eq!(
            haus.practice_data.direction(Direction::ToSource).get(&submission.logged_at),
            Some(&true)
        );
        let tisch = engine.repository.fetch_one("Tisch").unwrap();
        assert!(tisch.practice_data.is_empty());
    }

    #[test]
    fn unrepresentable_backdate_fails_before_logging() {
        let seeded = engine();
        let engine = PracticeEngine::new(
            Arc::clone(&seeded.repository),
            PracticeConfig {
                backdate_days: 200_000_000,
                ..Default::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let request = QuizRequest {
            class: None,
            difficulty: None,
            size: 2,
        };
        let sheet = engine.generate_quiz(&request, now(), &mut rng).unwrap();

        let err = engine.submit(&sheet, &BTreeMap::new(), now()).unwrap_err();
        assert!(matches!(err, QuizError::BackdateOutOfRange(200_000_000)));
        assert!(engine
            .snapshot()
            .unwrap()
            .iter()
            .all(|r| r.practice_data.is_empty()));
    }

    #[test]
    fn generated_quiz_can_be_submitted() {
        let engine = engine();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let request = QuizRequest {
            class: None,
            difficulty: None,
            size: 3,
        };
        let sheet = engine.generate_quiz(&request, now(), &mut rng).unwrap();
        let submission = engine.submit(&sheet, &BTreeMap::new(), now()).unwrap();
        assert_eq!(submission.result.verdict(), QuizVerdict::AllFailed);

        let stats = engine.stats().unwrap();
        let total: u32 = stats
            .iter()
            .map(|s| s.to_target.total + s.to_source.total)
            .sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn update_keeps_history() {
        let engine = engine();
        let mut log = PracticeLog::default();
        log.record(Direction::ToTarget, now(), false);
        engine.repository.update_practice_log("Tisch", &log).unwrap();

        let updated = engine
            .update_word(
                "Tisch",
                WordPatch {
                    meaning: Some("desk".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.meaning, "desk");
        assert_eq!(updated.practice_data, log);
    }

    #[test]
    fn import_adds_skips_and_replaces() {
        let engine = engine();
        let drafts = vec![
            draft("Baum", "tree", WordClass::Noun, Gender::Masculine),
            draft("Haus", "building", WordClass::Noun, Gender::Neuter),
            draft("", "nothing", WordClass::Other, Gender::NotApplicable),
        ];

        let summary = engine.import(drafts.clone(), today(), false).unwrap();
        assert_eq!(summary.added, vec!["Baum"]);
        assert!(summary.updated.is_empty());
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(engine.repository.fetch_one("Haus").unwrap().meaning, "house");

        let summary = engine.import(drafts, today(), true).unwrap();
        assert_eq!(summary.updated, vec!["Baum", "Haus"]);
        assert_eq!(engine.repository.fetch_one("Haus").unwrap().meaning, "building");
    }

    #[test]
    fn dashboard_uses_configured_limits() {
        let engine = engine();
        let dashboard = engine.dashboard(today()).unwrap();
        assert_eq!(dashboard.classes.len(), WordClass::ALL.len());
        assert!(dashboard.daily.is_empty());
        assert_eq!(dashboard.last_failures.len(), 3);
        assert!(dashboard.last_failures.iter().all(|f| f.never_failed()));
    }
}
