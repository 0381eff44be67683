//! Quiz generation and grammar-aware scoring.
//!
//! A quiz draws distinct words from the filtered vocabulary. The first half is
//! asked German → English, the second half English → German, where nouns also
//! need the right article and verbs are asked for one conjugated person.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{DefiniteArticle, Direction, PracticeLog, Person, WordClass, WordRecord};
use crate::statistics::{DifficultyRanking, DifficultyTier};

/// Days subtracted from the submission time when practice results are logged.
///
/// The original application stamped every saved result five days in the past.
/// This looks unintentional, but it is kept as the default until the intended
/// timestamping is confirmed.
pub const DEFAULT_PRACTICE_BACKDATE_DAYS: i64 = 5;

/// Smallest quiz that can be generated.
pub const MIN_QUIZ_SIZE: usize = 2;

/// What to draw a quiz from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// `None` means every class.
    pub class: Option<WordClass>,
    /// `None` means every tier.
    pub difficulty: Option<DifficultyTier>,
    /// Number of words to draw.
    pub size: usize,
}

/// Seed used when the user does not pick one: `month * 100 + day`.
pub fn default_seed(today: NaiveDate) -> u64 {
    u64::from(today.month() * 100 + today.day())
}

/// Records matching the class and tier filters, in input order.
pub fn candidates<'a>(
    records: &'a [WordRecord],
    ranking: &DifficultyRanking,
    class: Option<WordClass>,
    difficulty: Option<DifficultyTier>,
) -> Vec<&'a WordRecord> {
    let tier_words: Option<HashSet<&str>> =
        difficulty.map(|tier| ranking.words_in(tier).into_iter().collect());

    records
        .iter()
        .filter(|r| class.map_or(true, |c| r.class == c))
        .filter(|r| {
            tier_words
                .as_ref()
                .map_or(true, |words| words.contains(r.word.as_str()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Quiz sheet
// ---------------------------------------------------------------------------

/// What the answerer is shown for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// German word shown, English meaning expected. Nouns carry their article
    /// as a hint.
    Translate {
        shown: String,
        #[serde(default)]
        article_hint: Option<DefiniteArticle>,
    },
    /// English meaning shown, German noun and its article expected.
    NounWithArticle { shown: String },
    /// English meaning and a person shown, that person's verb form expected.
    Conjugate { shown: String, person: Person },
    /// English meaning shown, German word expected.
    Recall { shown: String },
}

impl Prompt {
    pub fn direction(&self) -> Direction {
        match self {
            Prompt::Translate { .. } => Direction::ToTarget,
            _ => Direction::ToSource,
        }
    }

    pub fn asks_article(&self) -> bool {
        matches!(self, Prompt::NounWithArticle { .. })
    }

    /// Form label as the answerer sees it, e.g. `Das Haus` or `to go - wir`.
    pub fn label(&self) -> String {
        match self {
            Prompt::Translate {
                shown,
                article_hint: Some(article),
            } => format!("{article} {shown}"),
            Prompt::Translate { shown, .. } | Prompt::Recall { shown } => shown.clone(),
            Prompt::NounWithArticle { shown } => format!("{shown} (with article)"),
            Prompt::Conjugate { shown, person } => format!("{shown} - {person}"),
        }
    }

    fn for_record<R: Rng + ?Sized>(record: &WordRecord, direction: Direction, rng: &mut R) -> Self {
        match direction {
            Direction::ToTarget => Prompt::Translate {
                shown: record.word.clone(),
                article_hint: record.definite_article(),
            },
            Direction::ToSource => {
                let shown = record.meaning.clone();
                match record.class {
                    WordClass::Noun => Prompt::NounWithArticle { shown },
                    WordClass::Verb if record.verb_forms.is_complete() => {
                        let person = Person::ALL[rng.gen_range(0..Person::ALL.len())];
                        Prompt::Conjugate { shown, person }
                    }
                    _ => Prompt::Recall { shown },
                }
            }
        }
    }
}

/// One question of a quiz sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Word key the question is about.
    pub word: String,
    pub prompt: Prompt,
    /// Filled in by the answerer.
    #[serde(default)]
    pub answer: Option<Answer>,
}

/// A submitted answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Only read for noun questions asked English → German.
    #[serde(default)]
    pub article: Option<DefiniteArticle>,
}

impl Answer {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            article: None,
        }
    }

    pub fn with_article(article: DefiniteArticle, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            article: Some(article),
        }
    }
}

/// A generated quiz, serializable so it can be answered later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSheet {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub request: QuizRequest,
    /// German → English questions first, then English → German.
    pub questions: Vec<QuizQuestion>,
}

impl QuizSheet {
    pub fn questions_in(&self, direction: Direction) -> impl Iterator<Item = &QuizQuestion> {
        self.questions
            .iter()
            .filter(move |q| q.prompt.direction() == direction)
    }

    /// Answers filled into the sheet, keyed by word.
    pub fn answers(&self) -> BTreeMap<String, Answer> {
        self.questions
            .iter()
            .filter_map(|q| q.answer.clone().map(|a| (q.word.clone(), a)))
            .collect()
    }

    /// Save the sheet as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz sheet")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz sheet to {}", path.display()))?;
        Ok(())
    }

    /// Load a sheet from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz sheet from {}", path.display()))?;
        let sheet: QuizSheet =
            serde_json::from_str(&content).context("failed to parse quiz sheet JSON")?;
        Ok(sheet)
    }
}

/// Draw a quiz from the vocabulary.
///
/// Words are drawn uniformly without replacement from `rng`; the first
/// `size / 2` are asked German → English and the rest English → German.
pub fn generate_quiz<R: Rng + ?Sized>(
    records: &[WordRecord],
    ranking: &DifficultyRanking,
    request: &QuizRequest,
    now: NaiveDateTime,
    rng: &mut R,
) -> Result<QuizSheet, QuizError> {
    let mut pool = candidates(records, ranking, request.class, request.difficulty);
    if pool.is_empty() {
        return Err(QuizError::NoCandidates);
    }
    if request.size < MIN_QUIZ_SIZE || request.size > pool.len() {
        return Err(QuizError::SizeOutOfRange {
            requested: request.size,
            available: pool.len(),
        });
    }

    let (drawn, _) = pool.partial_shuffle(rng, request.size);
    let half = request.size / 2;
    let questions = drawn
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let direction = if i < half {
                Direction::ToTarget
            } else {
                Direction::ToSource
            };
            QuizQuestion {
                word: record.word.clone(),
                prompt: Prompt::for_record(record, direction, rng),
                answer: None,
            }
        })
        .collect();

    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    tracing::debug!(%id, size = request.size, "generated quiz");

    Ok(QuizSheet {
        id,
        created_at: now,
        request: request.clone(),
        questions,
    })
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Grade one answer against the word's answer key.
///
/// German → English must match the meaning exactly. English → German is
/// case-insensitive; nouns also need the gender's definite article (none for
/// gender NA) and verbs the form of the person that was asked.
pub fn is_correct(record: &WordRecord, prompt: &Prompt, answer: &Answer) -> bool {
    let matches_word = |expected: &str| answer.text.to_lowercase() == expected.to_lowercase();
    match prompt {
        Prompt::Translate { .. } => answer.text == record.meaning,
        Prompt::NounWithArticle { .. } => {
            matches_word(&record.word) && answer.article == record.gender.definite_article()
        }
        Prompt::Conjugate { person, .. } => match record.verb_forms.get(*person) {
            Some(form) => matches_word(form),
            None => matches_word(&record.word),
        },
        Prompt::Recall { .. } => matches_word(&record.word),
    }
}

/// The answer key for a question, as shown after grading.
pub fn expected_answer(record: &WordRecord, prompt: &Prompt) -> String {
    match prompt {
        Prompt::Translate { .. } => record.meaning.clone(),
        Prompt::NounWithArticle { .. } => record.display_with_article(),
        Prompt::Conjugate { person, .. } => record
            .verb_forms
            .get(*person)
            .unwrap_or(record.word.as_str())
            .to_string(),
        Prompt::Recall { .. } => record.word.clone(),
    }
}

/// Result of one word in one submission; `None` means not asked that way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOutcome {
    pub to_target: Option<bool>,
    pub to_source: Option<bool>,
}

impl WordOutcome {
    pub fn get(&self, direction: Direction) -> Option<bool> {
        match direction {
            Direction::ToTarget => self.to_target,
            Direction::ToSource => self.to_source,
        }
    }

    fn set(&mut self, direction: Direction, passed: bool) {
        match direction {
            Direction::ToTarget => self.to_target = Some(passed),
            Direction::ToSource => self.to_source = Some(passed),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.to_target.is_some() || self.to_source.is_some()
    }

    /// Append every scored direction to `log` at `at`.
    pub fn append_to(&self, log: &mut PracticeLog, at: NaiveDateTime) {
        for direction in Direction::ALL {
            if let Some(passed) = self.get(direction) {
                log.record(direction, at, passed);
            }
        }
    }
}

/// Overall judgement of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizVerdict {
    AllPassed,
    SomePassed,
    AllFailed,
    NothingScored,
}

impl fmt::Display for QuizVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizVerdict::AllPassed => write!(f, "Well done! Test passed"),
            QuizVerdict::SomePassed => write!(f, "Could be better, some errors."),
            QuizVerdict::AllFailed => write!(f, "Terrible, all wrong."),
            QuizVerdict::NothingScored => write!(f, "Nothing was scored."),
        }
    }
}

/// Per-word outcome of a submitted quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub sheet_id: Uuid,
    pub outcomes: BTreeMap<String, WordOutcome>,
}

impl QuizResult {
    /// Every scored `(word, direction, passed)` triple.
    pub fn scored(&self) -> impl Iterator<Item = (&str, Direction, bool)> + '_ {
        self.outcomes.iter().flat_map(|(word, outcome)| {
            Direction::ALL
                .into_iter()
                .filter_map(move |d| outcome.get(d).map(|passed| (word.as_str(), d, passed)))
        })
    }

    pub fn passed_count(&self) -> usize {
        self.scored().filter(|(_, _, passed)| *passed).count()
    }

    pub fn scored_count(&self) -> usize {
        self.scored().count()
    }

    pub fn verdict(&self) -> QuizVerdict {
        let scored = self.scored_count();
        let passed = self.passed_count();
        if scored == 0 {
            QuizVerdict::NothingScored
        } else if passed == scored {
            QuizVerdict::AllPassed
        } else if passed > 0 {
            QuizVerdict::SomePassed
        } else {
            QuizVerdict::AllFailed
        }
    }
}

/// Grade a sheet. Questions without an answer are graded as an empty answer.
pub fn score_quiz(
    sheet: &QuizSheet,
    answers: &BTreeMap<String, Answer>,
    records: &[WordRecord],
) -> Result<QuizResult, QuizError> {
    let by_word: BTreeMap<&str, &WordRecord> =
        records.iter().map(|r| (r.word.as_str(), r)).collect();
    let unanswered = Answer::default();

    let mut outcomes: BTreeMap<String, WordOutcome> = BTreeMap::new();
    for question in &sheet.questions {
        let record = by_word
            .get(question.word.as_str())
            .ok_or_else(|| QuizError::UnknownWord(question.word.clone()))?;
        let answer = answers.get(&question.word).unwrap_or(&unanswered);
        let passed = is_correct(record, &question.prompt, answer);
        outcomes
            .entry(question.word.clone())
            .or_default()
            .set(question.prompt.direction(), passed);
    }

    Ok(QuizResult {
        sheet_id: sheet.id,
        outcomes,
    })
}

/// Timestamp practice results are logged under.
pub fn practice_timestamp(
    submitted_at: NaiveDateTime,
    backdate_days: i64,
) -> Result<NaiveDateTime, QuizError> {
    Duration::try_days(backdate_days)
        .and_then(|offset| submitted_at.checked_sub_signed(offset))
        .ok_or(QuizError::BackdateOutOfRange(backdate_days))
}
