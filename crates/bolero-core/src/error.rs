//! Domain error types.
//!
//! Defined in `bolero-core` so that the engine and the CLI can tell a missing
//! word apart from an I/O failure without string matching.

use thiserror::Error;

/// A word record failed validation. Nothing is persisted when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The word key is empty or whitespace.
    #[error("word must not be empty")]
    EmptyWord,

    /// The meaning is empty or whitespace.
    #[error("meaning of '{0}' must not be empty")]
    EmptyMeaning(String),

    /// Only one side of the example sentence pair was given.
    #[error("example for '{0}' must be given in both German and English")]
    HalfExample(String),

    /// Some but not all verb persons were given.
    #[error("verb forms for '{word}' are incomplete, missing: {missing}")]
    PartialVerbForms { word: String, missing: String },

    /// More tags or cross references than the record has slots for.
    #[error("'{word}' has {given} {field}, at most {max} allowed")]
    TooMany {
        word: String,
        field: &'static str,
        given: usize,
        max: usize,
    },

    /// A label could not be parsed into its enumeration.
    #[error("unknown {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },
}

/// Errors returned by a [`WordRepository`](crate::traits::WordRepository).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists under the requested key.
    #[error("word not found: {0}")]
    NotFound(String),

    /// The backing document could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(String),

    /// The backing document could not be (de)serialized.
    #[error("storage document is malformed: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns `true` if the error only means the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Errors from quiz generation and scoring.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The filters left nothing to draw from.
    #[error("no words match the selected class and difficulty")]
    NoCandidates,

    /// Requested size is outside `2..=candidates`.
    #[error("quiz size must be between 2 and {available}, got {requested}")]
    SizeOutOfRange { requested: usize, available: usize },

    /// A quiz sheet names a word the vocabulary no longer contains.
    #[error("quiz refers to unknown word: {0}")]
    UnknownWord(String),

    /// Backdating by this many days leaves the calendar range.
    #[error("cannot backdate practice results by {0} days")]
    BackdateOutOfRange(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from adding or editing a word.
#[derive(Debug, Error)]
pub enum WordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `add` was called for a word key that is already stored.
    #[error("word already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
