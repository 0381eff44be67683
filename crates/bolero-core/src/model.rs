//! Core data model types for bolero.
//!
//! A [`WordRecord`] is the persisted document for one German word: its English
//! meaning, grammatical metadata, and the [`PracticeLog`] of quiz outcomes in
//! both translation directions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Placeholder persisted in unused tag and cross-reference slots.
pub const NA: &str = "NA";

/// Placeholder persisted on both sides of a missing example sentence.
pub const NO_EXAMPLE: &str = "---";

/// Number of tag slots on a record.
pub const TAG_SLOTS: usize = 3;

/// Number of cross-reference slots on a record.
pub const SEE_ALSO_SLOTS: usize = 2;

// ---------------------------------------------------------------------------
// Grammatical enumerations
// ---------------------------------------------------------------------------

/// Grammatical class of a word.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
    #[default]
    Other,
}

impl WordClass {
    pub const ALL: [WordClass; 5] = [
        WordClass::Noun,
        WordClass::Verb,
        WordClass::Adjective,
        WordClass::Adverb,
        WordClass::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WordClass::Noun => "Noun",
            WordClass::Verb => "Verb",
            WordClass::Adjective => "Adjective",
            WordClass::Adverb => "Adverb",
            WordClass::Other => "Other",
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WordClass::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "word class",
                value: s.to_string(),
            })
    }
}

/// Grammatical gender. `NotApplicable` is used for everything but nouns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
    #[default]
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Masculine,
        Gender::Feminine,
        Gender::Neuter,
        Gender::NotApplicable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculine => "Masculine",
            Gender::Feminine => "Feminine",
            Gender::Neuter => "Neuter",
            Gender::NotApplicable => NA,
        }
    }

    /// Nominative articles for this gender, if it has any.
    pub fn articles(&self) -> Option<Articles> {
        match self {
            Gender::Masculine => Some(Articles {
                definite: DefiniteArticle::Der,
                indefinite: IndefiniteArticle::Ein,
            }),
            Gender::Feminine => Some(Articles {
                definite: DefiniteArticle::Die,
                indefinite: IndefiniteArticle::Eine,
            }),
            Gender::Neuter => Some(Articles {
                definite: DefiniteArticle::Das,
                indefinite: IndefiniteArticle::Ein,
            }),
            Gender::NotApplicable => None,
        }
    }

    pub fn definite_article(&self) -> Option<DefiniteArticle> {
        self.articles().map(|a| a.definite)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "m" | "masc" => return Ok(Gender::Masculine),
            "f" | "fem" => return Ok(Gender::Feminine),
            "n" | "neut" => return Ok(Gender::Neuter),
            _ => {}
        }
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

/// Nominative definite article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefiniteArticle {
    Der,
    Die,
    Das,
}

impl DefiniteArticle {
    pub const ALL: [DefiniteArticle; 3] =
        [DefiniteArticle::Der, DefiniteArticle::Die, DefiniteArticle::Das];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefiniteArticle::Der => "Der",
            DefiniteArticle::Die => "Die",
            DefiniteArticle::Das => "Das",
        }
    }
}

impl fmt::Display for DefiniteArticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefiniteArticle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DefiniteArticle::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "article",
                value: s.to_string(),
            })
    }
}

/// Nominative indefinite article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndefiniteArticle {
    Ein,
    Eine,
}

impl fmt::Display for IndefiniteArticle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndefiniteArticle::Ein => f.write_str("Ein"),
            IndefiniteArticle::Eine => f.write_str("Eine"),
        }
    }
}

/// The article pair a gender takes in the nominative case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Articles {
    pub definite: DefiniteArticle,
    pub indefinite: IndefiniteArticle,
}

/// Grammatical person a verb is conjugated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    Ich,
    Du,
    Er,
    Wir,
    Ihr,
    Sie,
}

impl Person {
    pub const ALL: [Person; 6] = [
        Person::Ich,
        Person::Du,
        Person::Er,
        Person::Wir,
        Person::Ihr,
        Person::Sie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Person::Ich => "ich",
            Person::Du => "du",
            Person::Er => "er",
            Person::Wir => "wir",
            Person::Ihr => "ihr",
            Person::Sie => "sie",
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Person {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Person::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "person",
                value: s.to_string(),
            })
    }
}

/// Topic label attached to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Home,
    Food,
    Travel,
    Work,
    Nature,
    Body,
    Family,
    Emotion,
    Time,
    Abstract,
}

impl Tag {
    pub const ALL: [Tag; 10] = [
        Tag::Home,
        Tag::Food,
        Tag::Travel,
        Tag::Work,
        Tag::Nature,
        Tag::Body,
        Tag::Family,
        Tag::Emotion,
        Tag::Time,
        Tag::Abstract,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Home => "Home",
            Tag::Food => "Food",
            Tag::Travel => "Travel",
            Tag::Work => "Work",
            Tag::Nature => "Nature",
            Tag::Body => "Body",
            Tag::Family => "Family",
            Tag::Emotion => "Emotion",
            Tag::Time => "Time",
            Tag::Abstract => "Abstract",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "tag",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Record sub-structures
// ---------------------------------------------------------------------------

/// Present-tense conjugation, one slot per person.
///
/// Either every slot is filled or none is; [`WordDraft::into_record`] rejects
/// anything in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbForms {
    #[serde(default)]
    pub ich: Option<String>,
    #[serde(default)]
    pub du: Option<String>,
    #[serde(default)]
    pub er: Option<String>,
    #[serde(default)]
    pub wir: Option<String>,
    #[serde(default)]
    pub ihr: Option<String>,
    #[serde(default)]
    pub sie: Option<String>,
}

impl VerbForms {
    pub fn get(&self, person: Person) -> Option<&str> {
        self.slot(person).as_deref()
    }

    pub fn set(&mut self, person: Person, form: Option<String>) {
        *self.slot_mut(person) = form;
    }

    fn slot(&self, person: Person) -> &Option<String> {
        match person {
            Person::Ich => &self.ich,
            Person::Du => &self.du,
            Person::Er => &self.er,
            Person::Wir => &self.wir,
            Person::Ihr => &self.ihr,
            Person::Sie => &self.sie,
        }
    }

    fn slot_mut(&mut self, person: Person) -> &mut Option<String> {
        match person {
            Person::Ich => &mut self.ich,
            Person::Du => &mut self.du,
            Person::Er => &mut self.er,
            Person::Wir => &mut self.wir,
            Person::Ihr => &mut self.ihr,
            Person::Sie => &mut self.sie,
        }
    }

    /// True when every person has a form; this is the "has conjugation data" flag.
    pub fn is_complete(&self) -> bool {
        Person::ALL.iter().all(|p| self.get(*p).is_some())
    }

    pub fn is_empty(&self) -> bool {
        Person::ALL.iter().all(|p| self.get(*p).is_none())
    }

    /// Persons without a form.
    pub fn missing(&self) -> Vec<Person> {
        Person::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_none())
            .collect()
    }

    /// Blank strings count as absent.
    fn normalized(mut self) -> Self {
        for person in Person::ALL {
            let slot = self.slot_mut(person);
            if slot.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *slot = None;
            }
        }
        self
    }

    /// `"gehe, gehst, geht, gehen, geht, gehen"` or `---` without conjugation data.
    pub fn joined(&self) -> String {
        if !self.is_complete() {
            return NO_EXAMPLE.to_string();
        }
        Person::ALL
            .iter()
            .filter_map(|p| self.get(*p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A German example sentence with its English translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub source: String,
    pub target: String,
}

/// Translation direction of a quiz question.
///
/// `ToTarget` shows the German word and asks for English; `ToSource` shows the
/// English meaning and asks for German.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ToTarget,
    ToSource,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::ToTarget, Direction::ToSource];

    /// Key used for this direction in persisted practice data.
    pub fn key(&self) -> &'static str {
        match self {
            Direction::ToTarget => "to_eng",
            Direction::ToSource => "to_ger",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Timestamped quiz outcomes for one word, kept separately per direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeLog {
    #[serde(rename = "to_eng", default)]
    pub to_target: BTreeMap<NaiveDateTime, bool>,
    #[serde(rename = "to_ger", default)]
    pub to_source: BTreeMap<NaiveDateTime, bool>,
}

impl PracticeLog {
    pub fn direction(&self, direction: Direction) -> &BTreeMap<NaiveDateTime, bool> {
        match direction {
            Direction::ToTarget => &self.to_target,
            Direction::ToSource => &self.to_source,
        }
    }

    /// Append one outcome. A second outcome at the same instant replaces the first.
    pub fn record(&mut self, direction: Direction, at: NaiveDateTime, passed: bool) {
        let log = match direction {
            Direction::ToTarget => &mut self.to_target,
            Direction::ToSource => &mut self.to_source,
        };
        log.insert(at, passed);
    }

    pub fn is_empty(&self) -> bool {
        self.to_target.is_empty() && self.to_source.is_empty()
    }

    /// All entries of both directions.
    pub fn entries(&self) -> impl Iterator<Item = (Direction, NaiveDateTime, bool)> + '_ {
        Direction::ALL.into_iter().flat_map(move |d| {
            self.direction(d)
                .iter()
                .map(move |(at, passed)| (d, *at, *passed))
        })
    }
}

// ---------------------------------------------------------------------------
// Word record
// ---------------------------------------------------------------------------

/// One vocabulary entry, as stored in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// German spelling; unique, case-sensitive key.
    pub word: String,
    /// English meaning.
    pub meaning: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(rename = "cls")]
    pub class: WordClass,
    #[serde(default, with = "example_map")]
    pub example: Option<Example>,
    #[serde(default = "empty_slots", with = "na_slots")]
    pub tags: [Option<Tag>; TAG_SLOTS],
    #[serde(default = "empty_slots", with = "na_slots")]
    pub see_also: [Option<String>; SEE_ALSO_SLOTS],
    #[serde(default)]
    pub practice_data: PracticeLog,
    #[serde(default)]
    pub verb_forms: VerbForms,
    pub creation_date: NaiveDate,
}

fn empty_slots<T, const N: usize>() -> [Option<T>; N] {
    std::array::from_fn(|_| None)
}

impl WordRecord {
    pub fn active_tags(&self) -> Vec<Tag> {
        self.tags.iter().flatten().copied().collect()
    }

    pub fn active_see_also(&self) -> Vec<&str> {
        self.see_also.iter().flatten().map(String::as_str).collect()
    }

    /// Definite article for nouns with a gender.
    pub fn definite_article(&self) -> Option<DefiniteArticle> {
        match self.class {
            WordClass::Noun => self.gender.definite_article(),
            _ => None,
        }
    }

    /// `Das Haus` for nouns, the bare word otherwise.
    pub fn display_with_article(&self) -> String {
        match self.definite_article() {
            Some(article) => format!("{article} {}", self.word),
            None => self.word.clone(),
        }
    }
}

/// User-entered fields for a new word, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordDraft {
    pub word: String,
    pub meaning: String,
    #[serde(default, alias = "cls")]
    pub class: WordClass,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub verb_forms: VerbForms,
    #[serde(default)]
    pub example_source: Option<String>,
    #[serde(default)]
    pub example_target: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub see_also: Vec<String>,
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
}

impl WordDraft {
    /// Validate the draft and build a record with an empty practice log.
    ///
    /// `today` is used when the draft carries no creation date.
    pub fn into_record(self, today: NaiveDate) -> Result<WordRecord, ValidationError> {
        if self.word.trim().is_empty() {
            return Err(ValidationError::EmptyWord);
        }
        if self.meaning.trim().is_empty() {
            return Err(ValidationError::EmptyMeaning(self.word));
        }

        let given = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != NO_EXAMPLE)
                .map(str::to_string)
        };
        let example = match (given(&self.example_source), given(&self.example_target)) {
            (Some(source), Some(target)) => Some(Example { source, target }),
            (None, None) => None,
            _ => return Err(ValidationError::HalfExample(self.word)),
        };

        let verb_forms = self.verb_forms.normalized();
        if !verb_forms.is_empty() && !verb_forms.is_complete() {
            let missing = verb_forms
                .missing()
                .iter()
                .map(Person::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ValidationError::PartialVerbForms {
                word: self.word,
                missing,
            });
        }

        if self.tags.len() > TAG_SLOTS {
            return Err(ValidationError::TooMany {
                word: self.word,
                field: "tags",
                given: self.tags.len(),
                max: TAG_SLOTS,
            });
        }
        let see_also: Vec<String> = self
            .see_also
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != NA)
            .collect();
        if see_also.len() > SEE_ALSO_SLOTS {
            return Err(ValidationError::TooMany {
                word: self.word,
                field: "see-also entries",
                given: see_also.len(),
                max: SEE_ALSO_SLOTS,
            });
        }

        let mut tags = empty_slots::<Tag, TAG_SLOTS>();
        for (slot, tag) in tags.iter_mut().zip(self.tags) {
            *slot = Some(tag);
        }
        let mut see_also_slots = empty_slots::<String, SEE_ALSO_SLOTS>();
        for (slot, word) in see_also_slots.iter_mut().zip(see_also) {
            *slot = Some(word);
        }

        Ok(WordRecord {
            word: self.word,
            meaning: self.meaning,
            gender: self.gender,
            class: self.class,
            example,
            tags,
            see_also: see_also_slots,
            practice_data: PracticeLog::default(),
            verb_forms,
            creation_date: self.creation_date.unwrap_or(today),
        })
    }
}

impl From<&WordRecord> for WordDraft {
    fn from(record: &WordRecord) -> Self {
        Self {
            word: record.word.clone(),
            meaning: record.meaning.clone(),
            class: record.class,
            gender: record.gender,
            verb_forms: record.verb_forms.clone(),
            example_source: record.example.as_ref().map(|e| e.source.clone()),
            example_target: record.example.as_ref().map(|e| e.target.clone()),
            tags: record.active_tags(),
            see_also: record
                .active_see_also()
                .into_iter()
                .map(str::to_string)
                .collect(),
            creation_date: Some(record.creation_date),
        }
    }
}

/// Field changes for an existing word. `None` leaves a field untouched.
///
/// The word key itself cannot be changed, and the practice log always
/// survives an update.
#[derive(Debug, Clone, Default)]
pub struct WordPatch {
    pub meaning: Option<String>,
    pub class: Option<WordClass>,
    pub gender: Option<Gender>,
    pub verb_forms: VerbForms,
    pub example_source: Option<String>,
    pub example_target: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub see_also: Option<Vec<String>>,
    pub creation_date: Option<NaiveDate>,
}

impl WordPatch {
    /// Apply the patch, re-running draft validation on the merged fields.
    pub fn apply(self, record: &WordRecord) -> Result<WordRecord, ValidationError> {
        let mut draft = WordDraft::from(record);
        if let Some(meaning) = self.meaning {
            draft.meaning = meaning;
        }
        if let Some(class) = self.class {
            draft.class = class;
        }
        if let Some(gender) = self.gender {
            draft.gender = gender;
        }
        for person in Person::ALL {
            if let Some(form) = self.verb_forms.get(person) {
                draft.verb_forms.set(person, Some(form.to_string()));
            }
        }
        if self.example_source.is_some() || self.example_target.is_some() {
            draft.example_source = self.example_source;
            draft.example_target = self.example_target;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if let Some(see_also) = self.see_also {
            draft.see_also = see_also;
        }
        if let Some(date) = self.creation_date {
            draft.creation_date = Some(date);
        }

        let mut updated = draft.into_record(record.creation_date)?;
        updated.practice_data = record.practice_data.clone();
        Ok(updated)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for the persisted shape
// ---------------------------------------------------------------------------

/// `{"<german>": "<english>"}`, with `{"---": "---"}` meaning no example.
mod example_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Example, NO_EXAMPLE};

    pub fn serialize<S: Serializer>(example: &Option<Example>, s: S) -> Result<S::Ok, S::Error> {
        let mut map = BTreeMap::new();
        match example {
            Some(e) => map.insert(e.source.as_str(), e.target.as_str()),
            None => map.insert(NO_EXAMPLE, NO_EXAMPLE),
        };
        map.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Example>, D::Error> {
        let map: BTreeMap<String, String> = BTreeMap::deserialize(d)?;
        Ok(map
            .into_iter()
            .find(|(source, target)| !(source == NO_EXAMPLE && target == NO_EXAMPLE))
            .map(|(source, target)| Example { source, target }))
    }
}

/// Fixed-size slot arrays persisted as string lists with `"NA"` for empty slots.
mod na_slots {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::NA;

    pub fn serialize<S, T, const N: usize>(slots: &[Option<T>; N], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let mut seq = s.serialize_seq(Some(N))?;
        for slot in slots {
            match slot {
                Some(value) => seq.serialize_element(value)?,
                None => seq.serialize_element(NA)?,
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T, const N: usize>(d: D) -> Result<[Option<T>; N], D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw: Vec<String> = Vec::deserialize(d)?;
        let mut slots: [Option<T>; N] = std::array::from_fn(|_| None);
        for (i, value) in raw.iter().enumerate() {
            if value == NA {
                continue;
            }
            let Some(slot) = slots.get_mut(i) else {
                return Err(D::Error::custom(format!(
                    "expected at most {N} slots, found `{value}` in slot {}",
                    i + 1
                )));
            };
            *slot = Some(value.parse().map_err(D::Error::custom)?);
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn haus_draft() -> WordDraft {
        WordDraft {
            word: "Haus".into(),
            meaning: "house".into(),
            class: WordClass::Noun,
            gender: Gender::Neuter,
            ..Default::default()
        }
    }

    #[test]
    fn gender_article_lookup() {
        assert_eq!(Gender::Masculine.definite_article(), Some(DefiniteArticle::Der));
        assert_eq!(Gender::Feminine.definite_article(), Some(DefiniteArticle::Die));
        assert_eq!(Gender::Neuter.definite_article(), Some(DefiniteArticle::Das));
        assert_eq!(Gender::NotApplicable.articles(), None);
        assert_eq!(
            Gender::Feminine.articles().unwrap().indefinite,
            IndefiniteArticle::Eine
        );
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("noun".parse::<WordClass>().unwrap(), WordClass::Noun);
        assert_eq!("NA".parse::<Gender>().unwrap(), Gender::NotApplicable);
        assert_eq!("n".parse::<Gender>().unwrap(), Gender::Neuter);
        assert_eq!("das".parse::<DefiniteArticle>().unwrap(), DefiniteArticle::Das);
        assert_eq!("WIR".parse::<Person>().unwrap(), Person::Wir);
        assert!("Pronoun".parse::<WordClass>().is_err());
        assert!("food".parse::<Tag>().is_ok());
    }

    #[test]
    fn draft_becomes_record_with_empty_log() {
        let record = haus_draft().into_record(date(2024, 3, 1)).unwrap();
        assert_eq!(record.creation_date, date(2024, 3, 1));
        assert!(record.practice_data.is_empty());
        assert_eq!(record.display_with_article(), "Das Haus");
        assert!(record.example.is_none());
    }

    #[test]
    fn half_example_is_rejected() {
        let draft = WordDraft {
            example_source: Some("Das Haus ist alt.".into()),
            example_target: Some(NO_EXAMPLE.into()),
            ..haus_draft()
        };
        assert_eq!(
            draft.into_record(date(2024, 3, 1)),
            Err(ValidationError::HalfExample("Haus".into()))
        );
    }

    #[test]
    fn partial_verb_forms_are_rejected() {
        let mut forms = VerbForms::default();
        forms.set(Person::Ich, Some("gehe".into()));
        forms.set(Person::Du, Some("  ".into()));
        let draft = WordDraft {
            word: "gehen".into(),
            meaning: "to go".into(),
            class: WordClass::Verb,
            verb_forms: forms,
            ..Default::default()
        };
        let err = draft.into_record(date(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::PartialVerbForms { ref missing, .. } if missing.starts_with("du")));
    }

    #[test]
    fn too_many_tags_rejected() {
        let draft = WordDraft {
            tags: vec![Tag::Home, Tag::Food, Tag::Work, Tag::Time],
            ..haus_draft()
        };
        assert!(matches!(
            draft.into_record(date(2024, 3, 1)),
            Err(ValidationError::TooMany { field: "tags", .. })
        ));
    }

    #[test]
    fn patch_keeps_practice_history() {
        let mut record = haus_draft().into_record(date(2024, 3, 1)).unwrap();
        let at = date(2024, 3, 2).and_hms_opt(9, 0, 0).unwrap();
        record.practice_data.record(Direction::ToTarget, at, true);

        let patch = WordPatch {
            meaning: Some("building".into()),
            tags: Some(vec![Tag::Home]),
            ..Default::default()
        };
        let updated = patch.apply(&record).unwrap();
        assert_eq!(updated.meaning, "building");
        assert_eq!(updated.active_tags(), vec![Tag::Home]);
        assert_eq!(updated.practice_data.to_target.get(&at), Some(&true));
        assert_eq!(updated.creation_date, record.creation_date);
    }

    #[test]
    fn persisted_shape_matches_document_layout() {
        let json = r#"{
            "word": "gehen",
            "meaning": "to go",
            "gender": "NA",
            "cls": "Verb",
            "example": {"Ich gehe nach Hause.": "I am going home."},
            "tags": ["Travel", "NA", "NA"],
            "see_also": ["laufen", "NA"],
            "practice_data": {
                "to_ger": {"2023-04-05T10:00:00.123456": false},
                "to_eng": {"2023-04-05T10:00:00": true}
            },
            "verb_forms": {"ich": "gehe", "du": "gehst", "er": "geht",
                           "wir": "gehen", "ihr": "geht", "sie": "gehen"},
            "creation_date": "2023-04-01"
        }"#;
        let record: WordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.class, WordClass::Verb);
        assert_eq!(record.gender, Gender::NotApplicable);
        assert_eq!(record.active_tags(), vec![Tag::Travel]);
        assert_eq!(record.active_see_also(), vec!["laufen"]);
        assert_eq!(record.example.as_ref().unwrap().target, "I am going home.");
        assert!(record.verb_forms.is_complete());
        assert_eq!(record.verb_forms.get(Person::Wir), Some("gehen"));
        assert_eq!(record.practice_data.to_source.len(), 1);
        assert_eq!(record.practice_data.to_target.len(), 1);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["cls"], "Verb");
        assert_eq!(value["tags"], serde_json::json!(["Travel", "NA", "NA"]));
        assert_eq!(value["practice_data"]["to_eng"]["2023-04-05T10:00:00"], true);
    }

    #[test]
    fn slot_positions_survive_a_round_trip() {
        let json = r#"{
            "word": "Wohnung",
            "meaning": "flat",
            "gender": "Feminine",
            "cls": "Noun",
            "tags": ["NA", "Home", "NA"],
            "see_also": ["NA", "Haus"],
            "creation_date": "2023-04-01"
        }"#;
        let record: WordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tags, [None, Some(Tag::Home), None]);
        assert_eq!(record.active_see_also(), vec!["Haus"]);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tags"], serde_json::json!(["NA", "Home", "NA"]));
        assert_eq!(value["see_also"], serde_json::json!(["NA", "Haus"]));
    }

    #[test]
    fn value_past_the_last_slot_is_rejected() {
        let json = r#"{
            "word": "Haus",
            "meaning": "house",
            "cls": "Noun",
            "see_also": ["NA", "NA", "Wohnung"],
            "creation_date": "2023-04-01"
        }"#;
        let err = serde_json::from_str::<WordRecord>(json).unwrap_err();
        assert!(err.to_string().contains("at most 2 slots"));

        let padded = r#"{
            "word": "Haus",
            "meaning": "house",
            "cls": "Noun",
            "see_also": ["Wohnung", "NA", "NA"],
            "creation_date": "2023-04-01"
        }"#;
        let record: WordRecord = serde_json::from_str(padded).unwrap();
        assert_eq!(record.active_see_also(), vec!["Wohnung"]);
    }

    #[test]
    fn missing_example_uses_sentinel() {
        let record = haus_draft().into_record(date(2024, 3, 1)).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["example"], serde_json::json!({"---": "---"}));

        let back: WordRecord = serde_json::from_value(value).unwrap();
        assert!(back.example.is_none());
    }
}
