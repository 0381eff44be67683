//! TOML vocabulary parser.
//!
//! Loads word lists from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{Gender, Tag, VerbForms, WordClass, WordDraft, WordRecord};

/// Intermediate TOML structure for parsing vocabulary files.
#[derive(Debug, Deserialize)]
struct TomlVocabularyFile {
    #[serde(default)]
    words: Vec<TomlWord>,
}

#[derive(Debug, Deserialize)]
struct TomlWord {
    word: String,
    meaning: String,
    #[serde(default, alias = "cls")]
    class: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    verb_forms: Option<VerbForms>,
    #[serde(default)]
    example: Option<TomlExample>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    see_also: Vec<String>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlExample {
    source: String,
    target: String,
}

/// Parse a single TOML file into word drafts.
pub fn parse_vocabulary(path: &Path) -> Result<Vec<WordDraft>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary file: {}", path.display()))?;

    parse_vocabulary_str(&content, path)
}

/// Parse a TOML string into word drafts (useful for testing).
pub fn parse_vocabulary_str(content: &str, source_path: &Path) -> Result<Vec<WordDraft>> {
    let parsed: TomlVocabularyFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    parsed
        .words
        .into_iter()
        .map(|w| -> Result<WordDraft> {
            let class = match w.class {
                Some(c) => c
                    .parse::<WordClass>()
                    .with_context(|| format!("word '{}'", w.word))?,
                None => WordClass::default(),
            };
            let gender = match w.gender {
                Some(g) => g
                    .parse::<Gender>()
                    .with_context(|| format!("word '{}'", w.word))?,
                None => Gender::default(),
            };
            let tags = w
                .tags
                .iter()
                .map(|t| t.parse::<Tag>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("word '{}'", w.word))?;
            let creation_date = w
                .created
                .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
                .transpose()
                .with_context(|| format!("invalid creation date for '{}'", w.word))?;

            Ok(WordDraft {
                word: w.word,
                meaning: w.meaning,
                class,
                gender,
                verb_forms: w.verb_forms.unwrap_or_default(),
                example_source: w.example.as_ref().map(|e| e.source.clone()),
                example_target: w.example.map(|e| e.target),
                tags,
                see_also: w.see_also,
                creation_date,
            })
        })
        .collect()
}

/// Recursively load all `.toml` vocabulary files from a directory.
pub fn load_vocabulary_directory(dir: &Path) -> Result<Vec<WordDraft>> {
    let mut drafts = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            drafts.extend(load_vocabulary_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_vocabulary(&path) {
                Ok(words) => drafts.extend(words),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(drafts)
}

/// Load a file or, for a directory, every vocabulary file below it.
pub fn load_vocabulary(path: &Path) -> Result<Vec<WordDraft>> {
    if path.is_dir() {
        load_vocabulary_directory(path)
    } else {
        parse_vocabulary(path)
    }
}

/// A warning from vocabulary validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The word the warning is about.
    pub word: String,
    /// Warning message.
    pub message: String,
}

/// Check drafts for common issues before import.
///
/// `existing` is the stored vocabulary; see-also references may point at
/// words in either set.
pub fn validate_vocabulary(
    drafts: &[WordDraft],
    existing: &[WordRecord],
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |warnings: &mut Vec<ValidationWarning>, word: &str, message: String| {
        warnings.push(ValidationWarning {
            word: word.to_string(),
            message,
        })
    };

    // Duplicate word keys within the file set
    let mut seen = HashSet::new();
    for draft in drafts {
        if !seen.insert(draft.word.as_str()) {
            warn(&mut warnings, &draft.word, format!("duplicate word: {}", draft.word));
        }
    }

    let known: HashSet<&str> = seen
        .iter()
        .copied()
        .chain(existing.iter().map(|r| r.word.as_str()))
        .collect();

    for draft in drafts {
        // Anything the record constructor would reject
        if let Err(e) = draft.clone().into_record(NaiveDate::default()) {
            warn(&mut warnings, &draft.word, e.to_string());
        }

        for reference in &draft.see_also {
            if !known.contains(reference.as_str()) {
                warn(
                    &mut warnings,
                    &draft.word,
                    format!("see-also refers to unknown word: {reference}"),
                );
            }
        }

        match (draft.class, draft.gender) {
            (WordClass::Noun, Gender::NotApplicable) => warn(
                &mut warnings,
                &draft.word,
                "noun has no gender, article questions will expect none".into(),
            ),
            (WordClass::Noun, _) => {}
            (_, Gender::NotApplicable) => {}
            (class, gender) => warn(
                &mut warnings,
                &draft.word,
                format!("{class} carries gender {gender}, which is only used for nouns"),
            ),
        }

        if draft.class == WordClass::Verb && draft.verb_forms.is_empty() {
            warn(
                &mut warnings,
                &draft.word,
                "verb has no conjugation, it will be asked as a plain translation".into(),
            );
        }
    }

    warnings
}
