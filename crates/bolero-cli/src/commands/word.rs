//! The `bolero add` and `bolero update` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use bolero_core::error::WordError;
use bolero_core::model::{
    Gender, Person, Tag, VerbForms, WordClass, WordDraft, WordPatch, WordRecord,
};

/// Present-tense forms, one flag per person.
#[derive(Args, Debug, Default)]
pub struct VerbFormArgs {
    #[arg(long)]
    pub ich: Option<String>,
    #[arg(long)]
    pub du: Option<String>,
    #[arg(long)]
    pub er: Option<String>,
    #[arg(long)]
    pub wir: Option<String>,
    #[arg(long)]
    pub ihr: Option<String>,
    #[arg(long)]
    pub sie: Option<String>,
}

impl VerbFormArgs {
    fn into_forms(self) -> VerbForms {
        let mut forms = VerbForms::default();
        let given = [self.ich, self.du, self.er, self.wir, self.ihr, self.sie];
        for (person, form) in Person::ALL.into_iter().zip(given) {
            forms.set(person, form);
        }
        forms
    }
}

/// Fields for `bolero add`.
#[derive(Args, Debug)]
pub struct NewWordArgs {
    /// German word
    #[arg(long)]
    pub word: String,

    /// English meaning
    #[arg(long)]
    pub meaning: String,

    /// Word class: Noun, Verb, Adjective, Adverb, Other
    #[arg(long, default_value = "Other")]
    pub class: WordClass,

    /// Gender for nouns: Masculine, Feminine, Neuter (or m/f/n)
    #[arg(long, default_value = "NA")]
    pub gender: Gender,

    #[command(flatten)]
    pub verb_forms: VerbFormArgs,

    /// German example sentence
    #[arg(long, requires = "example_target")]
    pub example_source: Option<String>,

    /// English translation of the example
    #[arg(long, requires = "example_source")]
    pub example_target: Option<String>,

    /// Topic tag (repeatable, up to 3)
    #[arg(long = "tag")]
    pub tags: Vec<Tag>,

    /// Related German word (repeatable, up to 2)
    #[arg(long)]
    pub see_also: Vec<String>,

    /// Creation date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl From<NewWordArgs> for WordDraft {
    fn from(args: NewWordArgs) -> Self {
        WordDraft {
            word: args.word,
            meaning: args.meaning,
            class: args.class,
            gender: args.gender,
            verb_forms: args.verb_forms.into_forms(),
            example_source: args.example_source,
            example_target: args.example_target,
            tags: args.tags,
            see_also: args.see_also,
            creation_date: args.date,
        }
    }
}

/// Optional fields for `bolero update`; anything not given stays as stored.
#[derive(Args, Debug)]
pub struct WordFieldArgs {
    /// English meaning
    #[arg(long)]
    pub meaning: Option<String>,

    /// Word class
    #[arg(long)]
    pub class: Option<WordClass>,

    /// Gender
    #[arg(long)]
    pub gender: Option<Gender>,

    #[command(flatten)]
    pub verb_forms: VerbFormArgs,

    /// German example sentence
    #[arg(long, requires = "example_target")]
    pub example_source: Option<String>,

    /// English translation of the example
    #[arg(long, requires = "example_source")]
    pub example_target: Option<String>,

    /// Replace the tags (repeatable, up to 3)
    #[arg(long = "tag")]
    pub tags: Vec<Tag>,

    /// Remove every tag
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,

    /// Replace the related words (repeatable, up to 2)
    #[arg(long)]
    pub see_also: Vec<String>,

    /// Remove every related word
    #[arg(long, conflicts_with = "see_also")]
    pub clear_see_also: bool,

    /// Creation date
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl From<WordFieldArgs> for WordPatch {
    fn from(args: WordFieldArgs) -> Self {
        let replace = |given: bool, clear: bool| given || clear;
        WordPatch {
            meaning: args.meaning,
            class: args.class,
            gender: args.gender,
            verb_forms: args.verb_forms.into_forms(),
            example_source: args.example_source,
            example_target: args.example_target,
            tags: replace(!args.tags.is_empty(), args.clear_tags).then_some(args.tags),
            see_also: replace(!args.see_also.is_empty(), args.clear_see_also)
                .then_some(args.see_also),
            creation_date: args.date,
        }
    }
}

pub fn add(config_path: Option<&Path>, store: Option<PathBuf>, args: NewWordArgs) -> Result<()> {
    let session = super::open(config_path, store)?;
    let record = session
        .engine
        .add_word(args.into(), super::today())
        .map_err(describe)?;
    print_record("Added", &record);
    Ok(())
}

pub fn update(
    config_path: Option<&Path>,
    store: Option<PathBuf>,
    word: String,
    fields: WordFieldArgs,
) -> Result<()> {
    let session = super::open(config_path, store)?;
    let record = session
        .engine
        .update_word(&word, fields.into())
        .map_err(describe)
        .with_context(|| format!("failed to update '{word}'"))?;
    print_record("Updated", &record);
    Ok(())
}

fn describe(e: WordError) -> anyhow::Error {
    match e {
        WordError::Store(e) if e.is_not_found() => {
            anyhow::anyhow!("{e}, add it first with `bolero add`")
        }
        other => other.into(),
    }
}

fn print_record(action: &str, record: &WordRecord) {
    println!("{action} {} = {}", record.display_with_article(), record.meaning);
    println!("  class: {}, gender: {}", record.class, record.gender);
    if record.verb_forms.is_complete() {
        println!("  forms: {}", record.verb_forms.joined());
    }
    if let Some(example) = &record.example {
        println!("  example: {} / {}", example.source, example.target);
    }
    let tags = record.active_tags();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(Tag::to_string).collect();
        println!("  tags: {}", tags.join(", "));
    }
    let see_also = record.active_see_also();
    if !see_also.is_empty() {
        println!("  see also: {}", see_also.join(", "));
    }
}
