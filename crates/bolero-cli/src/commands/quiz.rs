//! The `bolero quiz` commands.
//!
//! `quiz new` writes a JSON sheet with an empty `answer` per question. Fill in
//! `{"text": "..."}` (plus `"article": "Der" | "Die" | "Das"` for nouns asked
//! English → German) and hand the sheet to `quiz submit`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bolero_core::model::{Direction, WordClass};
use bolero_core::quiz::{default_seed, expected_answer, Answer, QuizRequest, QuizSheet};
use bolero_core::statistics::DifficultyTier;

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::ToTarget => "DE→EN",
        Direction::ToSource => "EN→DE",
    }
}

#[allow(clippy::too_many_arguments)]
pub fn new(
    config_path: Option<&Path>,
    store: Option<PathBuf>,
    size: usize,
    class: Option<WordClass>,
    difficulty: Option<DifficultyTier>,
    seed: Option<u64>,
    out: PathBuf,
) -> Result<()> {
    let session = super::open(config_path, store)?;
    let seed = seed.unwrap_or_else(|| default_seed(super::today()));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let request = QuizRequest {
        class,
        difficulty,
        size,
    };
    let sheet = session
        .engine
        .generate_quiz(&request, super::now(), &mut rng)
        .context("failed to generate quiz")?;
    sheet.save_json(&out)?;
    tracing::info!(id = %sheet.id, seed, "quiz sheet written to {}", out.display());

    let mut table = Table::new();
    table.set_header(vec!["#", "Direction", "Question", "Answer with"]);
    for (i, question) in sheet.questions.iter().enumerate() {
        let hint = if question.prompt.asks_article() {
            "article + word"
        } else {
            "text"
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(direction_label(question.prompt.direction())),
            Cell::new(question.prompt.label()),
            Cell::new(hint),
        ]);
    }
    println!("{table}");
    println!(
        "\nFill in the answers in {} and run: bolero quiz submit --sheet {}",
        out.display(),
        out.display()
    );

    Ok(())
}

pub fn submit(
    config_path: Option<&Path>,
    store: Option<PathBuf>,
    sheet_path: PathBuf,
) -> Result<()> {
    let session = super::open(config_path, store)?;
    let sheet = QuizSheet::load_json(&sheet_path)?;
    let answers = sheet.answers();
    let unanswered = sheet.questions.len().saturating_sub(answers.len());
    if unanswered > 0 {
        tracing::warn!(unanswered, "unanswered questions are graded as wrong");
    }

    let submission = session
        .engine
        .submit(&sheet, &answers, super::now())
        .context("failed to submit quiz")?;
    let records = session.engine.snapshot()?;

    let mut table = Table::new();
    table.set_header(vec![
        "Direction",
        "Question",
        "Your answer",
        "Expected",
        "Result",
    ]);
    for question in &sheet.questions {
        let Some(record) = records.iter().find(|r| r.word == question.word) else {
            continue;
        };
        let passed = submission
            .result
            .outcomes
            .get(&question.word)
            .and_then(|o| o.get(question.prompt.direction()))
            .unwrap_or(false);
        table.add_row(vec![
            Cell::new(direction_label(question.prompt.direction())),
            Cell::new(question.prompt.label()),
            Cell::new(given_answer(answers.get(&question.word))),
            Cell::new(expected_answer(record, &question.prompt)),
            Cell::new(if passed { "right" } else { "wrong" }),
        ]);
    }
    println!("{table}");

    println!(
        "\n{}/{} correct. {}",
        submission.result.passed_count(),
        submission.result.scored_count(),
        submission.result.verdict()
    );
    println!(
        "Results logged at {}.",
        submission.logged_at.format("%Y-%m-%d %H:%M")
    );

    Ok(())
}

fn given_answer(answer: Option<&Answer>) -> String {
    match answer {
        Some(Answer {
            text,
            article: Some(article),
        }) => format!("{article} {text}"),
        Some(Answer { text, .. }) => text.clone(),
        None => "-".to_string(),
    }
}
