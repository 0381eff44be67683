//! The `bolero import` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use bolero_core::parser::load_vocabulary;

pub fn execute(
    config_path: Option<&Path>,
    store: Option<PathBuf>,
    file: PathBuf,
    replace: bool,
) -> Result<()> {
    let session = super::open(config_path, store)?;
    let drafts = load_vocabulary(&file)?;
    if drafts.is_empty() {
        println!("No words found in {}.", file.display());
        return Ok(());
    }

    let summary = session.engine.import(drafts, super::today(), replace)?;

    println!(
        "Imported {} new, {} updated, {} skipped.",
        summary.added.len(),
        summary.updated.len(),
        summary.skipped.len()
    );
    for (word, reason) in &summary.skipped {
        println!("  [{word}] skipped: {reason}");
    }

    Ok(())
}
