//! The `bolero validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use bolero_core::parser::{load_vocabulary, validate_vocabulary};

pub fn execute(config_path: Option<&Path>, store: Option<PathBuf>, file: PathBuf) -> Result<()> {
    let drafts = load_vocabulary(&file)?;
    println!("Vocabulary: {} ({} words)", file.display(), drafts.len());

    // Stored words count as known see-also targets
    let stored = super::open(config_path, store).and_then(|s| Ok(s.engine.snapshot()?));
    let existing = match stored {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("checking without stored words: {e:#}");
            Vec::new()
        }
    };

    let warnings = validate_vocabulary(&drafts, &existing);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.word, w.message);
    }

    if warnings.is_empty() {
        println!("All words valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
