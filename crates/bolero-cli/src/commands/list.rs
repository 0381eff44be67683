//! The `bolero list` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use bolero_core::reporting::vocabulary_overview;

pub fn execute(config_path: Option<&Path>, store: Option<PathBuf>) -> Result<()> {
    let session = super::open(config_path, store)?;
    let records = session.engine.snapshot()?;
    if records.is_empty() {
        println!("No words stored yet. Add some with `bolero add` or `bolero import`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Word", "Meaning", "Class", "Gender", "Forms", "Tags", "See also", "Added", "DE→EN",
        "EN→DE",
    ]);
    for row in vocabulary_overview(&records) {
        table.add_row(vec![
            Cell::new(&row.word),
            Cell::new(&row.meaning),
            Cell::new(row.class),
            Cell::new(row.gender),
            Cell::new(&row.verb_forms),
            Cell::new(&row.tags),
            Cell::new(&row.see_also),
            Cell::new(row.creation_date),
            Cell::new(format!("{:.2}", row.to_target)),
            Cell::new(format!("{:.2}", row.to_source)),
        ]);
    }

    println!("{table}");
    println!("{} word(s)", records.len());
    Ok(())
}
