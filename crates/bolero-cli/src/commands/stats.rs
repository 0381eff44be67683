//! The `bolero stats` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use bolero_core::statistics::{round2, DifficultyRanking, DifficultyTier};

pub fn execute(config_path: Option<&Path>, store: Option<PathBuf>, format: String) -> Result<()> {
    let session = super::open(config_path, store)?;
    let ranking = session.engine.ranking()?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        }
        "text" => print_ranking(&ranking),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_ranking(ranking: &DifficultyRanking) {
    let Some(thresholds) = ranking.thresholds() else {
        println!("No words stored yet.");
        return;
    };

    let mut table = Table::new();
    table.set_header(vec!["Word", "Average", "DE→EN", "EN→DE", "Difficulty"]);
    for row in ranking.rows() {
        table.add_row(vec![
            Cell::new(&row.word),
            Cell::new(format!("{:.2}", row.average)),
            Cell::new(format!("{:.2}", row.to_target)),
            Cell::new(format!("{:.2}", row.to_source)),
            Cell::new(row.tier),
        ]);
    }
    println!("{table}");

    println!(
        "\nThresholds: Difficult <= {:.2} < Medium <= {:.2} < Easy",
        round2(thresholds.difficult),
        round2(thresholds.easy)
    );
    let counts = ranking.tier_counts();
    let summary: Vec<String> = DifficultyTier::ALL
        .iter()
        .map(|tier| format!("{tier}: {}", counts.get(tier).copied().unwrap_or(0)))
        .collect();
    println!("{}", summary.join(", "));
}
