//! The `bolero report` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use bolero_core::reporting::{build_dashboard, ClassBreakdown, Dashboard};

use super::percent;

pub fn execute(
    config_path: Option<&Path>,
    store: Option<PathBuf>,
    since: Option<NaiveDate>,
    last_failures: Option<usize>,
    format: String,
) -> Result<()> {
    let session = super::open(config_path, store)?;
    let records = session.engine.snapshot()?;
    let today = super::today();
    let start = since.unwrap_or(session.config.report_start_date);
    let limit = last_failures.unwrap_or(session.config.last_failures_limit);
    if start > today {
        anyhow::bail!("--since {start} is after today ({today})");
    }
    if limit == 0 {
        anyhow::bail!("--last-failures must be at least 1");
    }

    let dashboard = build_dashboard(&records, start, today, limit);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
        }
        "text" => print_dashboard(&dashboard, start, today),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_dashboard(dashboard: &Dashboard, start: NaiveDate, today: NaiveDate) {
    println!("Results by word class");
    let mut classes = Table::new();
    classes.set_header(vec![
        "Class",
        "Right DE→EN",
        "Fail DE→EN",
        "Right EN→DE",
        "Fail EN→DE",
    ]);
    for (class, breakdown) in &dashboard.classes {
        match breakdown {
            ClassBreakdown::NoData => {
                classes.add_row(vec![
                    Cell::new(class),
                    Cell::new("Not enough data"),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            ClassBreakdown::Counts(counts) => {
                let shares = counts.shares();
                let values = [
                    counts.right_to_target,
                    counts.fail_to_target,
                    counts.right_to_source,
                    counts.fail_to_source,
                ];
                let mut row = vec![Cell::new(class)];
                row.extend(
                    values
                        .iter()
                        .zip(shares)
                        .map(|(n, share)| Cell::new(format!("{n} ({})", percent(share)))),
                );
                classes.add_row(row);
            }
        }
    }
    println!("{classes}");

    println!("\nPractice per day ({start} to {today})");
    if dashboard.daily.is_empty() {
        println!("No practice in this period.");
    } else {
        let mut daily = Table::new();
        daily.set_header(vec![
            "Date",
            "Success DE→EN",
            "Failure DE→EN",
            "Success EN→DE",
            "Failure EN→DE",
            "New words",
        ]);
        for day in &dashboard.daily {
            daily.add_row(vec![
                Cell::new(day.date),
                Cell::new(day.success_to_target),
                Cell::new(day.failure_to_target),
                Cell::new(day.success_to_source),
                Cell::new(day.failure_to_source),
                Cell::new(day.new_words_added),
            ]);
        }
        println!("{daily}");
    }

    println!("\nLast failures");
    let mut failures = Table::new();
    failures.set_header(vec!["Word", "Meaning", "Last failure"]);
    for failure in &dashboard.last_failures {
        let when = if failure.never_failed() {
            "never".to_string()
        } else {
            failure.last_failure.format("%Y-%m-%d %H:%M").to_string()
        };
        failures.add_row(vec![
            Cell::new(&failure.word),
            Cell::new(&failure.meaning),
            Cell::new(when),
        ]);
    }
    println!("{failures}");
}
