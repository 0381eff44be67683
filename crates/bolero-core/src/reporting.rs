//! Dashboard aggregations over the practice logs.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{Direction, Gender, WordClass, WordRecord, NO_EXAMPLE};
use crate::statistics::{round2, WordStats};

/// Outcome counts for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    pub date: NaiveDate,
    pub success_to_target: u32,
    pub failure_to_target: u32,
    pub success_to_source: u32,
    pub failure_to_source: u32,
    /// Words whose creation date is this day.
    pub new_words_added: u32,
}

impl DailyCounts {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            success_to_target: 0,
            failure_to_target: 0,
            success_to_source: 0,
            failure_to_source: 0,
            new_words_added: 0,
        }
    }

    fn bump(&mut self, direction: Direction, passed: bool) {
        let counter = match (direction, passed) {
            (Direction::ToTarget, true) => &mut self.success_to_target,
            (Direction::ToTarget, false) => &mut self.failure_to_target,
            (Direction::ToSource, true) => &mut self.success_to_source,
            (Direction::ToSource, false) => &mut self.failure_to_source,
        };
        *counter += 1;
    }

    /// Practice events on this day, not counting new words.
    pub fn practice_events(&self) -> u32 {
        self.success_to_target
            + self.failure_to_target
            + self.success_to_source
            + self.failure_to_source
    }
}

/// Daily success/failure counts per direction from `start` through `today`.
///
/// Days without any practice event are left out even when words were added
/// on them. Events outside the range are ignored.
pub fn by_date_direction_counts(
    records: &[WordRecord],
    start: NaiveDate,
    today: NaiveDate,
) -> Vec<DailyCounts> {
    let mut days: BTreeMap<NaiveDate, DailyCounts> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, DailyCounts::empty(d)))
        .collect();

    let mut skipped = 0usize;
    for record in records {
        for (direction, at, passed) in record.practice_data.entries() {
            match days.get_mut(&at.date()) {
                Some(day) => day.bump(direction, passed),
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, %start, %today, "practice entries outside report range");
    }

    for record in records {
        if let Some(day) = days.get_mut(&record.creation_date) {
            day.new_words_added += 1;
        }
    }

    days.into_values()
        .filter(|d| d.practice_events() > 0)
        .collect()
}

/// Most recent failure of one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastFailure {
    pub word: String,
    pub meaning: String,
    /// 1970-01-01T00:00:00 when the word was never answered wrongly.
    pub last_failure: NaiveDateTime,
}

impl LastFailure {
    pub fn never_failed(&self) -> bool {
        self.last_failure == NaiveDateTime::default()
    }
}

/// The `limit` most recently failed words, least recent first.
///
/// Words without failures sort as if they failed at the Unix epoch, so they
/// only show up when fewer than `limit` words have failed.
pub fn last_failures_per_word(records: &[WordRecord], limit: usize) -> Vec<LastFailure> {
    let mut failures: Vec<LastFailure> = records
        .iter()
        .map(|record| LastFailure {
            word: record.word.clone(),
            meaning: record.meaning.clone(),
            last_failure: record
                .practice_data
                .entries()
                .filter(|(_, _, passed)| !passed)
                .map(|(_, at, _)| at)
                .max()
                .unwrap_or_default(),
        })
        .collect();

    failures.sort_by(|a, b| {
        a.last_failure
            .cmp(&b.last_failure)
            .then_with(|| a.word.cmp(&b.word))
    });
    let skip = failures.len().saturating_sub(limit);
    failures.split_off(skip)
}

/// Summed outcomes for one word class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub right_to_target: u32,
    pub fail_to_target: u32,
    pub right_to_source: u32,
    pub fail_to_source: u32,
}

impl ClassCounts {
    pub fn total(&self) -> u32 {
        self.right_to_target + self.fail_to_target + self.right_to_source + self.fail_to_source
    }

    /// Share of each count in the total, in field order.
    pub fn shares(&self) -> [f64; 4] {
        let total = self.total().max(1) as f64;
        [
            self.right_to_target as f64 / total,
            self.fail_to_target as f64 / total,
            self.right_to_source as f64 / total,
            self.fail_to_source as f64 / total,
        ]
    }
}

/// Per-class rollup; `NoData` when nothing of that class was ever practiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassBreakdown {
    NoData,
    Counts(ClassCounts),
}

/// Right/fail sums per word class, for every class in [`WordClass::ALL`].
pub fn class_breakdown(stats: &[WordStats]) -> Vec<(WordClass, ClassBreakdown)> {
    WordClass::ALL
        .into_iter()
        .map(|class| {
            let counts = stats.iter().filter(|s| s.class == class).fold(
                ClassCounts {
                    right_to_target: 0,
                    fail_to_target: 0,
                    right_to_source: 0,
                    fail_to_source: 0,
                },
                |acc, s| ClassCounts {
                    right_to_target: acc.right_to_target + s.to_target.right,
                    fail_to_target: acc.fail_to_target + s.to_target.fail,
                    right_to_source: acc.right_to_source + s.to_source.right,
                    fail_to_source: acc.fail_to_source + s.to_source.fail,
                },
            );
            let breakdown = if counts.total() == 0 {
                ClassBreakdown::NoData
            } else {
                ClassBreakdown::Counts(counts)
            };
            (class, breakdown)
        })
        .collect()
}

/// One line of the vocabulary overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub word: String,
    pub meaning: String,
    pub class: WordClass,
    pub gender: Gender,
    /// Comma-joined conjugation or `---`.
    pub verb_forms: String,
    /// Comma-joined tags or `---`.
    pub tags: String,
    /// Comma-joined cross references or `---`.
    pub see_also: String,
    pub creation_date: NaiveDate,
    /// Success ratio German to English, rounded to two decimals.
    pub to_target: f64,
    /// Success ratio English to German, rounded to two decimals.
    pub to_source: f64,
}

/// Overview of every word, sorted case-insensitively.
pub fn vocabulary_overview(records: &[WordRecord]) -> Vec<OverviewRow> {
    let or_dashes = |items: Vec<String>| {
        if items.is_empty() {
            NO_EXAMPLE.to_string()
        } else {
            items.join(", ")
        }
    };

    let mut rows: Vec<OverviewRow> = records
        .iter()
        .map(|record| {
            let stats = WordStats::from_record(record);
            OverviewRow {
                word: record.word.clone(),
                meaning: record.meaning.clone(),
                class: record.class,
                gender: record.gender,
                verb_forms: record.verb_forms.joined(),
                tags: or_dashes(record.active_tags().iter().map(|t| t.to_string()).collect()),
                see_also: or_dashes(
                    record
                        .active_see_also()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                ),
                creation_date: record.creation_date,
                to_target: round2(stats.to_target.success_ratio),
                to_source: round2(stats.to_source.success_ratio),
            }
        })
        .collect();
    rows.sort_by_key(|r| r.word.to_lowercase());
    rows
}

/// Everything the reporting dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub classes: Vec<(WordClass, ClassBreakdown)>,
    pub daily: Vec<DailyCounts>,
    pub last_failures: Vec<LastFailure>,
}

pub fn build_dashboard(
    records: &[WordRecord],
    start: NaiveDate,
    today: NaiveDate,
    last_failures_limit: usize,
) -> Dashboard {
    let stats = crate::statistics::compute_stats(records);
    Dashboard {
        classes: class_breakdown(&stats),
        daily: by_date_direction_counts(records, start, today),
        last_failures: last_failures_per_word(records, last_failures_limit),
    }
}
