//! Practice statistics and difficulty ranking.
//!
//! Everything here is recomputed from the practice logs on demand; nothing is
//! persisted. A direction that was never practiced has a success ratio of 0,
//! which deliberately pulls untested words into the "Difficult" tier.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{Direction, WordClass, WordRecord};

/// Percentile below which (inclusive) a word counts as difficult.
pub const DIFFICULT_PERCENTILE: f64 = 0.3;

/// Percentile above which (exclusive) a word counts as easy.
pub const EASY_PERCENTILE: f64 = 0.7;

/// Outcome counts for one word in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionStats {
    /// Correct answers.
    pub right: u32,
    /// All answers.
    pub total: u32,
    /// Wrong answers, always `total - right`.
    pub fail: u32,
    /// `right / total`, or 0 when there are no answers.
    pub success_ratio: f64,
}

impl DirectionStats {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a bool>) -> Self {
        let (right, total) = outcomes
            .into_iter()
            .fold((0u32, 0u32), |(right, total), passed| {
                (right + u32::from(*passed), total + 1)
            });
        let success_ratio = if total == 0 {
            0.0
        } else {
            right as f64 / total as f64
        };
        Self {
            right,
            total,
            fail: total - right,
            success_ratio,
        }
    }
}

/// Derived statistics for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordStats {
    pub word: String,
    pub class: WordClass,
    pub to_target: DirectionStats,
    pub to_source: DirectionStats,
}

impl WordStats {
    pub fn from_record(record: &WordRecord) -> Self {
        Self {
            word: record.word.clone(),
            class: record.class,
            to_target: DirectionStats::from_outcomes(record.practice_data.to_target.values()),
            to_source: DirectionStats::from_outcomes(record.practice_data.to_source.values()),
        }
    }

    pub fn direction(&self, direction: Direction) -> &DirectionStats {
        match direction {
            Direction::ToTarget => &self.to_target,
            Direction::ToSource => &self.to_source,
        }
    }

    /// Mean of both directions' success ratios.
    pub fn average(&self) -> f64 {
        (self.to_target.success_ratio + self.to_source.success_ratio) / 2.0
    }
}

/// Compute per-word statistics for the whole vocabulary, in input order.
pub fn compute_stats(records: &[WordRecord]) -> Vec<WordStats> {
    let stats: Vec<WordStats> = records.iter().map(WordStats::from_record).collect();
    tracing::debug!(words = stats.len(), "computed practice statistics");
    stats
}

/// Quantile of an ascending slice, interpolating linearly between the two
/// closest ranks. Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Difficulty bucket derived from a word's average success ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyTier {
    Difficult,
    Medium,
    Easy,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Difficult,
        DifficultyTier::Medium,
        DifficultyTier::Easy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Difficult => "Difficult",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Easy => "Easy",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DifficultyTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "difficulty",
                value: s.to_string(),
            })
    }
}

/// The 30th and 70th percentile of the average success column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub difficult: f64,
    pub easy: f64,
}

impl TierThresholds {
    /// `<= difficult` is Difficult, `<= easy` is Medium, anything above is Easy.
    pub fn classify(&self, average: f64) -> DifficultyTier {
        if average <= self.difficult {
            DifficultyTier::Difficult
        } else if average <= self.easy {
            DifficultyTier::Medium
        } else {
            DifficultyTier::Easy
        }
    }
}

/// One row of the difficulty table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRow {
    pub word: String,
    pub average: f64,
    pub to_target: f64,
    pub to_source: f64,
    pub tier: DifficultyTier,
}

/// All words ordered from hardest to easiest, with tier thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRanking {
    rows: Vec<DifficultyRow>,
    thresholds: Option<TierThresholds>,
}

impl DifficultyRanking {
    /// Rows in ascending order of average success.
    pub fn rows(&self) -> &[DifficultyRow] {
        &self.rows
    }

    /// `None` when the vocabulary is empty.
    pub fn thresholds(&self) -> Option<TierThresholds> {
        self.thresholds
    }

    pub fn tier_of(&self, word: &str) -> Option<DifficultyTier> {
        self.rows.iter().find(|r| r.word == word).map(|r| r.tier)
    }

    /// Words of one tier, hardest first.
    pub fn words_in(&self, tier: DifficultyTier) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.tier == tier)
            .map(|r| r.word.as_str())
            .collect()
    }

    /// Number of words per tier.
    pub fn tier_counts(&self) -> BTreeMap<DifficultyTier, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.tier).or_insert(0) += 1;
        }
        counts
    }
}

/// Order all words by average success and bucket them into tiers.
pub fn rank_difficulty(stats: &[WordStats]) -> DifficultyRanking {
    let mut scored: Vec<(&WordStats, f64)> = stats.iter().map(|s| (s, s.average())).collect();
    scored.sort_by(|(a, avg_a), (b, avg_b)| {
        avg_a.total_cmp(avg_b).then_with(|| a.word.cmp(&b.word))
    });

    let averages: Vec<f64> = scored.iter().map(|(_, avg)| *avg).collect();
    let thresholds = match (
        quantile(&averages, DIFFICULT_PERCENTILE),
        quantile(&averages, EASY_PERCENTILE),
    ) {
        (Some(difficult), Some(easy)) => Some(TierThresholds { difficult, easy }),
        _ => None,
    };

    let rows = scored
        .into_iter()
        .map(|(s, average)| DifficultyRow {
            word: s.word.clone(),
            average,
            to_target: s.to_target.success_ratio,
            to_source: s.to_source.success_ratio,
            tier: thresholds
                .map(|t| t.classify(average))
                .unwrap_or(DifficultyTier::Difficult),
        })
        .collect();

    DifficultyRanking { rows, thresholds }
}
