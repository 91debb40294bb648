// Stat normalization: per-key min/max rescaling into comparable scores.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::{PlayerRecord, ScoredPlayer};

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

/// Which end of a stat's range is the good one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatDirection {
    #[default]
    HigherIsBetter,
    /// Timed events, where the smallest raw value is the best.
    LowerIsBetter,
}

/// A recognized stat identifier and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatKey {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub direction: StatDirection,
}

impl StatKey {
    pub fn higher(key: &str) -> Self {
        StatKey {
            key: key.to_string(),
            label: key.to_string(),
            direction: StatDirection::HigherIsBetter,
        }
    }

    pub fn lower(key: &str) -> Self {
        StatKey {
            key: key.to_string(),
            label: key.to_string(),
            direction: StatDirection::LowerIsBetter,
        }
    }
}

// ---------------------------------------------------------------------------
// Range statistics
// ---------------------------------------------------------------------------

/// Score given to the worst valid raw value on a key.
pub const SCORE_FLOOR: f64 = 30.0;

/// Score given to the best valid raw value on a key.
pub const SCORE_CEILING: f64 = 100.0;

/// Minimum and maximum of the valid raw values for one stat key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    /// Whether every valid value on the key was the same.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// Compute the range of valid values for `key` across the whole roster.
///
/// Returns `None` when no player has valid data for the key.
pub fn compute_stat_range(players: &[PlayerRecord], key: &str) -> Option<StatRange> {
    players
        .iter()
        .filter_map(|p| p.valid_stat(key))
        .fold(None, |acc, v| match acc {
            None => Some(StatRange { min: v, max: v }),
            Some(r) => Some(StatRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
}

/// Rescale a valid raw value into [`SCORE_FLOOR`, `SCORE_CEILING`].
///
/// Returns 0.0 for a degenerate range. The result is clamped to [0, 100].
pub fn normalize_value(value: f64, range: &StatRange, direction: StatDirection) -> f64 {
    if range.is_degenerate() {
        return 0.0;
    }
    let span = range.max - range.min;
    let fraction = match direction {
        StatDirection::HigherIsBetter => (value - range.min) / span,
        StatDirection::LowerIsBetter => (range.max - value) / span,
    };
    (SCORE_FLOOR + fraction * (SCORE_CEILING - SCORE_FLOOR)).clamp(0.0, SCORE_CEILING)
}

// ---------------------------------------------------------------------------
// Roster normalization
// ---------------------------------------------------------------------------

/// Normalize a roster of raw measurements.
///
/// Each key is scaled independently against the valid values of the whole
/// roster. A player's aggregate score is the mean over the keys where that
/// player had valid data (0 when there were none). The result is sorted by
/// descending aggregate score, ties keeping input order, and labelled
/// `rank 1`, `rank 2`, ... in that order.
pub fn normalize(players: &[PlayerRecord], stat_keys: &[StatKey]) -> Vec<ScoredPlayer> {
    let ranges: Vec<Option<StatRange>> = stat_keys
        .iter()
        .map(|sk| compute_stat_range(players, &sk.key))
        .collect();

    for (sk, range) in stat_keys.iter().zip(&ranges) {
        match range {
            Some(r) => debug!("stat '{}': min={} max={}", sk.key, r.min, r.max),
            None => debug!("stat '{}': no valid values, scoring 0 for everyone", sk.key),
        }
    }

    let mut scored: Vec<ScoredPlayer> = players
        .iter()
        .map(|p| score_player(p, stat_keys, &ranges))
        .collect();

    scored.sort_by(|a, b| {
        b.aggregate_score
            .partial_cmp(&a.aggregate_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, p) in scored.iter_mut().enumerate() {
        p.rank_label = format!("rank {}", i + 1);
    }

    scored
}

fn score_player(
    player: &PlayerRecord,
    stat_keys: &[StatKey],
    ranges: &[Option<StatRange>],
) -> ScoredPlayer {
    let mut normalized_stats = HashMap::with_capacity(stat_keys.len());
    let mut valid_sum = 0.0;
    let mut valid_count = 0usize;

    for (sk, range) in stat_keys.iter().zip(ranges) {
        let score = match (player.valid_stat(&sk.key), range) {
            (Some(value), Some(range)) => {
                let s = normalize_value(value, range, sk.direction);
                valid_sum += s;
                valid_count += 1;
                s
            }
            _ => 0.0,
        };
        normalized_stats.insert(sk.key.clone(), score);
    }

    let aggregate_score = if valid_count == 0 {
        0.0
    } else {
        (valid_sum / valid_count as f64).clamp(0.0, SCORE_CEILING)
    };

    ScoredPlayer {
        id: player.id.clone(),
        name: player.name.clone(),
        category: player.category,
        raw_stats: player.stats.clone(),
        normalized_stats,
        aggregate_score,
        rank_label: String::new(),
        is_anchor: false,
    }
}
