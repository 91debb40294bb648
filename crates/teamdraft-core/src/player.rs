// Player identity, category, and roster records.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable player key.
///
/// Built from the class/group and the within-group sequence number so that
/// importing the same class list twice resolves to the same ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    /// Derive the key for sequence number `seq` in class `class`,
    /// e.g. `("3-1", 7)` -> `"3-1-07"`.
    pub fn from_class_seq(class: &str, seq: u32) -> Self {
        PlayerId(format!("{}-{:02}", class.trim(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Binary classifier used for per-team quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Male,
    Female,
}

impl Category {
    /// Both categories, in the order quotas are evaluated and reported.
    pub const ALL: [Category; 2] = [Category::Male, Category::Female];

    /// Parse a roster cell. Returns `None` for blank or unrecognized values,
    /// which leaves the player unspecified.
    pub fn from_str_category(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "boy" => Some(Category::Male),
            "f" | "female" | "girl" => Some(Category::Female),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Category::Male => "male",
            Category::Female => "female",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Male => 0,
            Category::Female => 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A player as imported, before normalization.
///
/// A stat that is missing from `stats`, `None`, or not strictly positive
/// means "no data" for that key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub category: Option<Category>,
    #[serde(default)]
    pub stats: HashMap<String, Option<f64>>,
}

impl PlayerRecord {
    /// The raw value for `key` if it counts as valid data.
    pub fn valid_stat(&self, key: &str) -> Option<f64> {
        self.stats
            .get(key)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// A player carried out of the normalizer.
///
/// `is_anchor` is false until the draft engine accepts the player as a
/// team captain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlayer {
    pub id: PlayerId,
    pub name: String,
    pub category: Option<Category>,
    pub raw_stats: HashMap<String, Option<f64>>,
    /// Per-key score in [0, 100]; absent data maps to 0.
    pub normalized_stats: HashMap<String, f64>,
    /// Mean of `normalized_stats` over the keys with valid raw data.
    pub aggregate_score: f64,
    /// Anonymized rank label ("rank 1", "rank 2", ...). Cosmetic only.
    pub rank_label: String,
    pub is_anchor: bool,
}
