// Quota planning: per-team size targets and per-category min/max.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::state::TeamId;
use crate::player::{Category, ScoredPlayer};

/// Allowed per-team count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryQuota {
    pub min: usize,
    pub max: usize,
}

impl CategoryQuota {
    /// Even split of `count` players over `team_count` teams.
    pub fn even_split(count: usize, team_count: usize) -> Self {
        if team_count == 0 {
            return CategoryQuota { min: 0, max: 0 };
        }
        CategoryQuota {
            min: count / team_count,
            max: count.div_ceil(team_count),
        }
    }
}

/// Per-category quotas. Computed once at session start, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSpec {
    pub male: CategoryQuota,
    pub female: CategoryQuota,
}

impl QuotaSpec {
    pub fn get(&self, category: Category) -> CategoryQuota {
        match category {
            Category::Male => self.male,
            Category::Female => self.female,
        }
    }
}

/// Output of [`plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPlan {
    pub per_team_slots: BTreeMap<TeamId, usize>,
    pub quota: QuotaSpec,
}

/// Count the players of `category` in a roster.
pub fn category_count(roster: &[ScoredPlayer], category: Category) -> usize {
    roster
        .iter()
        .filter(|p| p.category == Some(category))
        .count()
}

/// Plan slot targets and category quotas for a roster split over the teams
/// in `seed_order`.
///
/// The roster is the full roster, anchors included. The first
/// `total % team_count` teams of the seed order receive one extra slot.
pub fn plan(roster: &[ScoredPlayer], seed_order: &[TeamId]) -> QuotaPlan {
    let team_count = seed_order.len();
    let total = roster.len();

    let mut per_team_slots = BTreeMap::new();
    if team_count > 0 {
        let base = total / team_count;
        let extra = total % team_count;
        for (i, team_id) in seed_order.iter().enumerate() {
            let slots = if i < extra { base + 1 } else { base };
            per_team_slots.insert(team_id.clone(), slots);
        }
    }

    let quota = QuotaSpec {
        male: CategoryQuota::even_split(category_count(roster, Category::Male), team_count),
        female: CategoryQuota::even_split(category_count(roster, Category::Female), team_count),
    };

    QuotaPlan {
        per_team_slots,
        quota,
    }
}
