// Draft state: teams, unassigned pool, pick order, and round counter.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::{Category, PlayerId};

/// Team identifier, tied 1:1 to the team's anchor player.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        TeamId(id.into())
    }

    /// The id of the team seeded by `anchor`.
    pub fn for_anchor(anchor: &PlayerId) -> Self {
        TeamId(format!("team-{anchor}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        TeamId(s.to_string())
    }
}

/// Running per-category member counts for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts([usize; 2]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        self.0[category.index()]
    }

    pub fn add(&mut self, category: Option<Category>) {
        if let Some(c) = category {
            self.0[c.index()] += 1;
        }
    }
}

/// A team during the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub anchor_id: PlayerId,
    /// Members in pick order; the anchor is always first.
    pub members: Vec<PlayerId>,
    pub color: String,
    pub category_counts: CategoryCounts,
}

impl Team {
    pub fn new(
        anchor_id: PlayerId,
        anchor_category: Option<Category>,
        name: String,
        color: String,
    ) -> Self {
        let mut category_counts = CategoryCounts::default();
        category_counts.add(anchor_category);
        Team {
            team_id: TeamId::for_anchor(&anchor_id),
            name,
            members: vec![anchor_id.clone()],
            anchor_id,
            color,
            category_counts,
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn has_member(&self, player_id: &PlayerId) -> bool {
        self.members.contains(player_id)
    }
}

/// The mutable session.
///
/// `target_slots` is fixed at session start; every other field is
/// snapshotted before each committed pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftState {
    /// Teams in seed order.
    pub teams: Vec<Team>,
    pub unassigned: BTreeSet<PlayerId>,
    /// Pick order for the current round.
    pub pick_order: Vec<TeamId>,
    pub pick_index: usize,
    /// 1-based round counter.
    pub round: u32,
    /// Balanced size target per team. Advisory only.
    pub target_slots: BTreeMap<TeamId, usize>,
}

impl DraftState {
    /// Look up a team by ID.
    pub fn team(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.team_id == team_id)
    }

    /// Get a mutable reference to a team by ID.
    pub fn team_mut(&mut self, team_id: &TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| &t.team_id == team_id)
    }

    /// The team on the clock, or `None` once every player is placed.
    pub fn current_team(&self) -> Option<&TeamId> {
        if self.unassigned.is_empty() {
            return None;
        }
        self.pick_order.get(self.pick_index)
    }

    /// The team a player currently belongs to.
    pub fn team_of(&self, player_id: &PlayerId) -> Option<&Team> {
        self.teams.iter().find(|t| t.has_member(player_id))
    }

    /// Total players across all teams and the unassigned pool.
    pub fn player_count(&self) -> usize {
        self.unassigned.len() + self.teams.iter().map(Team::size).sum::<usize>()
    }

    /// Advance the turn pointer; at the end of a round, reverse the order
    /// and start the next round.
    pub(crate) fn rotate_turn(&mut self) {
        if self.pick_index + 1 < self.pick_order.len() {
            self.pick_index += 1;
        } else {
            self.round += 1;
            self.pick_order.reverse();
            self.pick_index = 0;
        }
    }
}
