// Draft engine: anchor seeding, turn-validated assignment, snake rotation, undo.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::quota::{self, QuotaSpec};
use super::state::{DraftState, Team, TeamId};
use super::undo::{DraftMove, UndoStack};
use super::validate::{self, QuotaViolation};
use crate::player::{Category, PlayerId, ScoredPlayer};

/// Fewest anchors (and therefore teams) a session may start with.
pub const MIN_ANCHORS: usize = 2;

/// Most anchors (and therefore teams) a session may start with.
pub const MAX_ANCHORS: usize = 4;

/// Placeholder in [`DraftSettings::team_name_format`] replaced by the anchor's name.
pub const ANCHOR_PLACEHOLDER: &str = "{anchor}";

// ---------------------------------------------------------------------------
// Settings, phase, errors
// ---------------------------------------------------------------------------

/// Caller-supplied session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    /// Run the quota validator before every pick.
    pub enforce_category_balance: bool,
    /// Display colors handed out to teams in seed order.
    pub team_colors: Vec<String>,
    /// Team display name, with `{anchor}` standing for the anchor's name.
    pub team_name_format: String,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            enforce_category_balance: true,
            team_colors: vec![
                "#e53935".into(),
                "#1e88e5".into(),
                "#43a047".into(),
                "#fdd835".into(),
            ],
            team_name_format: "Team {anchor}".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    AwaitingAnchors,
    Drafting,
    Complete,
}

impl fmt::Display for DraftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DraftPhase::AwaitingAnchors => "awaiting anchor selection",
            DraftPhase::Drafting => "drafting",
            DraftPhase::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Every way a draft command can be rejected. A rejected command never
/// changes the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("expected between {min} and {max} anchors, got {count}")]
    AnchorCountOutOfRange { count: usize, min: usize, max: usize },

    #[error("player {0} was selected as an anchor more than once")]
    DuplicateAnchor(PlayerId),

    #[error("player {0} appears more than once in the roster")]
    DuplicatePlayer(PlayerId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("it is {expected}'s turn, not {attempted}'s")]
    WrongTurn { expected: TeamId, attempted: TeamId },

    #[error("player {0} is already on a team")]
    AlreadyAssigned(PlayerId),

    #[error(transparent)]
    Quota(#[from] QuotaViolation),

    #[error("not allowed while the draft is {0}")]
    InvalidPhase(DraftPhase),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One drafting session. Owns the draft state and its undo history.
///
/// Single writer: callers sharing a session across contexts must serialize
/// commands themselves.
#[derive(Debug, Clone)]
pub struct DraftEngine {
    /// Frozen roster in rank order.
    roster: Vec<ScoredPlayer>,
    categories: HashMap<PlayerId, Category>,
    settings: DraftSettings,
    phase: DraftPhase,
    quota: Option<QuotaSpec>,
    state: DraftState,
    undo: UndoStack,
}

impl DraftEngine {
    /// Create a session over a scored roster, awaiting anchor selection.
    ///
    /// The roster is re-sorted by descending aggregate score (stable), so it
    /// may be passed in any order. Player ids must be unique.
    pub fn new(mut roster: Vec<ScoredPlayer>, settings: DraftSettings) -> Result<Self, DraftError> {
        let mut seen = BTreeSet::new();
        for p in &roster {
            if !seen.insert(&p.id) {
                return Err(DraftError::DuplicatePlayer(p.id.clone()));
            }
        }

        roster.sort_by(|a, b| {
            b.aggregate_score
                .partial_cmp(&a.aggregate_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for p in &mut roster {
            p.is_anchor = false;
        }
        let categories = roster
            .iter()
            .filter_map(|p| p.category.map(|c| (p.id.clone(), c)))
            .collect();
        let state = Self::empty_state(&roster);

        Ok(DraftEngine {
            roster,
            categories,
            settings,
            phase: DraftPhase::AwaitingAnchors,
            quota: None,
            state,
            undo: UndoStack::new(),
        })
    }

    fn empty_state(roster: &[ScoredPlayer]) -> DraftState {
        DraftState {
            teams: Vec::new(),
            unassigned: roster.iter().map(|p| p.id.clone()).collect(),
            pick_order: Vec::new(),
            pick_index: 0,
            round: 1,
            target_slots: Default::default(),
        }
    }

    /// Seed one team per anchor and start drafting.
    ///
    /// Teams are seeded by the anchors' rank, strongest first, and that is
    /// the first round's pick order.
    pub fn select_anchors(&mut self, anchor_ids: &[PlayerId]) -> Result<(), DraftError> {
        if self.phase != DraftPhase::AwaitingAnchors {
            return Err(DraftError::InvalidPhase(self.phase));
        }
        if !(MIN_ANCHORS..=MAX_ANCHORS).contains(&anchor_ids.len()) {
            return Err(DraftError::AnchorCountOutOfRange {
                count: anchor_ids.len(),
                min: MIN_ANCHORS,
                max: MAX_ANCHORS,
            });
        }

        let mut seen = BTreeSet::new();
        let mut positions = Vec::with_capacity(anchor_ids.len());
        for id in anchor_ids {
            if !seen.insert(id) {
                return Err(DraftError::DuplicateAnchor(id.clone()));
            }
            let pos = self
                .roster
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| DraftError::UnknownPlayer(id.clone()))?;
            positions.push(pos);
        }
        positions.sort_unstable();

        let mut teams = Vec::with_capacity(positions.len());
        for (seed, &pos) in positions.iter().enumerate() {
            let color = self.team_color(seed);
            let anchor = &mut self.roster[pos];
            anchor.is_anchor = true;
            let name = self
                .settings
                .team_name_format
                .replace(ANCHOR_PLACEHOLDER, &anchor.name);
            teams.push(Team::new(anchor.id.clone(), anchor.category, name, color));
        }

        let seed_order: Vec<TeamId> = teams.iter().map(|t| t.team_id.clone()).collect();
        let plan = quota::plan(&self.roster, &seed_order);

        let unassigned = self
            .roster
            .iter()
            .filter(|p| !p.is_anchor)
            .map(|p| p.id.clone())
            .collect();

        self.state = DraftState {
            teams,
            unassigned,
            pick_order: seed_order,
            pick_index: 0,
            round: 1,
            target_slots: plan.per_team_slots,
        };
        self.quota = Some(plan.quota);
        self.undo.clear();
        self.refresh_phase();

        info!(
            "Draft started: {} teams, {} players, {} to draft (male quota {}..={}, female quota {}..={})",
            self.state.teams.len(),
            self.roster.len(),
            self.state.unassigned.len(),
            plan.quota.male.min,
            plan.quota.male.max,
            plan.quota.female.min,
            plan.quota.female.max,
        );
        Ok(())
    }

    fn team_color(&self, seed: usize) -> String {
        if self.settings.team_colors.is_empty() {
            return String::new();
        }
        self.settings.team_colors[seed % self.settings.team_colors.len()].clone()
    }

    /// Discard the current session and return to anchor selection.
    pub fn reset(&mut self) {
        for p in &mut self.roster {
            p.is_anchor = false;
        }
        self.state = Self::empty_state(&self.roster);
        self.quota = None;
        self.undo.clear();
        self.phase = DraftPhase::AwaitingAnchors;
        info!("Draft reset, awaiting anchor selection");
    }

    /// Put `player_id` on `team_id`, which must be the team on the clock.
    ///
    /// With category balance enforced, the quota validator runs first. On
    /// any rejection the session is unchanged.
    pub fn assign(&mut self, player_id: &PlayerId, team_id: &TeamId) -> Result<(), DraftError> {
        if self.phase != DraftPhase::Drafting {
            return Err(DraftError::InvalidPhase(self.phase));
        }

        let Some(expected) = self.state.current_team().cloned() else {
            return Err(DraftError::InvalidPhase(self.phase));
        };
        if &expected != team_id {
            debug!("rejected pick of {} by {}: {} is on the clock", player_id, team_id, expected);
            return Err(DraftError::WrongTurn {
                expected,
                attempted: team_id.clone(),
            });
        }
        if !self.state.unassigned.contains(player_id) {
            if self.player(player_id).is_none() {
                return Err(DraftError::UnknownPlayer(player_id.clone()));
            }
            return Err(DraftError::AlreadyAssigned(player_id.clone()));
        }
        if self.settings.enforce_category_balance {
            if let Some(quota) = &self.quota {
                if let Err(e) =
                    validate::validate(player_id, team_id, &self.state, quota, &self.categories)
                {
                    debug!("rejected pick of {} by {}: {}", player_id, team_id, e);
                    return Err(e.into());
                }
            }
        }

        self.undo.push(player_id.clone(), team_id.clone(), &self.state);

        let category = self.categories.get(player_id).copied();
        self.state.unassigned.remove(player_id);
        if let Some(team) = self.state.team_mut(team_id) {
            team.members.push(player_id.clone());
            team.category_counts.add(category);
        }
        debug!(
            "round {} pick {}: {} -> {}",
            self.state.round,
            self.state.pick_index + 1,
            player_id,
            team_id
        );
        self.state.rotate_turn();
        self.refresh_phase();

        if self.phase == DraftPhase::Complete {
            info!("Draft complete after {} picks", self.undo.len());
        }
        Ok(())
    }

    /// Rewind the most recent pick. Returns the undone `(player, team)`, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<(PlayerId, TeamId)> {
        if self.phase == DraftPhase::AwaitingAnchors {
            return None;
        }
        let undone = self.undo.undo(&mut self.state)?;
        self.refresh_phase();
        debug!("undid pick {} -> {}", undone.0, undone.1);
        Some(undone)
    }

    /// Re-apply a sequence of `(player, team)` picks through [`Self::assign`].
    ///
    /// Stops at the first rejection; picks before it stay committed.
    /// Returns the number of picks applied.
    pub fn replay(&mut self, picks: &[(PlayerId, TeamId)]) -> Result<usize, DraftError> {
        for (player_id, team_id) in picks {
            self.assign(player_id, team_id)?;
        }
        Ok(picks.len())
    }

    fn refresh_phase(&mut self) {
        self.phase = if self.state.unassigned.is_empty() {
            DraftPhase::Complete
        } else {
            DraftPhase::Drafting
        };
    }

    // --- Queries ---

    /// The team on the clock, or `None` outside the drafting phase.
    pub fn current_turn(&self) -> Option<&TeamId> {
        if self.phase != DraftPhase::Drafting {
            return None;
        }
        self.state.current_team()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DraftPhase::Complete
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// A copy of the current state, for callers to persist.
    pub fn snapshot(&self) -> DraftState {
        self.state.clone()
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    /// The roster in rank order.
    pub fn roster(&self) -> &[ScoredPlayer] {
        &self.roster
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&ScoredPlayer> {
        self.roster.iter().find(|p| &p.id == player_id)
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    /// Category quotas, once the draft has started.
    pub fn quota(&self) -> Option<&QuotaSpec> {
        self.quota.as_ref()
    }

    /// Committed picks, oldest first.
    pub fn moves(&self) -> &[DraftMove] {
        self.undo.moves()
    }

    /// Unassigned players the team on the clock may legally take, in rank order.
    pub fn eligible_players(&self) -> Vec<&ScoredPlayer> {
        let Some(team_id) = self.current_turn() else {
            return Vec::new();
        };
        self.roster
            .iter()
            .filter(|p| self.state.unassigned.contains(&p.id))
            .filter(|p| match (&self.quota, self.settings.enforce_category_balance) {
                (Some(quota), true) => {
                    validate::validate(&p.id, team_id, &self.state, quota, &self.categories).is_ok()
                }
                _ => true,
            })
            .collect()
    }
}
