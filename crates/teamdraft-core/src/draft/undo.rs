// Undo: full pre-pick snapshots, restored verbatim.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::draft::state::{DraftState, Team, TeamId};
use crate::player::PlayerId;

/// The mutable part of a [`DraftState`], deep-copied before a pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub unassigned: BTreeSet<PlayerId>,
    pub teams: Vec<Team>,
    pub pick_order: Vec<TeamId>,
    pub pick_index: usize,
    pub round: u32,
}

impl DraftSnapshot {
    pub fn capture(state: &DraftState) -> Self {
        DraftSnapshot {
            unassigned: state.unassigned.clone(),
            teams: state.teams.clone(),
            pick_order: state.pick_order.clone(),
            pick_index: state.pick_index,
            round: state.round,
        }
    }

    /// Replace the snapshotted fields of `state`. `target_slots` is left
    /// alone since it never changes within a session.
    pub fn restore_into(self, state: &mut DraftState) {
        state.unassigned = self.unassigned;
        state.teams = self.teams;
        state.pick_order = self.pick_order;
        state.pick_index = self.pick_index;
        state.round = self.round;
    }
}

/// A committed pick together with the state it was made from. The pick's
/// round is `before.round`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftMove {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub before: DraftSnapshot,
}

/// Stack of committed moves, most recent last.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    moves: Vec<DraftMove>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pick about to be applied to `state`.
    pub fn push(&mut self, player_id: PlayerId, team_id: TeamId, state: &DraftState) {
        self.moves.push(DraftMove {
            player_id,
            team_id,
            before: DraftSnapshot::capture(state),
        });
    }

    /// Pop the latest move and rewind `state` to just before it.
    ///
    /// Returns `None`, leaving `state` untouched, when there is nothing to undo.
    pub fn undo(&mut self, state: &mut DraftState) -> Option<(PlayerId, TeamId)> {
        let mv = self.moves.pop()?;
        mv.before.restore_into(state);
        Some((mv.player_id, mv.team_id))
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Committed moves, oldest first.
    pub fn moves(&self) -> &[DraftMove] {
        &self.moves
    }
}
