// Quota validation: immediate per-team cap plus global future feasibility.

use std::collections::HashMap;

use thiserror::Error;

use crate::draft::quota::QuotaSpec;
use crate::draft::state::{DraftState, TeamId};
use crate::player::{Category, PlayerId};

/// Why a pick was refused by the quota check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaViolation {
    #[error("team {team} already has the maximum of {max} {category} players")]
    CategoryMaxReached {
        team: TeamId,
        category: Category,
        max: usize,
    },

    #[error("not enough {category} players left: {available} available, {needed} needed to meet every team's minimum")]
    CategoryShortage {
        category: Category,
        available: usize,
        needed: usize,
    },
}

/// Check whether placing `player_id` on `team_id` keeps the quotas satisfiable.
///
/// 1. The player's category count on the target team must not exceed `max`.
/// 2. With the pick applied, the summed shortfall below `min` across all
///    teams must not exceed the unassigned players of that category that
///    remain afterwards. Evaluated for both categories on every pick.
///
/// Players without a category skip the cap but still go through the
/// feasibility check. Unknown teams pass; the engine rejects them earlier.
pub fn validate(
    player_id: &PlayerId,
    team_id: &TeamId,
    state: &DraftState,
    quota: &QuotaSpec,
    categories: &HashMap<PlayerId, Category>,
) -> Result<(), QuotaViolation> {
    let player_category = categories.get(player_id).copied();

    if let (Some(category), Some(team)) = (player_category, state.team(team_id)) {
        let max = quota.get(category).max;
        if team.category_counts.get(category) + 1 > max {
            return Err(QuotaViolation::CategoryMaxReached {
                team: team_id.clone(),
                category,
                max,
            });
        }
    }

    for category in Category::ALL {
        let min = quota.get(category).min;
        let placed_here = player_category == Some(category);

        let needed: usize = state
            .teams
            .iter()
            .map(|t| {
                let mut count = t.category_counts.get(category);
                if placed_here && &t.team_id == team_id {
                    count += 1;
                }
                min.saturating_sub(count)
            })
            .sum();

        let available = state
            .unassigned
            .iter()
            .filter(|id| *id != player_id && categories.get(*id) == Some(&category))
            .count();

        if needed > available {
            return Err(QuotaViolation::CategoryShortage {
                category,
                available,
                needed,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::quota::CategoryQuota;
    use crate::draft::state::Team;
    use std::collections::BTreeMap;

    struct Fixture {
        state: DraftState,
        categories: HashMap<PlayerId, Category>,
    }

    /// Teams are (anchor id, anchor category); pool is (id, category).
    fn fixture(teams: &[(&str, Category)], pool: &[(&str, Category)]) -> Fixture {
        let mut categories = HashMap::new();
        let teams: Vec<Team> = teams
            .iter()
            .map(|(id, c)| {
                categories.insert(PlayerId::from(*id), *c);
                Team::new(PlayerId::from(*id), Some(*c), id.to_string(), String::new())
            })
            .collect();
        for (id, c) in pool {
            categories.insert(PlayerId::from(*id), *c);
        }
        let state = DraftState {
            pick_order: teams.iter().map(|t| t.team_id.clone()).collect(),
            teams,
            unassigned: pool.iter().map(|(id, _)| PlayerId::from(*id)).collect(),
            pick_index: 0,
            round: 1,
            target_slots: BTreeMap::new(),
        };
        Fixture { state, categories }
    }

    fn place(f: &mut Fixture, player: &str, team: &str) {
        let pid = PlayerId::from(player);
        let category = f.categories.get(&pid).copied();
        f.state.unassigned.remove(&pid);
        let t = f.state.team_mut(&TeamId::for_anchor(&PlayerId::from(team))).unwrap();
        t.members.push(pid);
        t.category_counts.add(category);
    }

    fn quota(male: (usize, usize), female: (usize, usize)) -> QuotaSpec {
        QuotaSpec {
            male: CategoryQuota { min: male.0, max: male.1 },
            female: CategoryQuota { min: female.0, max: female.1 },
        }
    }

    fn check(f: &Fixture, player: &str, anchor: &str, q: &QuotaSpec) -> Result<(), QuotaViolation> {
        validate(
            &PlayerId::from(player),
            &TeamId::for_anchor(&PlayerId::from(anchor)),
            &f.state,
            q,
            &f.categories,
        )
    }

    #[test]
    fn immediate_cap_rejects_over_max() {
        use Category::*;
        let mut f = fixture(&[("a", Female), ("b", Male)], &[("f1", Female), ("f2", Female), ("m1", Male)]);
        // 3 females over 2 teams: min 1, max 2.
        let q = quota((1, 1), (1, 2));
        place(&mut f, "f1", "a");
        let err = check(&f, "f2", "a", &q).unwrap_err();
        assert_eq!(
            err,
            QuotaViolation::CategoryMaxReached {
                team: TeamId::for_anchor(&PlayerId::from("a")),
                category: Female,
                max: 2,
            }
        );
    }

    #[test]
    fn shortage_blocks_premature_depletion() {
        use Category::*;
        // 3 teams, 4 females: min 1, max 2. Team c still needs a female.
        let mut f = fixture(
            &[("a", Female), ("b", Female), ("c", Male)],
            &[("f3", Female), ("f4", Female), ("m1", Male), ("m2", Male)],
        );
        let q = quota((1, 1), (1, 2));
        assert!(check(&f, "f3", "a", &q).is_ok());
        place(&mut f, "f3", "a");

        let err = check(&f, "f4", "b", &q).unwrap_err();
        assert_eq!(
            err,
            QuotaViolation::CategoryShortage {
                category: Female,
                available: 0,
                needed: 1,
            }
        );
        // Giving the last female to the team that needs her is fine.
        assert!(check(&f, "f4", "c", &q).is_ok());
    }

    #[test]
    fn other_category_picks_pass_when_feasible() {
        use Category::*;
        let f = fixture(&[("a", Female), ("b", Male)], &[("f1", Female), ("m1", Male), ("m2", Male)]);
        let q = quota((1, 2), (1, 1));
        assert!(check(&f, "m1", "a", &q).is_ok());
        assert!(check(&f, "f1", "b", &q).is_ok());
    }

    #[test]
    fn rejection_does_not_touch_state() {
        use Category::*;
        let f = fixture(&[("a", Female), ("b", Male)], &[("f1", Female)]);
        let before = f.state.clone();
        let q = quota((0, 1), (1, 1));
        assert!(check(&f, "f1", "a", &q).is_err());
        assert_eq!(f.state, before);
    }
}
