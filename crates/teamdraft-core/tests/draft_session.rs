// Integration tests for full draft sessions.
//
// These drive the public API end to end: roster import, normalization,
// anchor seeding, snake-order picks, quota rejections, and undo.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use teamdraft_core::draft::engine::{DraftEngine, DraftError, DraftPhase, DraftSettings};
use teamdraft_core::draft::state::TeamId;
use teamdraft_core::draft::validate::QuotaViolation;
use teamdraft_core::player::{Category, PlayerId, ScoredPlayer};
use teamdraft_core::roster::load_roster;
use teamdraft_core::valuation::normalize::{normalize, StatKey};

// ===========================================================================
// Test helpers
// ===========================================================================


fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// The stat keys used by the fixture roster, matching the default config.
fn stat_keys() -> Vec<StatKey> {
    vec![
        StatKey::higher("grip_strength"),
        StatKey::higher("sit_ups"),
        StatKey::higher("sit_and_reach"),
        StatKey::higher("side_steps"),
        StatKey::higher("shuttle_run"),
        StatKey::lower("sprint_50m"),
        StatKey::higher("long_jump"),
        StatKey::higher("ball_throw"),
    ]
}

fn fixture_roster() -> Vec<ScoredPlayer> {
    let records = load_roster(&fixtures_dir().join("roster.csv"), &stat_keys())
        .expect("fixture roster should load");
    normalize(&records, &stat_keys())
}

fn scored(id: &str, category: Option<Category>, score: f64) -> ScoredPlayer {
    ScoredPlayer {
        id: PlayerId::from(id),
        name: id.to_string(),
        category,
        raw_stats: HashMap::new(),
        normalized_stats: HashMap::new(),
        aggregate_score: score,
        rank_label: String::new(),
        is_anchor: false,
    }
}

fn pid(id: &str) -> PlayerId {
    PlayerId::from(id)
}

fn team(anchor: &str) -> TeamId {
    TeamId::for_anchor(&pid(anchor))
}

/// Pick the first unassigned player (rank order) for whichever team is up.
fn pick_next(engine: &mut DraftEngine) -> (PlayerId, TeamId) {
    let team_id = engine.current_turn().cloned().expect("someone should be on the clock");
    let player_id = engine.eligible_players()[0].id.clone();
    engine.assign(&player_id, &team_id).expect("eligible pick should be accepted");
    (player_id, team_id)
}

// ===========================================================================
// Normalization over the fixture roster
// ===========================================================================

#[test]
fn fixture_roster_normalizes_into_bounds() {
    let roster = fixture_roster();
    assert_eq!(roster.len(), 17);
    for p in &roster {
        assert!((0.0..=100.0).contains(&p.aggregate_score), "{}", p.id);
        for key in stat_keys() {
            let v = p.normalized_stats[&key.key];
            assert!((0.0..=100.0).contains(&v), "{} {}", p.id, key.key);
        }
    }
    for pair in roster.windows(2) {
        assert!(pair[0].aggregate_score >= pair[1].aggregate_score);
    }
    assert_eq!(roster[0].rank_label, "rank 1");
    assert_eq!(roster[16].rank_label, "rank 17");
}

#[test]
fn fixture_roster_scores_known_players() {
    let roster = fixture_roster();
    // Tanaka tops most events; Kobayashi trails in most.
    assert_eq!(roster[0].id.as_str(), "5-2-13");
    assert_eq!(roster[1].id.as_str(), "5-2-03");
    assert_eq!(roster[16].id.as_str(), "5-2-08");

    let tanaka = roster.iter().find(|p| p.id.as_str() == "5-2-13").unwrap();
    assert!((tanaka.normalized_stats["sprint_50m"] - 100.0).abs() < 1e-9);
    assert!((tanaka.normalized_stats["long_jump"] - 100.0).abs() < 1e-9);

    let kobayashi = roster.iter().find(|p| p.id.as_str() == "5-2-08").unwrap();
    assert!((kobayashi.normalized_stats["sprint_50m"] - 30.0).abs() < 1e-9);

    // Missing grip and jump: zero on those keys, averaged over the other six.
    let kimura = roster.iter().find(|p| p.id.as_str() == "5-2-07").unwrap();
    assert_eq!(kimura.normalized_stats["grip_strength"], 0.0);
    assert_eq!(kimura.normalized_stats["long_jump"], 0.0);
    let others: f64 = ["sit_ups", "sit_and_reach", "side_steps", "shuttle_run", "sprint_50m", "ball_throw"]
        .iter()
        .map(|k| kimura.normalized_stats[*k])
        .sum();
    assert!((kimura.aggregate_score - others / 6.0).abs() < 1e-9);

    let sora = roster.iter().find(|p| p.id.as_str() == "5-2-17").unwrap();
    assert_eq!(sora.category, None);
}

// ===========================================================================
// Turn order
// ===========================================================================

#[test]
fn snake_order_over_three_rounds() {
    let mut roster = vec![
        scored("t1", None, 90.0),
        scored("t2", None, 80.0),
        scored("t3", None, 70.0),
    ];
    roster.extend((0..9).map(|i| scored(&format!("p{i}"), None, 50.0 - i as f64)));
    let mut engine = DraftEngine::new(roster, DraftSettings::default()).unwrap();
    engine.select_anchors(&[pid("t3"), pid("t1"), pid("t2")]).unwrap();

    let pickers: Vec<String> = (0..9).map(|_| pick_next(&mut engine).1.to_string()).collect();
    let expected = [
        "team-t1", "team-t2", "team-t3", "team-t3", "team-t2", "team-t1", "team-t1", "team-t2",
        "team-t3",
    ];
    assert_eq!(pickers, expected);
    assert!(engine.is_complete());
    assert_eq!(engine.state().round, 4);
}

#[test]
fn wrong_turn_leaves_pool_untouched() {
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..3].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();

    let on_clock = engine.current_turn().cloned().unwrap();
    let unassigned_before = engine.state().unassigned.len();
    let candidate = engine.eligible_players()[0].id.clone();

    for t in engine.state().teams.clone() {
        if t.team_id == on_clock {
            continue;
        }
        let err = engine.assign(&candidate, &t.team_id).unwrap_err();
        assert_eq!(
            err,
            DraftError::WrongTurn {
                expected: on_clock.clone(),
                attempted: t.team_id.clone(),
            }
        );
        assert_eq!(engine.state().unassigned.len(), unassigned_before);
    }
    let err = engine.assign(&candidate, &TeamId::from("team-nobody")).unwrap_err();
    assert!(matches!(err, DraftError::WrongTurn { .. }));
}

// ===========================================================================
// Quotas
// ===========================================================================

#[test]
fn last_female_cannot_go_to_team_already_at_minimum() {
    use Category::{Female, Male};
    let roster = vec![
        scored("a", Some(Female), 90.0),
        scored("b", Some(Female), 80.0),
        scored("c", Some(Male), 70.0),
        scored("f3", Some(Female), 60.0),
        scored("f4", Some(Female), 55.0),
        scored("m1", Some(Male), 50.0),
        scored("m2", Some(Male), 45.0),
        scored("m3", Some(Male), 40.0),
        scored("m4", Some(Male), 35.0),
        scored("m5", Some(Male), 30.0),
    ];
    let mut engine = DraftEngine::new(roster, DraftSettings::default()).unwrap();
    engine.select_anchors(&[pid("a"), pid("b"), pid("c")]).unwrap();

    let quota = *engine.quota().unwrap();
    assert_eq!((quota.female.min, quota.female.max), (1, 2));
    assert_eq!((quota.male.min, quota.male.max), (2, 2));

    engine.assign(&pid("f3"), &team("a")).unwrap();

    let before = engine.snapshot();
    let err = engine.assign(&pid("f4"), &team("b")).unwrap_err();
    assert_eq!(
        err,
        DraftError::Quota(QuotaViolation::CategoryShortage {
            category: Female,
            available: 0,
            needed: 1,
        })
    );
    assert_eq!(engine.snapshot(), before);

    // f4 is not offered to b; a male is.
    let eligible: Vec<&str> = engine.eligible_players().iter().map(|p| p.id.as_str()).collect();
    assert!(!eligible.contains(&"f4"));
    assert!(eligible.contains(&"m1"));
    engine.assign(&pid("m1"), &team("b")).unwrap();

    // c still gets its female.
    engine.assign(&pid("f4"), &team("c")).unwrap();
    assert_eq!(engine.state().team(&team("c")).unwrap().category_counts.get(Female), 1);
}

#[test]
fn balanced_full_draft_respects_quotas() {
    use Category::{Female, Male};
    // 4 anchors (2 female, 2 male) plus 12 players, 6 of each.
    let mut roster = Vec::new();
    for i in 0..8 {
        let category = if i % 2 == 0 { Female } else { Male };
        roster.push(scored(&format!("p{i:02}"), Some(category), 100.0 - i as f64));
    }
    for i in 8..16 {
        let category = if i < 12 { Male } else { Female };
        roster.push(scored(&format!("p{i:02}"), Some(category), 100.0 - i as f64));
    }
    let mut engine = DraftEngine::new(roster, DraftSettings::default()).unwrap();
    engine
        .select_anchors(&[pid("p00"), pid("p01"), pid("p02"), pid("p03")])
        .unwrap();
    let quota = *engine.quota().unwrap();
    assert_eq!((quota.male.min, quota.male.max), (2, 2));
    assert_eq!((quota.female.min, quota.female.max), (2, 2));

    while !engine.is_complete() {
        pick_next(&mut engine);
    }

    for t in &engine.state().teams {
        assert_eq!(t.size(), 4, "{}", t.team_id);
        assert_eq!(t.category_counts.get(Male), 2, "{}", t.team_id);
        assert_eq!(t.category_counts.get(Female), 2, "{}", t.team_id);
        assert_eq!(engine.state().target_slots[&t.team_id], 4);
    }
}

// ===========================================================================
// Undo and completion
// ===========================================================================

#[test]
fn undo_all_restores_initial_state() {
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..2].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();
    let initial = engine.snapshot();

    let n = 7;
    for _ in 0..n {
        pick_next(&mut engine);
    }
    assert_eq!(engine.moves().len(), n);
    assert_ne!(engine.snapshot(), initial);

    for _ in 0..n {
        assert!(engine.undo().is_some());
    }
    assert_eq!(engine.snapshot(), initial);
    assert_eq!(engine.state().round, 1);
    assert_eq!(engine.state().pick_index, 0);
    assert!(engine.undo().is_none());
    assert_eq!(engine.snapshot(), initial);
}

#[test]
fn undo_returns_the_latest_pick() {
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..2].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();

    pick_next(&mut engine);
    let last = pick_next(&mut engine);
    assert_eq!(engine.undo(), Some(last.clone()));
    assert!(engine.state().unassigned.contains(&last.0));
    assert_eq!(engine.current_turn(), Some(&last.1));
}

#[test]
fn fixture_draft_runs_to_completion() {
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..3].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();
    assert_eq!(engine.phase(), DraftPhase::Drafting);

    let mut guard = 0;
    while !engine.is_complete() {
        pick_next(&mut engine);
        guard += 1;
        assert!(guard <= 14);
    }

    assert!(engine.current_turn().is_none());
    assert!(engine.state().unassigned.is_empty());
    let total: usize = engine.state().teams.iter().map(|t| t.size()).sum();
    assert_eq!(total, 17);
    let target_total: usize = engine.state().target_slots.values().sum();
    assert_eq!(target_total, 17);

    // Every player on exactly one team, anchors first on their own team.
    for p in engine.roster() {
        let teams = engine.state().teams.iter().filter(|t| t.has_member(&p.id)).count();
        assert_eq!(teams, 1, "{}", p.id);
        assert!(engine.state().team_of(&p.id).is_some());
    }
    assert_eq!(engine.state().player_count(), 17);
    for t in &engine.state().teams {
        assert_eq!(t.members[0], t.anchor_id);
    }
}

#[test]
fn turn_order_can_strand_the_last_player() {
    // With two teams the female cap is exact (8 over 2 teams), and greedy
    // picking leaves the last female for a team that is already full.
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..2].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();

    while !engine.eligible_players().is_empty() {
        pick_next(&mut engine);
    }
    assert_eq!(engine.phase(), DraftPhase::Drafting);
    assert_eq!(engine.moves().len(), 14);

    let on_clock = engine.current_turn().cloned().unwrap();
    assert_eq!(on_clock.as_str(), "team-5-2-03");
    let err = engine.assign(&pid("5-2-08"), &on_clock).unwrap_err();
    assert_eq!(
        err,
        DraftError::Quota(QuotaViolation::CategoryMaxReached {
            team: on_clock,
            category: Category::Female,
            max: 4,
        })
    );

    // Backing out one pick reopens choices.
    engine.undo().unwrap();
    assert!(!engine.eligible_players().is_empty());
}

#[test]
fn replay_rebuilds_a_session() {
    let roster = fixture_roster();
    let anchors: Vec<PlayerId> = roster[..2].iter().map(|p| p.id.clone()).collect();

    let mut original = DraftEngine::new(roster.clone(), DraftSettings::default()).unwrap();
    original.select_anchors(&anchors).unwrap();
    for _ in 0..6 {
        pick_next(&mut original);
    }
    let picks: Vec<(PlayerId, TeamId)> = original
        .moves()
        .iter()
        .map(|m| (m.player_id.clone(), m.team_id.clone()))
        .collect();

    let mut rebuilt = DraftEngine::new(roster, DraftSettings::default()).unwrap();
    rebuilt.select_anchors(&anchors).unwrap();
    assert_eq!(rebuilt.replay(&picks), Ok(6));
    assert_eq!(rebuilt.snapshot(), original.snapshot());
}

#[test]
fn snapshot_serializes_for_callers() {
    let mut engine = DraftEngine::new(fixture_roster(), DraftSettings::default()).unwrap();
    let anchors: Vec<PlayerId> = engine.roster()[..2].iter().map(|p| p.id.clone()).collect();
    engine.select_anchors(&anchors).unwrap();
    pick_next(&mut engine);

    let json = serde_json::to_string(&engine.snapshot()).unwrap();
    let back: teamdraft_core::draft::state::DraftState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, engine.snapshot());
}
