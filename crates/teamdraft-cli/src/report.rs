// Plain-text reports and the JSON draft export.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use teamdraft_core::draft::engine::{DraftEngine, DraftPhase};
use teamdraft_core::draft::quota::QuotaSpec;
use teamdraft_core::draft::state::{DraftState, TeamId};
use teamdraft_core::player::{Category, PlayerId, ScoredPlayer};
use teamdraft_core::valuation::normalize::StatKey;

fn category_label(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Male) => "M",
        Some(Category::Female) => "F",
        None => "-",
    }
}

/// The scored roster, one line per player.
pub fn ranking(players: &[ScoredPlayer], stat_keys: &[StatKey], detail: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<8} {:<10} {:<20} {:>3} {:>6}", "RANK", "ID", "NAME", "G", "SCORE");
    if detail {
        for sk in stat_keys {
            let _ = write!(out, " {:>8}", truncate(&sk.key, 8));
        }
    }
    out.push('\n');

    for p in players {
        let _ = write!(
            out,
            "{:<8} {:<10} {:<20} {:>3} {:>6.1}",
            p.rank_label,
            p.id,
            truncate(&p.name, 20),
            category_label(p.category),
            p.aggregate_score
        );
        if detail {
            for sk in stat_keys {
                let v = p.normalized_stats.get(&sk.key).copied().unwrap_or(0.0);
                let _ = write!(out, " {v:>8.1}");
            }
        }
        out.push('\n');
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Team rosters, quota usage and whatever is left in the pool.
pub fn rosters(engine: &DraftEngine) -> String {
    let state = engine.state();
    let mut out = String::new();
    let _ = writeln!(out, "Draft {} after {} picks", engine.phase(), engine.moves().len());
    if let Some(quota) = engine.quota() {
        let _ = writeln!(
            out,
            "Quota: male {}..={}, female {}..={}",
            quota.male.min, quota.male.max, quota.female.min, quota.female.max
        );
    }

    for team in &state.teams {
        let target = state.target_slots.get(&team.team_id).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "\n{} [{}] {} ({}/{} players, {}M {}F)",
            team.name,
            team.color,
            team.team_id,
            team.size(),
            target,
            team.category_counts.get(Category::Male),
            team.category_counts.get(Category::Female),
        );
        for id in &team.members {
            let _ = writeln!(out, "  {}", member_line(engine, id, id == &team.anchor_id));
        }
    }

    if !state.unassigned.is_empty() {
        let _ = writeln!(out, "\nUnassigned ({}):", state.unassigned.len());
        for p in engine.roster().iter().filter(|p| state.unassigned.contains(&p.id)) {
            let _ = writeln!(out, "  {}", member_line(engine, &p.id, false));
        }
    }
    out
}

fn member_line(engine: &DraftEngine, id: &PlayerId, anchor: bool) -> String {
    let marker = if anchor { "*" } else { " " };
    match engine.player(id) {
        Some(p) => format!(
            "{marker} {:<10} {:<20} {} {:>5.1} ({})",
            p.id,
            p.name,
            category_label(p.category),
            p.aggregate_score,
            p.rank_label
        ),
        None => format!("{marker} {id}"),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PickRecord<'a> {
    pub round: u32,
    pub player_id: &'a PlayerId,
    pub team_id: &'a TeamId,
}

/// Everything a caller needs to persist or audit a session.
#[derive(Debug, Serialize)]
pub struct DraftExport<'a> {
    pub exported_at: DateTime<Utc>,
    pub phase: DraftPhase,
    pub quota: Option<&'a QuotaSpec>,
    pub picks: Vec<PickRecord<'a>>,
    pub state: &'a DraftState,
}

impl<'a> DraftExport<'a> {
    pub fn new(engine: &'a DraftEngine, exported_at: DateTime<Utc>) -> Self {
        DraftExport {
            exported_at,
            phase: engine.phase(),
            quota: engine.quota(),
            picks: engine
                .moves()
                .iter()
                .map(|m| PickRecord {
                    round: m.before.round,
                    player_id: &m.player_id,
                    team_id: &m.team_id,
                })
                .collect(),
            state: engine.state(),
        }
    }
}

pub fn write_export(path: &Path, engine: &DraftEngine) -> anyhow::Result<()> {
    let export = DraftExport::new(engine, Utc::now());
    let json = serde_json::to_string_pretty(&export).context("failed to serialize draft")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
