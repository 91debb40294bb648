use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use teamdraft_core::config::Config;
use teamdraft_core::draft::engine::{DraftEngine, DraftSettings};
use teamdraft_core::player::PlayerId;

use crate::report;
use crate::script::{self, ScriptCommand, ScriptLine};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DraftArg {
    /// Anchor player ids, comma separated (2 to 4)
    #[arg(long, value_delimiter = ',', required = true)]
    anchors: Vec<String>,
    /// Roster CSV (default: `data.roster` from the config)
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Draft script; without one every team takes its best eligible player
    #[arg(long)]
    script: Option<PathBuf>,
    /// Disable the gender quota check for this session
    #[arg(long)]
    no_balance: bool,
    /// Where to write the JSON export
    #[arg(long, default_value = "draft.json")]
    out: PathBuf,
}

pub(crate) fn run(arg: &DraftArg, base_dir: &Path, config: &Config) -> anyhow::Result<()> {
    let scored = super::load_scored_roster(arg.roster.as_deref(), base_dir, config)?;

    let settings = DraftSettings {
        enforce_category_balance: config.draft.enforce_category_balance && !arg.no_balance,
        ..config.draft.clone()
    };
    let mut engine = DraftEngine::new(scored, settings).context("invalid roster")?;

    let anchors: Vec<PlayerId> = arg
        .anchors
        .iter()
        .map(|s| PlayerId::from(s.trim()))
        .collect();
    engine
        .select_anchors(&anchors)
        .context("failed to start draft")?;

    match &arg.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read script {}", path.display()))?;
            let lines = script::parse_script(&text)
                .with_context(|| format!("invalid script {}", path.display()))?;
            run_script(&mut engine, &lines);
        }
        None => auto_draft(&mut engine),
    }

    print!("{}", report::rosters(&engine));

    report::write_export(&arg.out, &engine)?;
    println!("\nWrote {}", arg.out.display());
    info!("Exported draft to {}", arg.out.display());
    Ok(())
}

/// Apply script commands in order. Rejected lines are reported and skipped.
fn run_script(engine: &mut DraftEngine, lines: &[ScriptLine]) {
    for ScriptLine { line, command } in lines {
        match command {
            ScriptCommand::Undo => match engine.undo() {
                Some((player, team)) => println!("line {line}: undid {player} -> {team}"),
                None => println!("line {line}: nothing to undo"),
            },
            ScriptCommand::Pick { player, team } => {
                let team = match team.clone().or_else(|| engine.current_turn().cloned()) {
                    Some(t) => t,
                    None => {
                        println!("line {line}: skipped {player}, draft is {}", engine.phase());
                        continue;
                    }
                };
                match engine.assign(player, &team) {
                    Ok(()) => println!("line {line}: {player} -> {team}"),
                    Err(e) => {
                        warn!("script line {} rejected: {}", line, e);
                        println!("line {line}: rejected {player} -> {team}: {e}");
                    }
                }
            }
        }
    }
}

/// Let each team take its highest-ranked eligible player until done.
fn auto_draft(engine: &mut DraftEngine) {
    while let Some(team) = engine.current_turn().cloned() {
        let Some(player) = engine.eligible_players().first().map(|p| p.id.clone()) else {
            warn!("no legal pick left for {}", team);
            println!("No legal pick left for {team}; stopping");
            return;
        };
        if let Err(e) = engine.assign(&player, &team) {
            warn!("auto pick {} -> {} rejected: {}", player, team, e);
            return;
        }
        println!("{player} -> {team}");
    }
}
