use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use teamdraft_core::config::Config;
use teamdraft_core::player::ScoredPlayer;
use teamdraft_core::roster;
use teamdraft_core::valuation::normalize::normalize;

use self::{draft::DraftArg, rank::RankArg};

mod draft;
mod rank;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Fair team assembly from fitness test results", long_about = None)]
pub struct CommandArgs {
    /// Directory holding `config/` and `defaults/` (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print the scored roster in rank order
    Rank(#[clap(flatten)] RankArg),
    /// Run a draft session from a script, or auto-draft without one
    Draft(#[clap(flatten)] DraftArg),
}

pub fn run(args: CommandArgs, base_dir: &Path, config: &Config) -> anyhow::Result<()> {
    match args.mode {
        Mode::Rank(arg) => rank::run(&arg, base_dir, config)?,
        Mode::Draft(arg) => draft::run(&arg, base_dir, config)?,
    }
    Ok(())
}

/// Load the roster CSV and score it. `override_path` wins over the configured
/// path; relative paths resolve against `base_dir`.
fn load_scored_roster(
    override_path: Option<&Path>,
    base_dir: &Path,
    config: &Config,
) -> anyhow::Result<Vec<ScoredPlayer>> {
    let path = match override_path {
        Some(p) => base_dir.join(p),
        None => base_dir.join(&config.data_paths.roster),
    };
    let records = roster::load_roster(&path, &config.stats)
        .with_context(|| format!("failed to load roster {}", path.display()))?;
    tracing::info!("Loaded {} players from {}", records.len(), path.display());
    Ok(normalize(&records, &config.stats))
}
