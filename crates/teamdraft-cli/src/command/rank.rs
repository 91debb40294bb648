use std::path::{Path, PathBuf};

use teamdraft_core::config::Config;

use crate::report;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RankArg {
    /// Roster CSV (default: `data.roster` from the config)
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Also print each normalized stat
    #[arg(long)]
    detail: bool,
}

pub(crate) fn run(arg: &RankArg, base_dir: &Path, config: &Config) -> anyhow::Result<()> {
    let scored = super::load_scored_roster(arg.roster.as_deref(), base_dir, config)?;
    print!("{}", report::ranking(&scored, &config.stats, arg.detail));
    Ok(())
}
