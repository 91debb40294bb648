// teamdraft entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Dispatch the subcommand

use anyhow::Context;
use clap::Parser;
use tracing::info;

use teamdraft_core::config::{self, Config};

mod command;
mod report;
mod script;

use command::CommandArgs;

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let base_dir = match &args.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let seeded = config::ensure_config_file(&base_dir).context("failed to prepare config")?;
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;

    init_tracing(&base_dir, &config)?;
    if let Some(path) = seeded {
        info!("Created {} from defaults", path.display());
    }
    info!(
        "teamdraft starting: {} stat keys, category balance {}",
        config.stats.len(),
        if config.draft.enforce_category_balance { "on" } else { "off" }
    );

    command::run(args, &base_dir, &config)
}

fn init_tracing(base_dir: &std::path::Path, config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join(&config.logging.dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("teamdraft.log"))
        .context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
