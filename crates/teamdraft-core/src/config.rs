// Configuration loading and parsing (teamdraft.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::engine::{DraftSettings, ANCHOR_PLACEHOLDER, MAX_ANCHORS};
use crate::valuation::normalize::StatKey;

/// Name of the config file under `config/` (and its template under `defaults/`).
pub const CONFIG_FILE: &str = "teamdraft.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("cannot seed config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Recognized stats, in display order.
    pub stats: Vec<StatKey>,
    pub draft: DraftSettings,
    pub logging: LoggingConfig,
    pub data_paths: DataPaths,
}

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    stats: Vec<StatKey>,
    #[serde(default)]
    draft: DraftSettings,
    logging: LoggingConfig,
    data: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
    /// Directory the log file is written to.
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/teamdraft.toml` relative to `base_dir`.
///
/// Does not seed from `defaults/`; see [`ensure_config_file`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(base_dir);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Config {
        stats: file.stats,
        draft: file.draft,
        logging: file.logging,
        data_paths: file.data,
    })
}

/// Path of the live config file under `base_dir`.
pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join(CONFIG_FILE)
}

/// Seed `config/teamdraft.toml` from `defaults/` on first run.
///
/// Returns the path written, or `None` when a config file already exists.
/// An existing file is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = config_path(base_dir);
    if target.exists() {
        return Ok(None);
    }

    let template = base_dir.join("defaults").join(CONFIG_FILE);
    if !template.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {} in {} and no template at {}",
                CONFIG_FILE,
                base_dir.join("config").display(),
                template.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("cannot create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&template, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("cannot copy {} to {}: {e}", template.display(), target.display()),
    })?;
    Ok(Some(target))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validation(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.stats.is_empty() {
        return Err(validation("stats", "at least one stat must be configured"));
    }

    let mut keys = HashSet::new();
    for (i, stat) in config.stats.iter().enumerate() {
        if stat.key.trim().is_empty() {
            return Err(validation(format!("stats[{i}].key"), "must not be empty"));
        }
        if !keys.insert(stat.key.as_str()) {
            return Err(validation(
                format!("stats[{i}].key"),
                format!("duplicate stat key '{}'", stat.key),
            ));
        }
    }

    let colors = &config.draft.team_colors;
    if colors.len() < MAX_ANCHORS {
        return Err(validation(
            "draft.team_colors",
            format!("need at least {MAX_ANCHORS} colors, got {}", colors.len()),
        ));
    }

    if !config.draft.team_name_format.contains(ANCHOR_PLACEHOLDER) {
        return Err(validation(
            "draft.team_name_format",
            format!("must contain the {ANCHOR_PLACEHOLDER} placeholder"),
        ));
    }

    if config.logging.filter.trim().is_empty() {
        return Err(validation("logging.filter", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
