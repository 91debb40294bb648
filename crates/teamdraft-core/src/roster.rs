// Roster loading from class-list CSV files.
//
// Expected header: `class,number,name,gender,<stat key>,<stat key>,...`.
// Stat columns are matched against the configured stat keys; other columns
// are ignored. Empty cells are missing data.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::player::{Category, PlayerId, PlayerRecord};
use crate::valuation::normalize::StatKey;

const CLASS_COLUMN: &str = "class";
const NUMBER_COLUMN: &str = "number";
const NAME_COLUMN: &str = "name";
const GENDER_COLUMN: &str = "gender";

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

/// Column positions resolved from the header row.
struct Columns {
    class: usize,
    number: usize,
    name: Option<usize>,
    gender: Option<usize>,
    stats: Vec<(String, usize)>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, stat_keys: &[StatKey]) -> Result<Self, RosterError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let class = find(CLASS_COLUMN)
            .ok_or_else(|| RosterError::Validation(format!("missing '{CLASS_COLUMN}' column")))?;
        let number = find(NUMBER_COLUMN)
            .ok_or_else(|| RosterError::Validation(format!("missing '{NUMBER_COLUMN}' column")))?;

        let mut stats = Vec::new();
        for sk in stat_keys {
            match find(&sk.key) {
                Some(idx) => stats.push((sk.key.clone(), idx)),
                None => warn!("roster has no column for stat '{}'", sk.key),
            }
        }

        Ok(Columns {
            class,
            number,
            name: find(NAME_COLUMN),
            gender: find(GENDER_COLUMN),
            stats,
        })
    }
}

fn parse_stat(cell: &str, key: &str, id: &PlayerId) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("player {}: unreadable value '{}' for '{}', treating as missing", id, cell, key);
            None
        }
    }
}

/// 1-based file line of a CSV error, or 0 when the reader has no position.
fn error_line(err: &csv::Error) -> u64 {
    err.position().map_or(0, |p| p.line())
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load a roster from any reader. `source` names the input in errors.
pub fn load_roster_from<R: Read>(
    rdr: R,
    stat_keys: &[StatKey],
    source: &str,
) -> Result<Vec<PlayerRecord>, RosterError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| RosterError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();
    let columns = Columns::resolve(&headers, stat_keys)?;

    let mut players = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("{}: skipping malformed line {}: {}", source, error_line(&e), e);
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let class = cell(columns.class);
        let number = cell(columns.number);
        if class.is_empty() || number.is_empty() {
            warn!("{}: skipping line {}: missing class or number", source, line);
            continue;
        }
        let Ok(seq) = number.parse::<u32>() else {
            warn!("{}: skipping line {}: invalid number '{}'", source, line, number);
            continue;
        };
        let id = PlayerId::from_class_seq(class, seq);
        if !seen.insert(id.clone()) {
            return Err(RosterError::Validation(format!(
                "duplicate player {id} in {source} (line {line})"
            )));
        }

        let name = columns
            .name
            .map(cell)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string());
        let category = columns
            .gender
            .and_then(|idx| Category::from_str_category(cell(idx)));

        let stats: HashMap<String, Option<f64>> = columns
            .stats
            .iter()
            .map(|(key, idx)| (key.clone(), parse_stat(cell(*idx), key, &id)))
            .collect();

        players.push(PlayerRecord {
            id,
            name,
            category,
            stats,
        });
    }

    if players.is_empty() {
        return Err(RosterError::Validation(format!(
            "{source} produced zero valid rows"
        )));
    }
    Ok(players)
}

/// Load a roster from a CSV file.
pub fn load_roster(path: &Path, stat_keys: &[StatKey]) -> Result<Vec<PlayerRecord>, RosterError> {
    let file = std::fs::File::open(path).map_err(|e| RosterError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_roster_from(file, stat_keys, &path.display().to_string())
}
