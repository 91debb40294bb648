// Draft scripts: one command per line.
//
//   <player_id>            pick for the team on the clock
//   <player_id> <team_id>  pick for a named team (turn is still checked)
//   undo                   rewind the latest pick
//
// Blank lines and lines starting with `#` are ignored.

use anyhow::bail;

use teamdraft_core::draft::state::TeamId;
use teamdraft_core::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Pick {
        player: PlayerId,
        team: Option<TeamId>,
    },
    Undo,
}

/// A parsed command with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: ScriptCommand,
}

pub fn parse_line(text: &str) -> anyhow::Result<Option<ScriptCommand>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    let command = match words.as_slice() {
        [w] if w.eq_ignore_ascii_case("undo") => ScriptCommand::Undo,
        [player] => ScriptCommand::Pick {
            player: PlayerId::from(*player),
            team: None,
        },
        [player, team] => ScriptCommand::Pick {
            player: PlayerId::from(*player),
            team: Some(TeamId::from(*team)),
        },
        _ => bail!("expected '<player_id> [team_id]' or 'undo', got '{text}'"),
    };
    Ok(Some(command))
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        match parse_line(raw) {
            Ok(Some(command)) => lines.push(ScriptLine { line, command }),
            Ok(None) => {}
            Err(e) => bail!("line {line}: {e}"),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_picks_and_undo() {
        let script = "\
# opening picks
5-2-09

5-2-01 team-5-2-03
UNDO
";
        let lines = parse_script(script).unwrap();
        assert_eq!(
            lines,
            vec![
                ScriptLine {
                    line: 2,
                    command: ScriptCommand::Pick {
                        player: PlayerId::from("5-2-09"),
                        team: None,
                    },
                },
                ScriptLine {
                    line: 4,
                    command: ScriptCommand::Pick {
                        player: PlayerId::from("5-2-01"),
                        team: Some(TeamId::from("team-5-2-03")),
                    },
                },
                ScriptLine {
                    line: 5,
                    command: ScriptCommand::Undo,
                },
            ]
        );
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(
            parse_line("   undo  ").unwrap(),
            Some(ScriptCommand::Undo)
        );
        assert_eq!(parse_line("   # note").unwrap(), None);
    }

    #[test]
    fn too_many_words_reports_line() {
        let err = parse_script("a\nb c d\n").unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }
}
