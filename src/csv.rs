use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::chips::{ChipCounts, DENOMINATIONS};
use crate::model::{ActionKind, Role, Seat, Transfer};

/// Errors that can occur when reading a session script
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized row kind '{kind}'")]
    UnrecognizedKind { line: usize, kind: String },

    #[error("line {line}: {kind} missing {field}")]
    MissingField {
        line: usize,
        kind: String,
        field: &'static str,
    },

    #[error("line {line}: invalid starting stack '{value}'")]
    InvalidStack { line: usize, value: String },

    #[error("line {line}: invalid chip counts '{value}'")]
    InvalidChips { line: usize, value: String },
}

/// One instruction of a session script, tagged with its game number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Seat {
        game: u32,
        seat: Seat,
    },
    Role {
        game: u32,
        role: Role,
        name: String,
    },
    Action {
        game: u32,
        player: String,
        action: ActionKind,
        chips: ChipCounts,
        confirm: bool,
    },
    Winner {
        game: u32,
        name: String,
    },
}

impl ScriptEvent {
    pub fn game(&self) -> u32 {
        match self {
            ScriptEvent::Seat { game, .. }
            | ScriptEvent::Role { game, .. }
            | ScriptEvent::Action { game, .. }
            | ScriptEvent::Winner { game, .. } => *game,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptRow {
    kind: String,
    game: u32,
    player: String,
    value: Option<String>,
    chips: Option<String>,
    confirm: Option<bool>,
}

/// Read a session script from a csv file
pub fn read_script(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<ScriptEvent, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<ScriptRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            parse_row(line, row)
        }))
}

fn parse_row(line: usize, row: ScriptRow) -> Result<ScriptEvent, CsvError> {
    let game = row.game;
    let kind = row.kind.to_lowercase();

    let role = match kind.as_str() {
        "dealer" => Some(Role::Dealer),
        "big_blind" => Some(Role::BigBlind),
        "small_blind" => Some(Role::SmallBlind),
        _ => None,
    };
    if let Some(role) = role {
        return Ok(ScriptEvent::Role {
            game,
            role,
            name: row.player,
        });
    }

    match kind.as_str() {
        "player" => {
            let value = row.value.ok_or_else(|| CsvError::MissingField {
                line,
                kind: row.kind.clone(),
                field: "starting stack",
            })?;
            let stack = value
                .parse::<i64>()
                .map_err(|_| CsvError::InvalidStack { line, value })?;
            Ok(ScriptEvent::Seat {
                game,
                seat: Seat::new(row.player, stack),
            })
        }
        "action" => {
            let value = row.value.ok_or_else(|| CsvError::MissingField {
                line,
                kind: row.kind.clone(),
                field: "action",
            })?;
            let Ok(action) = value.parse::<ActionKind>();
            let chips = parse_chips(line, row.chips.as_deref().unwrap_or_default())?;
            Ok(ScriptEvent::Action {
                game,
                player: row.player,
                action,
                chips,
                confirm: row.confirm.unwrap_or(false),
            })
        }
        "winner" => Ok(ScriptEvent::Winner {
            game,
            name: row.player,
        }),
        _ => Err(CsvError::UnrecognizedKind {
            line,
            kind: row.kind,
        }),
    }
}

/// Space-separated counts, one per denomination in ascending order.
fn parse_chips(line: usize, value: &str) -> Result<ChipCounts, CsvError> {
    let invalid = || CsvError::InvalidChips {
        line,
        value: value.to_string(),
    };

    let counts = value
        .split_whitespace()
        .map(|count| count.parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    if counts.len() > DENOMINATIONS.len() {
        return Err(invalid());
    }
    Ok(ChipCounts::from_counts(&counts))
}

/// Write settlement transfers in csv format
pub fn write_settlements<'a>(
    writer: impl io::Write,
    transfers: impl IntoIterator<Item = &'a Transfer>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for transfer in transfers {
        writer.serialize(transfer)?;
    }
    writer.flush()?;
    Ok(())
}
