//! Error types for game setup and round recording.

use thiserror::Error;

use crate::Points;
use crate::chips::ChipError;
use crate::model::{Role, Round};

/// Validation failure before a [`Game`](super::Game) exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least 2 players are required, got {0}")]
    InvalidPlayerCount(usize),

    #[error("starting balance for {0} must be positive, got {1}")]
    InvalidStartingBalance(String, Points),

    #[error("player {0} is seated twice")]
    DuplicatePlayer(String),

    #[error("{0} {1} is not one of the players")]
    UnknownRole(Role, String),

    #[error("no player roster has been configured for this session")]
    NoRoster,
}

/// A name that does not belong to any player of the game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown player name: {0:?}")]
pub struct UnknownPlayerError(pub String);

/// Error while recording actions or advancing rounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    UnknownPlayer(#[from] UnknownPlayerError),

    #[error("it is {expected}'s turn, not {got}'s")]
    OutOfTurn { expected: String, got: String },

    #[error("every player has acted in round {0}; advance the round first")]
    RoundComplete(Round),

    #[error("round {round} is incomplete: {acted} of {players} players acted")]
    RoundIncomplete {
        round: Round,
        acted: usize,
        players: usize,
    },

    #[error("invalid chips: {0}")]
    Chips(#[from] ChipError),

    #[error("bet by {0} would overflow the point ledger")]
    Overflow(String),
}
