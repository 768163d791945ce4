//! Serializable snapshots of a game.
//!
//! Field names are part of the export format and must not change.

use serde::Serialize;

use crate::Points;
use crate::model::{ActionKind, Balances, HistoryEntry, Round};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub starting_stack: Points,
    pub ending_stack: Points,
    pub total_bet: Points,
    /// `[round, amount]` pairs.
    pub bets: Vec<(Round, Points)>,
    /// `[round, action]` pairs.
    pub actions: Vec<(Round, ActionKind)>,
    pub went_negative_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub dealer: String,
    pub big_blind: String,
    pub small_blind: String,
    pub pot: Points,
    pub rounds_played: Round,
    pub winner: Option<String>,
    pub players: Vec<PlayerRecord>,
    pub history: Vec<HistoryEntry>,
    pub net_results: Balances,
    pub base_unit: Points,
    pub chip_denoms: Vec<u32>,
}
