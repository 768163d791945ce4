//! A session: several games played by the same table, settled together.

use serde::Serialize;
use tracing::info;

use crate::game::{Game, GameRecord, SetupError, validate_roster};
use crate::model::{Balances, Seat, Transfer};
use crate::settlement::{aggregate_net_totals, calculate_settlements};

/// Export of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub games: Vec<GameRecord>,
    pub net_totals: Balances,
    pub settlements: Vec<Transfer>,
}

/// Build the session export from its parts.
pub fn serialize_session(
    games: &[Game],
    net_totals: &Balances,
    settlements: &[Transfer],
) -> SessionRecord {
    SessionRecord {
        games: games.iter().map(Game::to_record).collect(),
        net_totals: net_totals.clone(),
        settlements: settlements.to_vec(),
    }
}

/// Games of one session, with the roster reused from game to game.
#[derive(Debug, Default)]
pub struct Session {
    roster: Option<Vec<Seat>>,
    games: Vec<Game>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the players (and their per-game starting balance) for every
    /// following game, until replaced.
    pub fn set_roster(&mut self, seats: Vec<Seat>) -> Result<(), SetupError> {
        validate_roster(&seats)?;
        info!(players = seats.len(), "roster configured");
        self.roster = Some(seats);
        Ok(())
    }

    pub fn roster(&self) -> Option<&[Seat]> {
        self.roster.as_deref()
    }

    /// Start a new game with the current roster.
    pub fn start_game(
        &mut self,
        dealer: &str,
        big_blind: &str,
        small_blind: &str,
    ) -> Result<&mut Game, SetupError> {
        let seats = self.roster.as_deref().ok_or(SetupError::NoRoster)?;
        let game = Game::new(seats, dealer, big_blind, small_blind)?;
        Ok(self.push_game(game))
    }

    /// Start a new game with a new roster. The roster replaces the current
    /// one only if the game could be set up.
    pub fn start_game_with_roster(
        &mut self,
        seats: Vec<Seat>,
        dealer: &str,
        big_blind: &str,
        small_blind: &str,
    ) -> Result<&mut Game, SetupError> {
        let game = Game::new(&seats, dealer, big_blind, small_blind)?;
        info!(players = seats.len(), "roster configured");
        self.roster = Some(seats);
        Ok(self.push_game(game))
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// The most recently started game.
    pub fn current_game_mut(&mut self) -> Option<&mut Game> {
        self.games.last_mut()
    }

    pub fn net_totals(&self) -> Balances {
        aggregate_net_totals(&self.games)
    }

    pub fn settlements(&self) -> Vec<Transfer> {
        calculate_settlements(&self.net_totals())
    }

    pub fn to_record(&self) -> SessionRecord {
        let net_totals = self.net_totals();
        let settlements = calculate_settlements(&net_totals);
        serialize_session(&self.games, &net_totals, &settlements)
    }

    fn push_game(&mut self, game: Game) -> &mut Game {
        let index = self.games.len();
        self.games.push(game);
        info!(game = index + 1, "game started");
        &mut self.games[index]
    }
}
