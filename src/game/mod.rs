//! Game ledger.
//!
//! A game owns its players, the pot and the ordered action history. Rounds are
//! recorded one player at a time in seat order; once every player has acted
//! the caller advances the round. Declaring a winner computes each player's
//! net result for the game.

use tracing::{info, warn};

use crate::Points;
use crate::chips::{ChipCounts, ChipMapping};
use crate::model::{ActionKind, Balances, HistoryEntry, Role, Round, Seat};

mod error;
pub use error::{GameError, SetupError, UnknownPlayerError};

mod player;
pub use player::Player;

mod record;
pub use record::{GameRecord, PlayerRecord};

/// Result of offering an action to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The action was applied to the ledger and the pot.
    Committed { amount: Points, pot_after: Points },
    /// The bet would take the player past their starting stack. Nothing was
    /// recorded; resubmit with confirmation or with different chips.
    NeedsConfirmation {
        projected: Points,
        starting_stack: Points,
    },
}

#[derive(Debug, Clone)]
pub struct Game {
    players: Vec<Player>,
    dealer: String,
    big_blind: String,
    small_blind: String,
    mapping: ChipMapping,
    pot: Points,
    round: Round,
    /// Players that have acted in the current round, in seat order.
    acted: usize,
    history: Vec<HistoryEntry>,
    winner: Option<String>,
    net_results: Option<Balances>,
}

/// Public API
impl Game {
    /// Seat the players (seat order is turn order) and fix the chip mapping
    /// from the smallest starting stack.
    pub fn new(
        seats: &[Seat],
        dealer: &str,
        big_blind: &str,
        small_blind: &str,
    ) -> Result<Self, SetupError> {
        validate_roster(seats)?;
        for (role, name) in [
            (Role::Dealer, dealer),
            (Role::BigBlind, big_blind),
            (Role::SmallBlind, small_blind),
        ] {
            if !seats.iter().any(|s| s.name == name) {
                return Err(SetupError::UnknownRole(role, name.to_string()));
            }
        }

        // validate_roster guarantees at least two seats
        let min_stack = seats
            .iter()
            .map(|s| s.starting_stack)
            .min()
            .unwrap_or_default();
        let mapping = ChipMapping::for_min_stack(min_stack);

        info!(
            players = seats.len(),
            min_stack = %min_stack,
            base_unit = %mapping.base_unit(),
            fallback = mapping.is_fallback(),
            chip_values = ?mapping
                .chip_values()
                .iter()
                .map(|(denom, value)| (*denom, value.value()))
                .collect::<Vec<_>>(),
            "game created"
        );

        Ok(Self {
            players: seats
                .iter()
                .map(|s| Player::new(s.name.clone(), s.starting_stack))
                .collect(),
            dealer: dealer.to_string(),
            big_blind: big_blind.to_string(),
            small_blind: small_blind.to_string(),
            mapping,
            pot: Points::ZERO,
            round: 1,
            acted: 0,
            history: Vec::new(),
            winner: None,
            net_results: None,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Result<&Player, UnknownPlayerError> {
        self.players
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| UnknownPlayerError(name.to_string()))
    }

    pub fn dealer(&self) -> &str {
        &self.dealer
    }

    pub fn big_blind(&self) -> &str {
        &self.big_blind
    }

    pub fn small_blind(&self) -> &str {
        &self.small_blind
    }

    pub fn mapping(&self) -> &ChipMapping {
        &self.mapping
    }

    pub fn pot(&self) -> Points {
        self.pot
    }

    /// The round currently being recorded.
    pub fn round(&self) -> Round {
        self.round
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Per-player net results, set once a winner is declared.
    pub fn net_results(&self) -> Option<&Balances> {
        self.net_results.as_ref()
    }

    /// The player expected to act next, or `None` once the round is complete.
    pub fn next_player(&self) -> Option<&Player> {
        self.players.get(self.acted)
    }

    pub fn is_round_complete(&self) -> bool {
        self.acted == self.players.len()
    }

    /// Whether betting `amount` more would take `player` past their starting stack.
    pub fn would_exceed_starting_stack(
        &self,
        player: &str,
        amount: Points,
    ) -> Result<bool, UnknownPlayerError> {
        Ok(self.player(player)?.would_exceed_starting_stack(amount))
    }

    /// Record one player's action for the current round.
    ///
    /// Betting actions convert `chips` through the game's mapping; other
    /// actions carry no points and ignore `chips`. A bet that would take the
    /// player past their starting stack is only committed when
    /// `override_confirmed` is set, and then latches the player's override flag.
    pub fn record_action(
        &mut self,
        player: &str,
        action: ActionKind,
        chips: &ChipCounts,
        override_confirmed: bool,
    ) -> Result<RecordOutcome, GameError> {
        let index = self.seat_of(player)?;
        if self.is_round_complete() {
            return Err(GameError::RoundComplete(self.round));
        }
        if index != self.acted {
            return Err(GameError::OutOfTurn {
                expected: self.players[self.acted].name().to_string(),
                got: player.to_string(),
            });
        }

        let amount = if action.is_betting() {
            self.mapping.convert(chips)?
        } else {
            Points::ZERO
        };

        let overflow = || GameError::Overflow(player.to_string());
        let pot_after = self.pot.checked_add(amount).ok_or_else(overflow)?;
        let seat = &mut self.players[index];
        let projected = seat.projected_total_bet(amount).ok_or_else(overflow)?;

        if projected > seat.starting_stack() {
            if !override_confirmed {
                warn!(
                    player,
                    projected = %projected,
                    starting_stack = %seat.starting_stack(),
                    "bet exceeds starting stack, confirmation required"
                );
                return Ok(RecordOutcome::NeedsConfirmation {
                    projected,
                    starting_stack: seat.starting_stack(),
                });
            }
            warn!(player, projected = %projected, "bet past starting stack confirmed");
            seat.mark_override();
        }

        seat.record_action(self.round, action.clone(), amount);
        self.pot = pot_after;
        self.acted += 1;
        self.history.push(HistoryEntry {
            round: self.round,
            player: player.to_string(),
            action: action.clone(),
            amount,
            pot_after,
        });

        info!(
            round = self.round,
            player,
            action = %action,
            amount = %amount,
            pot = %self.pot,
            "action recorded"
        );

        Ok(RecordOutcome::Committed {
            amount,
            pot_after: self.pot,
        })
    }

    /// Move to the next round once every player has acted.
    pub fn advance_round(&mut self) -> Result<Round, GameError> {
        if !self.is_round_complete() {
            return Err(GameError::RoundIncomplete {
                round: self.round,
                acted: self.acted,
                players: self.players.len(),
            });
        }
        self.round += 1;
        self.acted = 0;
        Ok(self.round)
    }

    /// Declare the winner and compute net results: every player loses what
    /// they bet, and the winner additionally collects the pot.
    ///
    /// Calling this again recomputes and overwrites the results.
    pub fn set_winner(&mut self, name: &str) -> Result<&Balances, UnknownPlayerError> {
        self.seat_of(name)?;

        let net_results: Balances = self
            .players
            .iter()
            .map(|p| {
                let mut net = -p.total_bet();
                if p.name() == name {
                    net += self.pot;
                }
                (p.name(), net)
            })
            .collect();

        info!(winner = name, pot = %self.pot, "winner set");

        self.winner = Some(name.to_string());
        Ok(self.net_results.insert(net_results))
    }

    /// Snapshot the game for export.
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            dealer: self.dealer.clone(),
            big_blind: self.big_blind.clone(),
            small_blind: self.small_blind.clone(),
            pot: self.pot,
            rounds_played: self.round - 1,
            winner: self.winner.clone(),
            players: self.players.iter().map(Player::to_record).collect(),
            history: self.history.clone(),
            net_results: self.net_results.clone().unwrap_or_default(),
            base_unit: self.mapping.base_unit(),
            chip_denoms: self.mapping.denoms().to_vec(),
        }
    }
}

/// Private API
impl Game {
    fn seat_of(&self, name: &str) -> Result<usize, UnknownPlayerError> {
        self.players
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| UnknownPlayerError(name.to_string()))
    }
}

/// Check a roster before any game is built from it.
pub fn validate_roster(seats: &[Seat]) -> Result<(), SetupError> {
    if seats.len() < 2 {
        return Err(SetupError::InvalidPlayerCount(seats.len()));
    }
    for (i, seat) in seats.iter().enumerate() {
        if !seat.starting_stack.is_positive() {
            return Err(SetupError::InvalidStartingBalance(
                seat.name.clone(),
                seat.starting_stack,
            ));
        }
        if seats[..i].iter().any(|s| s.name == seat.name) {
            return Err(SetupError::DuplicatePlayer(seat.name.clone()));
        }
    }
    Ok(())
}
