//! Scripted session driver.
//!
//! Replays [`ScriptEvent`]s against a [`Session`]: setup rows are buffered
//! per game, the game starts on its first action (or winner) row, and rounds
//! advance as soon as every player has acted. A failing row is logged and
//! skipped; the run continues with the next row.

use thiserror::Error;
use tracing::{info, warn};

use crate::Points;
use crate::csv::ScriptEvent;
use crate::game::{Game, GameError, RecordOutcome, SetupError, UnknownPlayerError};
use crate::model::{Role, Seat};
use crate::session::Session;

/// Error while replaying a script row.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("{0}")]
    Game(#[from] GameError),

    #[error(transparent)]
    UnknownPlayer(#[from] UnknownPlayerError),

    #[error("game {0} has already started; setup rows must come before its actions")]
    SetupAfterStart(u32),

    #[error("game {0} is closed; a later game has started")]
    GameClosed(u32),

    #[error("game {game}: no {role} assigned")]
    MissingRole { game: u32, role: Role },

    #[error(
        "bet by {player} would exceed their starting stack ({projected} > {starting_stack}) and was not confirmed"
    )]
    Unconfirmed {
        player: String,
        projected: Points,
        starting_stack: Points,
    },
}

/// Setup rows seen for a game that has not started yet.
#[derive(Debug, Default)]
struct Pending {
    game: u32,
    seats: Vec<Seat>,
    dealer: Option<String>,
    big_blind: Option<String>,
    small_blind: Option<String>,
}

impl Pending {
    fn new(game: u32) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct Runner {
    session: Session,
    active: Option<u32>,
    pending: Option<Pending>,
}

/// Public API
impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Replay every event; failing rows are skipped.
    pub fn run(&mut self, events: impl IntoIterator<Item = ScriptEvent>) {
        for event in events {
            // a bad row should not stop the session, the failure is already logged
            let _ = self.apply(event);
        }
    }

    /// Replay a single event.
    pub fn apply(&mut self, event: ScriptEvent) -> Result<(), RunnerError> {
        let game = event.game();
        let result = self.apply_event(event);
        if let Err(e) = &result {
            warn!(game, reason = %e, "script row skipped");
        }
        result
    }
}

/// Private API
impl Runner {
    fn apply_event(&mut self, event: ScriptEvent) -> Result<(), RunnerError> {
        match event {
            ScriptEvent::Seat { game, seat } => {
                self.pending_for(game)?.seats.push(seat);
            }
            ScriptEvent::Role { game, role, name } => {
                let pending = self.pending_for(game)?;
                let slot = match role {
                    Role::Dealer => &mut pending.dealer,
                    Role::BigBlind => &mut pending.big_blind,
                    Role::SmallBlind => &mut pending.small_blind,
                };
                *slot = Some(name);
            }
            ScriptEvent::Action {
                game,
                player,
                action,
                chips,
                confirm,
            } => {
                let current = self.game_for(game)?;
                match current.record_action(&player, action, &chips, confirm)? {
                    RecordOutcome::Committed { .. } => {
                        if current.is_round_complete() {
                            let round = current.advance_round()?;
                            info!(game, round, "round started");
                        }
                    }
                    RecordOutcome::NeedsConfirmation {
                        projected,
                        starting_stack,
                    } => {
                        return Err(RunnerError::Unconfirmed {
                            player,
                            projected,
                            starting_stack,
                        });
                    }
                }
            }
            ScriptEvent::Winner { game, name } => {
                self.game_for(game)?.set_winner(&name)?;
            }
        }
        Ok(())
    }

    /// Setup buffer for `game`, replacing a buffer left by an unstarted game.
    fn pending_for(&mut self, game: u32) -> Result<&mut Pending, RunnerError> {
        if self.active.is_some_and(|active| game <= active) {
            return Err(RunnerError::SetupAfterStart(game));
        }
        self.discard_stale(game);
        Ok(self.pending.get_or_insert_with(|| Pending::new(game)))
    }

    /// Drop setup rows buffered for a game other than `game`.
    fn discard_stale(&mut self, game: u32) {
        if let Some(stale) = self.pending.take_if(|p| p.game != game) {
            warn!(game = stale.game, "game setup discarded without any actions");
        }
    }

    /// The running game numbered `game`, starting it if needed.
    fn game_for(&mut self, game: u32) -> Result<&mut Game, RunnerError> {
        match self.active {
            Some(active) if active == game => {}
            Some(active) if game < active => return Err(RunnerError::GameClosed(game)),
            _ => self.start(game)?,
        }
        self.session
            .current_game_mut()
            .ok_or(RunnerError::GameClosed(game))
    }

    /// Start `game` from its setup rows. On failure the session is untouched
    /// and the setup rows stay buffered.
    fn start(&mut self, game: u32) -> Result<(), RunnerError> {
        self.discard_stale(game);
        let pending = self.pending.get_or_insert_with(|| Pending::new(game));

        let missing = |role| RunnerError::MissingRole { game, role };
        let dealer = pending.dealer.as_deref().ok_or_else(|| missing(Role::Dealer))?;
        let big_blind = pending.big_blind.as_deref().ok_or_else(|| missing(Role::BigBlind))?;
        let small_blind = pending
            .small_blind
            .as_deref()
            .ok_or_else(|| missing(Role::SmallBlind))?;

        // no player rows: keep the previous game's roster
        if pending.seats.is_empty() {
            self.session.start_game(dealer, big_blind, small_blind)?;
        } else {
            let seats = pending.seats.clone();
            self.session
                .start_game_with_roster(seats, dealer, big_blind, small_blind)?;
        }

        self.pending = None;
        self.active = Some(game);
        Ok(())
    }
}
