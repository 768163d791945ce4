use crate::Points;
use crate::model::{ActionEntry, ActionKind, BetEntry, Round};

use super::record::PlayerRecord;

/// A player's ledger for one game.
///
/// `stack` always equals `starting_stack` minus the sum of the bet log.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    starting_stack: Points,
    stack: Points,
    bets: Vec<BetEntry>,
    actions: Vec<ActionEntry>,
    went_negative_override: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, starting_stack: Points) -> Self {
        Self {
            name: name.into(),
            starting_stack,
            stack: starting_stack,
            bets: Vec::new(),
            actions: Vec::new(),
            went_negative_override: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn starting_stack(&self) -> Points {
        self.starting_stack
    }

    /// Current balance after every recorded bet.
    pub fn stack(&self) -> Points {
        self.stack
    }

    pub fn bets(&self) -> &[BetEntry] {
        &self.bets
    }

    pub fn actions(&self) -> &[ActionEntry] {
        &self.actions
    }

    pub fn went_negative_override(&self) -> bool {
        self.went_negative_override
    }

    pub fn total_bet(&self) -> Points {
        self.bets.iter().map(|bet| bet.amount).sum()
    }

    /// Cumulative bet after betting `amount` more, `None` on overflow.
    pub fn projected_total_bet(&self, amount: Points) -> Option<Points> {
        self.total_bet().checked_add(amount)
    }

    /// Whether betting `amount` more would take the cumulative bet past the starting stack.
    pub fn would_exceed_starting_stack(&self, amount: Points) -> bool {
        self.projected_total_bet(amount)
            .is_none_or(|projected| projected > self.starting_stack)
    }

    /// Append to both logs and debit the stack. `amount` must be non-negative.
    pub fn record_action(&mut self, round: Round, action: ActionKind, amount: Points) {
        debug_assert!(!amount.is_negative(), "bet amounts are validated upstream");
        self.bets.push(BetEntry { round, amount });
        self.actions.push(ActionEntry { round, action });
        self.stack -= amount;
    }

    /// Latch the override flag; it is never cleared.
    pub(crate) fn mark_override(&mut self) {
        self.went_negative_override = true;
    }

    pub fn to_record(&self) -> PlayerRecord {
        PlayerRecord {
            name: self.name.clone(),
            starting_stack: self.starting_stack,
            ending_stack: self.stack,
            total_bet: self.total_bet(),
            bets: self.bets.iter().map(|b| (b.round, b.amount)).collect(),
            actions: self
                .actions
                .iter()
                .map(|a| (a.round, a.action.clone()))
                .collect(),
            went_negative_override: self.went_negative_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(stack: i64) -> Player {
        Player::new("Alice", Points::new(stack))
    }

    #[test]
    fn new_player_is_untouched() {
        let p = player(100);
        assert_eq!(p.stack(), Points::new(100));
        assert_eq!(p.total_bet(), Points::ZERO);
        assert!(p.bets().is_empty());
        assert!(p.actions().is_empty());
        assert!(!p.went_negative_override());
    }

    #[test]
    fn record_action_debits_stack_and_appends_logs() {
        let mut p = player(100);
        p.record_action(1, ActionKind::Bet, Points::new(20));
        p.record_action(1, ActionKind::Check, Points::ZERO);
        p.record_action(2, ActionKind::Raise, Points::new(30));

        assert_eq!(p.total_bet(), Points::new(50));
        assert_eq!(p.stack(), p.starting_stack() - p.total_bet());
        assert_eq!(p.bets().len(), 3);
        assert_eq!(
            p.actions()[2],
            ActionEntry {
                round: 2,
                action: ActionKind::Raise
            }
        );
    }

    #[test]
    fn stack_may_go_negative() {
        let mut p = player(10);
        p.record_action(1, ActionKind::AllIn, Points::new(15));
        assert_eq!(p.stack(), Points::new(-5));
    }

    #[test]
    fn exceed_check_is_strict() {
        let mut p = player(100);
        p.record_action(1, ActionKind::Bet, Points::new(60));
        assert!(!p.would_exceed_starting_stack(Points::new(40)));
        assert!(p.would_exceed_starting_stack(Points::new(41)));
    }

    #[test]
    fn overflowing_projection_exceeds() {
        let mut p = player(100);
        p.record_action(1, ActionKind::Bet, Points::new(10));
        assert_eq!(p.projected_total_bet(Points::new(i64::MAX)), None);
        assert!(p.would_exceed_starting_stack(Points::new(i64::MAX)));
    }

    #[test]
    fn override_flag_latches() {
        let mut p = player(100);
        p.mark_override();
        p.record_action(1, ActionKind::Fold, Points::ZERO);
        assert!(p.went_negative_override());
    }

    #[test]
    fn record_view() {
        let mut p = player(100);
        p.record_action(1, ActionKind::Call, Points::new(20));

        let record = p.to_record();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.ending_stack, Points::new(80));
        assert_eq!(record.total_bet, Points::new(20));
        assert_eq!(record.bets, vec![(1, Points::new(20))]);
        assert_eq!(record.actions, vec![(1, ActionKind::Call)]);
    }
}
