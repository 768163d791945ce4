//! Cross-game settlement.
//!
//! Net results of every finished game are summed per player, then reduced to
//! a list of point transfers that brings every balance back to zero.

use tracing::debug;

use crate::Points;
use crate::game::Game;
use crate::model::{Balances, Transfer};

/// Sum each player's net result across `games`, in first-seen order.
///
/// Games without a declared winner contribute nothing.
pub fn aggregate_net_totals<'a>(games: impl IntoIterator<Item = &'a Game>) -> Balances {
    let mut totals = Balances::new();
    for net_results in games.into_iter().filter_map(Game::net_results) {
        for (name, net) in net_results.iter() {
            totals.add(name, net);
        }
    }
    totals
}

/// Greedy settlement sweep.
///
/// Debtors and creditors are visited in the order they appear in `net_totals`
/// (not by magnitude). Each step moves the smaller of the two outstanding
/// amounts and advances whichever side is cleared. The result settles every
/// balance when the totals sum to zero, but is not guaranteed to use the
/// fewest transfers.
pub fn calculate_settlements(net_totals: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<(&str, Points)> = net_totals
        .iter()
        .filter(|(_, net)| net.is_negative())
        .map(|(name, net)| (name, -net))
        .collect();
    let mut creditors: Vec<(&str, Points)> = net_totals
        .iter()
        .filter(|(_, net)| net.is_positive())
        .collect();

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = &mut debtors[i];
        let (creditor, due) = &mut creditors[j];

        let amount = (*owed).min(*due);
        debug!(from = *debtor, to = *creditor, amount = %amount, "transfer");
        settlements.push(Transfer {
            from: debtor.to_string(),
            to: creditor.to_string(),
            amount,
        });

        *owed -= amount;
        *due -= amount;
        if *owed == Points::ZERO {
            i += 1;
        }
        if *due == Points::ZERO {
            j += 1;
        }
    }

    settlements
}
