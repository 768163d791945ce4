//! Core domain types shared by games, settlements and exports.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::Points;

/// Round number within a game, starting at 1.
pub type Round = u32;

/// What a player did on their turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
    /// Any free-form action; recorded verbatim, never carries chips.
    Other(String),
}

impl ActionKind {
    /// Whether this action moves chips into the pot.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            ActionKind::Bet | ActionKind::Raise | ActionKind::Call | ActionKind::AllIn
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all-in",
            ActionKind::Other(text) => text,
        }
    }
}

impl FromStr for ActionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Ok(match normalized.as_str() {
            "fold" => ActionKind::Fold,
            "check" => ActionKind::Check,
            "call" => ActionKind::Call,
            "bet" => ActionKind::Bet,
            "raise" => ActionKind::Raise,
            "all-in" => ActionKind::AllIn,
            _ => ActionKind::Other(normalized),
        })
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let Ok(kind) = text.parse::<ActionKind>();
        Ok(kind)
    }
}

/// One entry of a player's bet log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetEntry {
    pub round: Round,
    pub amount: Points,
}

/// One entry of a player's action log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub round: Round,
    pub action: ActionKind,
}

/// One committed action in a game's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub round: Round,
    pub player: String,
    pub action: ActionKind,
    pub amount: Points,
    /// Pot value immediately after this action.
    pub pot_after: Points,
}

/// A player's configuration for a game: name and per-game starting balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub name: String,
    pub starting_stack: Points,
}

impl Seat {
    pub fn new(name: impl Into<String>, starting_stack: i64) -> Self {
        Self {
            name: name.into(),
            starting_stack: Points::new(starting_stack),
        }
    }
}

/// Table roles assigned at game setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dealer,
    BigBlind,
    SmallBlind,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Dealer => "dealer",
            Role::BigBlind => "big blind",
            Role::SmallBlind => "small blind",
        })
    }
}

/// A recommended point transfer from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Points,
}

/// Signed balances keyed by player name, kept in first-insertion order.
///
/// Order matters: settlement walks debtors and creditors in the order
/// players were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances(Vec<(String, Points)>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `name`'s balance, inserting the name at the end if new.
    pub fn add(&mut self, name: &str, amount: Points) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, balance)) => *balance += amount,
            None => self.0.push((name.to_string(), amount)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Points> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Points)> + '_ {
        self.0.iter().map(|(n, p)| (n.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> Points {
        self.0.iter().map(|(_, p)| *p).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, Points)> for Balances {
    fn from_iter<I: IntoIterator<Item = (S, Points)>>(iter: I) -> Self {
        let mut balances = Balances::new();
        for (name, amount) in iter {
            let name: String = name.into();
            balances.add(&name, amount);
        }
        balances
    }
}

impl Serialize for Balances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, amount) in &self.0 {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_parses_known_words() {
        assert_eq!("bet".parse::<ActionKind>().unwrap(), ActionKind::Bet);
        assert_eq!(" All-In ".parse::<ActionKind>().unwrap(), ActionKind::AllIn);
        assert_eq!("CHECK".parse::<ActionKind>().unwrap(), ActionKind::Check);
    }

    #[test]
    fn action_kind_keeps_unknown_words() {
        let kind: ActionKind = "Muck".parse().unwrap();
        assert_eq!(kind, ActionKind::Other("muck".to_string()));
        assert_eq!(kind.to_string(), "muck");
        assert!(!kind.is_betting());
    }

    #[test]
    fn betting_actions() {
        for kind in [ActionKind::Bet, ActionKind::Raise, ActionKind::Call, ActionKind::AllIn] {
            assert!(kind.is_betting(), "{kind} should carry chips");
        }
        assert!(!ActionKind::Fold.is_betting());
        assert!(!ActionKind::Check.is_betting());
    }

    #[test]
    fn action_kind_serializes_as_string() {
        assert_eq!(serde_json::to_string(&ActionKind::AllIn).unwrap(), "\"all-in\"");
        let back: ActionKind = serde_json::from_str("\"raise\"").unwrap();
        assert_eq!(back, ActionKind::Raise);
    }

    #[test]
    fn balances_keep_first_insertion_order() {
        let mut balances = Balances::new();
        balances.add("B", Points::new(-5));
        balances.add("A", Points::new(5));
        balances.add("B", Points::new(-5));

        let names: Vec<_> = balances.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(balances.get("B"), Some(Points::new(-10)));
        assert_eq!(balances.total(), Points::new(-5));
        assert_eq!(balances.get("C"), None);
    }

    #[test]
    fn balances_serialize_as_ordered_object() {
        let balances: Balances = [("Zed", Points::new(3)), ("Amy", Points::new(-3))]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&balances).unwrap(),
            r#"{"Zed":3,"Amy":-3}"#
        );
    }
}
