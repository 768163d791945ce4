//! Mapping between physical chips and points.
//!
//! A game fixes one [`ChipMapping`] at setup, derived from the smallest
//! starting stack at the table. Every bet is then converted from raw chip
//! counts through that mapping.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::Points;

/// Chip denominations, in units, ascending.
pub const DENOMINATIONS: [u32; 4] = [1, 5, 25, 100];

/// Errors raised while converting chip counts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChipError {
    #[error("chip count for denomination {denom} cannot be negative (got {count})")]
    NegativeCount { denom: u32, count: i64 },

    #[error("unknown chip denomination {0}")]
    UnknownDenomination(u32),

    #[error("chip total is too large to convert to points")]
    Overflow,
}

/// How many chips of each denomination a player pushed forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipCounts(BTreeMap<u32, i64>);

impl ChipCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts aligned with [`DENOMINATIONS`]; missing trailing counts are zero.
    pub fn from_counts(counts: &[i64]) -> Self {
        DENOMINATIONS
            .iter()
            .zip(counts)
            .map(|(denom, count)| (*denom, *count))
            .collect()
    }

    /// Set the count for one denomination.
    pub fn with(mut self, denom: u32, count: i64) -> Self {
        self.0.insert(denom, count);
        self
    }

    pub fn count(&self, denom: u32) -> i64 {
        self.0.get(&denom).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.0.iter().map(|(d, c)| (*d, *c))
    }
}

impl FromIterator<(u32, i64)> for ChipCounts {
    fn from_iter<I: IntoIterator<Item = (u32, i64)>>(iter: I) -> Self {
        ChipCounts(iter.into_iter().collect())
    }
}

/// Conversion from chip units to points for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipMapping {
    base_unit: Points,
    denoms: Vec<u32>,
    fallback: bool,
}

impl ChipMapping {
    /// Derive the mapping from the smallest starting stack at the table.
    ///
    /// The 100-unit chip is first sized at a quarter of `min_stack`. When that
    /// leaves a 1-unit chip worth less than one point, fall back to roughly
    /// 100 unit chips spanning `min_stack`.
    pub fn for_min_stack(min_stack: Points) -> Self {
        let min = min_stack.value();
        let chip_100_value = min / 4;
        let base_unit = chip_100_value / 100;

        let (base_unit, fallback) = if base_unit < 1 {
            ((min / 100).max(1), true)
        } else {
            (base_unit, false)
        };

        Self {
            base_unit: Points::new(base_unit),
            denoms: DENOMINATIONS.to_vec(),
            fallback,
        }
    }

    /// Points per 1-unit chip.
    pub fn base_unit(&self) -> Points {
        self.base_unit
    }

    pub fn denoms(&self) -> &[u32] {
        &self.denoms
    }

    /// Whether the fallback mapping was chosen.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Point value of a single chip of `denom`, for display.
    pub fn chip_value(&self, denom: u32) -> Points {
        self.base_unit * i64::from(denom)
    }

    /// `(denomination, point value)` for every chip, ascending.
    pub fn chip_values(&self) -> Vec<(u32, Points)> {
        self.denoms
            .iter()
            .map(|denom| (*denom, self.chip_value(*denom)))
            .collect()
    }

    /// Convert raw chip counts into points.
    pub fn convert(&self, counts: &ChipCounts) -> Result<Points, ChipError> {
        let mut units = 0i64;
        for (denom, count) in counts.iter() {
            if !self.denoms.contains(&denom) {
                return Err(ChipError::UnknownDenomination(denom));
            }
            if count < 0 {
                return Err(ChipError::NegativeCount { denom, count });
            }
            units = count
                .checked_mul(i64::from(denom))
                .and_then(|value| units.checked_add(value))
                .ok_or(ChipError::Overflow)?;
        }
        self.base_unit.checked_mul(units).ok_or(ChipError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(min_stack: i64) -> ChipMapping {
        ChipMapping::for_min_stack(Points::new(min_stack))
    }

    #[test]
    fn quarter_stack_mapping() {
        // 100-unit chip = 1000 points, 1-unit chip = 10 points
        let m = mapping(4000);
        assert_eq!(m.base_unit(), Points::new(10));
        assert!(!m.is_fallback());
        assert_eq!(m.chip_value(100), Points::new(1000));
    }

    #[test]
    fn quarter_stack_mapping_floors() {
        let m = mapping(1999);
        // floor(1999 / 4) = 499, floor(499 / 100) = 4
        assert_eq!(m.base_unit(), Points::new(4));
        assert!(!m.is_fallback());
    }

    #[test]
    fn fallback_below_four_hundred() {
        let m = mapping(399);
        assert!(m.is_fallback());
        assert_eq!(m.base_unit(), Points::new(3));

        let m = mapping(400);
        assert!(!m.is_fallback());
        assert_eq!(m.base_unit(), Points::new(1));
    }

    #[test]
    fn fallback_never_below_one() {
        let m = mapping(100);
        assert!(m.is_fallback());
        assert_eq!(m.base_unit(), Points::new(1));

        let m = mapping(7);
        assert!(m.is_fallback());
        assert_eq!(m.base_unit(), Points::new(1));
    }

    #[test]
    fn fallback_triggers_exactly_when_quarter_mapping_is_unusable() {
        for min in 1..2_000 {
            let m = mapping(min);
            let quarter = (min / 4) / 100;
            assert_eq!(m.is_fallback(), quarter < 1, "min_stack {min}");
            if quarter < 1 {
                assert_eq!(m.base_unit(), Points::new((min / 100).max(1)));
            } else {
                assert_eq!(m.base_unit(), Points::new(quarter));
            }
        }
    }

    #[test]
    fn denominations_are_fixed() {
        assert_eq!(mapping(100).denoms(), &[1, 5, 25, 100]);
        assert_eq!(mapping(1_000_000).denoms(), &[1, 5, 25, 100]);
    }

    #[test]
    fn conversion_is_linear() {
        let m = mapping(4000);
        let counts = ChipCounts::from_counts(&[3, 2, 1, 1]);
        // (3 + 10 + 25 + 100) * 10
        assert_eq!(m.convert(&counts), Ok(Points::new(1380)));

        let doubled = ChipCounts::from_counts(&[6, 4, 2, 2]);
        assert_eq!(m.convert(&doubled), Ok(Points::new(2760)));
    }

    #[test]
    fn empty_counts_convert_to_zero() {
        assert_eq!(mapping(100).convert(&ChipCounts::new()), Ok(Points::ZERO));
    }

    #[test]
    fn negative_count_rejected() {
        let counts = ChipCounts::new().with(5, -1);
        assert_eq!(
            mapping(100).convert(&counts),
            Err(ChipError::NegativeCount { denom: 5, count: -1 })
        );
    }

    #[test]
    fn unknown_denomination_rejected() {
        let counts = ChipCounts::new().with(10, 1);
        assert_eq!(
            mapping(100).convert(&counts),
            Err(ChipError::UnknownDenomination(10))
        );
    }

    #[test]
    fn oversized_count_overflows() {
        let counts = ChipCounts::from_counts(&[0, i64::MAX / 2]);
        assert_eq!(mapping(100).convert(&counts), Err(ChipError::Overflow));
    }

    #[test]
    fn oversized_unit_total_overflows() {
        let counts = ChipCounts::from_counts(&[i64::MAX, 1]);
        assert_eq!(mapping(100).convert(&counts), Err(ChipError::Overflow));
    }

    #[test]
    fn base_unit_scaling_overflows() {
        // fits in units, but not once multiplied by 10 points per unit
        let counts = ChipCounts::from_counts(&[i64::MAX / 5]);
        assert_eq!(mapping(4000).convert(&counts), Err(ChipError::Overflow));
    }

    #[test]
    fn chip_values_per_denomination() {
        assert_eq!(
            mapping(4000).chip_values(),
            vec![
                (1, Points::new(10)),
                (5, Points::new(50)),
                (25, Points::new(250)),
                (100, Points::new(1000)),
            ]
        );
    }

    #[test]
    fn from_counts_pads_missing_denominations() {
        let counts = ChipCounts::from_counts(&[0, 4]);
        assert_eq!(counts.count(5), 4);
        assert_eq!(counts.count(100), 0);
    }
}
