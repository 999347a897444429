//! Ledger capacity limits and rounding tolerances
//!
//! Both structs are embedded in the user settings file, so every field has a
//! serde default and older config files keep loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_PEOPLE: usize = 1000;
pub const MAX_PARTICIPANTS: usize = 100;
/// 999,999.99
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999;

/// Smallest accepted percentage share (0.01%)
pub const MIN_PERCENTAGE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;
pub const MAX_WEIGHT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Capacity limits enforced when people and expenses enter the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLimits {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    #[serde(default = "default_max_people")]
    pub max_people: usize,

    /// Maximum participants in a single expense
    #[serde(default = "default_max_participants")]
    pub max_participants: usize,

    #[serde(default = "default_max_amount")]
    pub max_amount: Money,
}

fn default_max_name_length() -> usize {
    MAX_NAME_LENGTH
}

fn default_max_people() -> usize {
    MAX_PEOPLE
}

fn default_max_participants() -> usize {
    MAX_PARTICIPANTS
}

fn default_max_amount() -> Money {
    Money::from_cents(MAX_AMOUNT_CENTS)
}

impl LedgerLimits {
    /// Largest magnitude accepted for a person's opening totals
    ///
    /// A full ledger where one person paid for every expense stays within
    /// `max_amount × max_people`.
    pub fn max_initial_total(&self) -> Money {
        let amount = self.max_amount.amount();
        let bound = amount
            .checked_mul(Decimal::from(self.max_people))
            .unwrap_or(amount);
        Money::from_decimal(bound)
    }
}

impl Default for LedgerLimits {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            max_people: default_max_people(),
            max_participants: default_max_participants(),
            max_amount: default_max_amount(),
        }
    }
}

/// Thresholds below which a deviation is treated as zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Balances at or below this magnitude count as settled
    #[serde(default = "default_settlement_tolerance")]
    pub settlement: Money,

    /// Allowed deviation of a percentage split from 100
    #[serde(default = "default_percentage_tolerance")]
    pub percentage: Decimal,
}

fn default_settlement_tolerance() -> Money {
    Money::from_cents(1)
}

fn default_percentage_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            settlement: default_settlement_tolerance(),
            percentage: default_percentage_tolerance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = LedgerLimits::default();
        assert_eq!(limits.max_name_length, 50);
        assert_eq!(limits.max_people, 1000);
        assert_eq!(limits.max_participants, 100);
        assert_eq!(limits.max_amount.to_string(), "999999.99");

        let tolerances = Tolerances::default();
        assert_eq!(tolerances.settlement, Money::from_cents(1));
        assert_eq!(tolerances.percentage, Decimal::new(1, 2));
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(MIN_PERCENTAGE, Decimal::new(1, 2));
        assert_eq!(MAX_WEIGHT, Decimal::from(1_000_000));
    }

    #[test]
    fn test_max_initial_total() {
        let limits = LedgerLimits {
            max_people: 3,
            max_amount: Money::from_cents(1000),
            ..LedgerLimits::default()
        };
        assert_eq!(limits.max_initial_total(), Money::from_cents(3000));

        let huge = LedgerLimits {
            max_people: usize::MAX,
            max_amount: Money::from_decimal(Decimal::MAX),
            ..LedgerLimits::default()
        };
        assert_eq!(huge.max_initial_total(), Money::from_decimal(Decimal::MAX));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let limits: LedgerLimits = serde_json::from_str(r#"{"max_people": 5}"#).unwrap();
        assert_eq!(limits.max_people, 5);
        assert_eq!(limits.max_name_length, MAX_NAME_LENGTH);
    }
}
