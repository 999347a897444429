//! Money type for representing currency amounts
//!
//! Wraps a `rust_decimal::Decimal` so shares can be carried at full precision
//! (10.00 / 3 stays 3.333...) while balances and transfers are rounded to
//! currency precision only when they are settled or displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Number of decimal digits kept for currency amounts
pub const CURRENCY_PRECISION: u32 = 2;

/// Symbols stripped from user-entered amounts
const CURRENCY_SYMBOLS: [char; 3] = ['£', '$', '€'];

/// A monetary amount in a single (unspecified) currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Wrap a decimal value
    pub const fn from_decimal(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use fairshare::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, CURRENCY_PRECISION))
    }

    /// The underlying decimal value
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Round to currency precision, midpoints away from zero
    pub fn round_currency(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Number of significant decimal digits (trailing zeros ignored)
    pub fn decimal_places(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Whether the amount is representable at currency precision
    pub fn has_currency_precision(&self) -> bool {
        self.decimal_places() <= CURRENCY_PRECISION
    }

    /// Whether the absolute value is at or below `tolerance`
    pub fn is_within(&self, tolerance: Money) -> bool {
        self.abs() <= tolerance
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "£10.50", "$10", "€0.5"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, rest) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let digits = rest.trim_start_matches(CURRENCY_SYMBOLS.as_slice()).trim();
        if digits.is_empty() || digits.starts_with(['-', '+']) {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let value =
            Decimal::from_str(digits).map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to currency precision
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.round_currency();
        if rounded.is_negative() {
            format!("-{}{:.2}", symbol, rounded.0.abs())
        } else {
            format!("{}{:.2}", symbol, rounded.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_currency().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        Self(self.0 * factor)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    /// Panics if `divisor` is zero; callers check for an empty split first.
    fn div(self, divisor: Decimal) -> Self {
        Self(self.0 / divisor)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.amount(), Decimal::new(105, 1));
        assert_eq!(m.to_string(), "10.50");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        let third = Money::from_cents(1000) / Decimal::from(3);
        assert_eq!(third.to_string(), "3.33");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(15000).format_with_symbol("£"), "£150.00");
        assert_eq!(Money::from_cents(-3600).format_with_symbol("$"), "-$36.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(-a, Money::from_cents(-1000));
        assert_eq!(a * Decimal::from(3), Money::from_cents(3000));
    }

    #[test]
    fn test_full_precision_division() {
        let share = Money::from_cents(1000) / Decimal::from(3);
        assert!(!share.has_currency_precision());
        let total: Money = std::iter::repeat(share).take(3).sum();
        assert_eq!(total.round_currency(), Money::from_cents(1000));
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(
            Money::parse("6.665").unwrap().round_currency(),
            Money::from_cents(667)
        );
        assert_eq!(
            Money::parse("-3.335").unwrap().round_currency(),
            Money::from_cents(-334)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("£10.50").unwrap(), Money::from_cents(1050));
        assert_eq!(Money::parse("$10").unwrap(), Money::from_cents(1000));
        assert_eq!(Money::parse("€0.5").unwrap(), Money::from_cents(50));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::from_cents(-1050));
        assert_eq!(Money::parse(" 7 ").unwrap(), Money::from_cents(700));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("£").is_err());
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("--5").is_err());
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(Money::parse("10.50").unwrap().decimal_places(), 1);
        assert_eq!(Money::parse("10.505").unwrap().decimal_places(), 3);
        assert!(Money::parse("10.00").unwrap().has_currency_precision());
        assert!(!Money::parse("0.001").unwrap().has_currency_precision());
    }

    #[test]
    fn test_is_within() {
        let tolerance = Money::from_cents(1);
        assert!(Money::from_cents(-1).is_within(tolerance));
        assert!(!Money::from_cents(2).is_within(tolerance));
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"10.50\"");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
