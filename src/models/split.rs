//! Expense split strategies
//!
//! A split strategy decides how much of an expense each participant owes.
//! Parameter values (weights, percentages, exact amounts) are validated when
//! the strategy is built; the participant set and the expense amount are
//! checked by [`SplitStrategy::validate_for`] before an expense is accepted.
//!
//! Shares are never rounded here. `10.00` split three ways yields three
//! shares of `3.333...`, and rounding happens only when balances are derived.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::limits::{MAX_PERCENTAGE, MAX_WEIGHT, MIN_PERCENTAGE};
use super::money::Money;
use super::person::Person;

/// The supported ways of splitting an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKind {
    Equal,
    Weighted,
    Percentage,
    Exact,
}

impl SplitKind {
    pub const ALL: [SplitKind; 4] = [
        SplitKind::Equal,
        SplitKind::Weighted,
        SplitKind::Percentage,
        SplitKind::Exact,
    ];

    /// Human readable label, e.g. "Equal split"
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "Equal split",
            Self::Weighted => "Weighted split",
            Self::Percentage => "Percentage split",
            Self::Exact => "Exact amount split",
        }
    }

    /// Name of the per-participant parameter this kind needs
    pub fn parameter_label(&self) -> &'static str {
        match self {
            Self::Equal => "no parameters",
            Self::Weighted => "weights",
            Self::Percentage => "percentages",
            Self::Exact => "exact amounts",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Weighted => write!(f, "weights"),
            Self::Percentage => write!(f, "percent"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for SplitKind {
    type Err = SplitValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "weights" | "weight" | "weighted" => Ok(Self::Weighted),
            "percent" | "percentage" | "percentages" => Ok(Self::Percentage),
            "exact" | "exact_amounts" => Ok(Self::Exact),
            _ => Err(SplitValidationError::UnknownKind(s.trim().to_string())),
        }
    }
}

/// One participant's portion of an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub participant: String,
    pub amount: Money,
}

/// Per-participant numeric parameters keyed by normalized name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitParams(BTreeMap<String, Decimal>);

impl SplitParams {
    /// Build parameters, normalizing every key like a person name
    ///
    /// Two keys that normalize to the same name are rejected.
    pub fn new<I, K>(entries: I) -> Result<Self, SplitValidationError>
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (key, value) in entries {
            let name = Person::normalize_name(key.as_ref());
            if map.insert(name.clone(), value).is_some() {
                return Err(SplitValidationError::DuplicateKey(name));
            }
        }
        Ok(Self(map))
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Sum of all values, or `None` if the sum overflows
    pub fn total(&self) -> Option<Decimal> {
        self.0
            .values()
            .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
    }

    /// Require the key set to equal the participant set exactly
    fn check_participants(
        &self,
        kind: SplitKind,
        participants: &[String],
    ) -> Result<(), SplitValidationError> {
        let missing: Vec<String> = participants
            .iter()
            .filter(|p| !self.0.contains_key(p.as_str()))
            .cloned()
            .collect();
        let extra: Vec<String> = self
            .0
            .keys()
            .filter(|k| !participants.contains(*k))
            .cloned()
            .collect();

        if missing.is_empty() && extra.is_empty() {
            Ok(())
        } else {
            Err(SplitValidationError::ParticipantMismatch {
                kind,
                missing,
                extra,
            })
        }
    }
}

/// How an expense is divided among its participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitStrategy {
    Equal,
    Weighted(SplitParams),
    Percentage(SplitParams),
    Exact(SplitParams),
}

impl SplitStrategy {
    /// Build the strategy for `kind` from its parameters
    ///
    /// `percentage_tolerance` is how far percentages may sum away from 100;
    /// `max_amount` caps each exact amount.
    pub fn new(
        kind: SplitKind,
        params: SplitParams,
        percentage_tolerance: Decimal,
        max_amount: Money,
    ) -> Result<Self, SplitValidationError> {
        match kind {
            SplitKind::Equal if params.is_empty() => Ok(Self::Equal),
            SplitKind::Equal => Err(SplitValidationError::UnexpectedParameters),
            SplitKind::Weighted => Self::weighted(params),
            SplitKind::Percentage => Self::percentage(params, percentage_tolerance),
            SplitKind::Exact => Self::exact(params, max_amount),
        }
    }

    pub fn equal() -> Self {
        Self::Equal
    }

    /// Proportional split; weights must be non-negative with a positive total
    pub fn weighted(weights: SplitParams) -> Result<Self, SplitValidationError> {
        if weights.is_empty() {
            return Err(SplitValidationError::MissingParameters(SplitKind::Weighted));
        }

        for (name, weight) in weights.iter() {
            if weight < Decimal::ZERO {
                return Err(SplitValidationError::NegativeWeight {
                    name: name.to_string(),
                });
            }
            if weight > MAX_WEIGHT {
                return Err(SplitValidationError::WeightTooLarge {
                    name: name.to_string(),
                    max: MAX_WEIGHT,
                });
            }
        }

        let total = weights
            .total()
            .ok_or(SplitValidationError::TotalOverflow(SplitKind::Weighted))?;
        if total.is_zero() {
            return Err(SplitValidationError::ZeroTotalWeight);
        }

        Ok(Self::Weighted(weights))
    }

    /// Percentage split; every value in 0.01..=100 and the sum within tolerance of 100
    pub fn percentage(
        percentages: SplitParams,
        tolerance: Decimal,
    ) -> Result<Self, SplitValidationError> {
        if percentages.is_empty() {
            return Err(SplitValidationError::MissingParameters(SplitKind::Percentage));
        }

        for (name, value) in percentages.iter() {
            if value < MIN_PERCENTAGE || value > MAX_PERCENTAGE {
                return Err(SplitValidationError::PercentageOutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let total = percentages
            .total()
            .ok_or(SplitValidationError::TotalOverflow(SplitKind::Percentage))?;
        if (total - Decimal::ONE_HUNDRED).abs() > tolerance {
            return Err(SplitValidationError::PercentageSum { total });
        }

        Ok(Self::Percentage(percentages))
    }

    /// Exact amounts per participant; each in 0..=`max` and non-negative
    pub fn exact(amounts: SplitParams, max: Money) -> Result<Self, SplitValidationError> {
        if amounts.is_empty() {
            return Err(SplitValidationError::MissingParameters(SplitKind::Exact));
        }

        for (name, value) in amounts.iter() {
            if value < Decimal::ZERO {
                return Err(SplitValidationError::NegativeAmount {
                    name: name.to_string(),
                });
            }
            if value > max.amount() {
                return Err(SplitValidationError::AmountTooLarge {
                    name: name.to_string(),
                    max,
                });
            }
        }

        Ok(Self::Exact(amounts))
    }

    pub fn kind(&self) -> SplitKind {
        match self {
            Self::Equal => SplitKind::Equal,
            Self::Weighted(_) => SplitKind::Weighted,
            Self::Percentage(_) => SplitKind::Percentage,
            Self::Exact(_) => SplitKind::Exact,
        }
    }

    pub fn params(&self) -> Option<&SplitParams> {
        match self {
            Self::Equal => None,
            Self::Weighted(params) | Self::Percentage(params) | Self::Exact(params) => {
                Some(params)
            }
        }
    }

    /// Check that this strategy can split `amount` among `participants`
    ///
    /// `participants` must already be normalized.
    pub fn validate_for(
        &self,
        amount: Money,
        participants: &[String],
    ) -> Result<(), SplitValidationError> {
        if participants.is_empty() {
            return Err(SplitValidationError::NoParticipants);
        }

        for (i, name) in participants.iter().enumerate() {
            if participants[..i].contains(name) {
                return Err(SplitValidationError::DuplicateParticipant(name.clone()));
            }
        }

        if let Some(params) = self.params() {
            params.check_participants(self.kind(), participants)?;
        }

        if let Self::Exact(amounts) = self {
            let total = amounts
                .total()
                .ok_or(SplitValidationError::TotalOverflow(SplitKind::Exact))?;
            let total = Money::from_decimal(total).round_currency();
            let expected = amount.round_currency();
            if total != expected {
                return Err(SplitValidationError::ExactSum { total, expected });
            }
        }

        Ok(())
    }

    /// Compute every participant's share of `amount`
    ///
    /// Participant names are normalized before matching against parameters.
    pub fn compute_shares(
        &self,
        amount: Money,
        participants: &[String],
    ) -> Result<Vec<Share>, SplitValidationError> {
        let participants: Vec<String> = participants
            .iter()
            .map(|p| Person::normalize_name(p))
            .collect();
        self.validate_for(amount, &participants)?;
        Ok(self.shares_unchecked(amount, &participants))
    }

    /// Share arithmetic for inputs that already passed [`Self::validate_for`]
    pub(crate) fn shares_unchecked(&self, amount: Money, participants: &[String]) -> Vec<Share> {
        let share_of = |name: &String| -> Money {
            match self {
                Self::Equal => amount / Decimal::from(participants.len()),
                Self::Weighted(weights) => {
                    let total: Decimal = participants
                        .iter()
                        .filter_map(|p| weights.get(p))
                        .sum();
                    amount * weights.get(name).unwrap_or_default() / total
                }
                Self::Percentage(percentages) => {
                    amount * percentages.get(name).unwrap_or_default() / Decimal::ONE_HUNDRED
                }
                Self::Exact(amounts) => Money::from_decimal(amounts.get(name).unwrap_or_default()),
            }
        };

        participants
            .iter()
            .map(|name| Share {
                participant: name.clone(),
                amount: share_of(name),
            })
            .collect()
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind().label().to_lowercase())
    }
}

/// Validation errors raised while building or applying a split
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitValidationError {
    #[error("Unknown split method '{0}' (expected equal, weights, percent or exact)")]
    UnknownKind(String),

    #[error("Equal split does not take parameters")]
    UnexpectedParameters,

    #[error("{} must be provided for all participants", capitalized(.0.parameter_label()))]
    MissingParameters(SplitKind),

    #[error("Duplicate split parameter for '{0}'")]
    DuplicateKey(String),

    #[error("A split needs at least one participant")]
    NoParticipants,

    #[error("Duplicate participant '{0}'")]
    DuplicateParticipant(String),

    #[error("{}", mismatch_message(.kind, .missing, .extra))]
    ParticipantMismatch {
        kind: SplitKind,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Weight for {name} cannot be negative")]
    NegativeWeight { name: String },

    #[error("Weight for {name} cannot exceed {max}")]
    WeightTooLarge { name: String, max: Decimal },

    #[error("Total weight must be greater than zero. All weights cannot be zero.")]
    ZeroTotalWeight,

    #[error(
        "Percentage for {name} must be between {}% and {}% (got {value}%)",
        MIN_PERCENTAGE,
        MAX_PERCENTAGE
    )]
    PercentageOutOfRange { name: String, value: Decimal },

    #[error("Percentages must sum to 100% (currently {total}%)")]
    PercentageSum { total: Decimal },

    #[error("Exact amount for {name} cannot be negative")]
    NegativeAmount { name: String },

    #[error("Exact amount for {name} cannot exceed {max}")]
    AmountTooLarge { name: String, max: Money },

    #[error("{} add up to more than can be represented", capitalized(.0.parameter_label()))]
    TotalOverflow(SplitKind),

    #[error("Exact amounts must sum to the total amount ({total} given, {expected} expected)")]
    ExactSum { total: Money, expected: Money },
}

fn capitalized(label: &str) -> String {
    super::person::capitalize(label)
}

fn mismatch_message(kind: &SplitKind, missing: &[String], extra: &[String]) -> String {
    let mut message = format!(
        "{} must be provided for all participants.",
        capitalized(kind.parameter_label())
    );
    if !missing.is_empty() {
        message.push_str(&format!(" Missing: {}.", missing.join(", ")));
    }
    if !extra.is_empty() {
        message.push_str(&format!(" Not participating: {}.", extra.join(", ")));
    }
    message
}
