//! Expense model
//!
//! An expense records who paid, how much, who shared it and how it is
//! split. Expenses are validated once on construction and never change
//! afterwards.

use std::fmt;

use super::limits::LedgerLimits;
use super::money::Money;
use super::person::{NameValidationError, Person};
use super::split::{Share, SplitStrategy, SplitValidationError};

/// A validated shared expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    payer: String,
    amount: Money,
    participants: Vec<String>,
    split: SplitStrategy,
}

impl Expense {
    /// Validate and build an expense
    ///
    /// Names are normalized, the amount must be positive, within
    /// `limits.max_amount` and have at most two decimal places, and the
    /// split must accept the amount and participant set.
    pub fn new<S: AsRef<str>>(
        payer: &str,
        amount: Money,
        participants: &[S],
        split: SplitStrategy,
        limits: &LedgerLimits,
    ) -> Result<Self, ExpenseValidationError> {
        let payer = Person::validate_name(payer, limits.max_name_length)
            .map_err(ExpenseValidationError::InvalidPayer)?;

        validate_amount(amount, limits.max_amount)?;

        if participants.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }
        if participants.len() > limits.max_participants {
            return Err(ExpenseValidationError::TooManyParticipants {
                count: participants.len(),
                max: limits.max_participants,
            });
        }

        let mut normalized: Vec<String> = Vec::with_capacity(participants.len());
        for raw in participants {
            let name = Person::validate_name(raw.as_ref(), limits.max_name_length)
                .map_err(ExpenseValidationError::InvalidParticipant)?;
            if normalized.contains(&name) {
                return Err(ExpenseValidationError::DuplicateParticipant(name));
            }
            normalized.push(name);
        }

        split.validate_for(amount, &normalized)?;

        Ok(Self {
            payer,
            amount,
            participants: normalized,
            split,
        })
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn split(&self) -> &SplitStrategy {
        &self.split
    }

    /// Each participant's share, at full precision
    pub fn compute_shares(&self) -> Vec<Share> {
        self.split.shares_unchecked(self.amount, &self.participants)
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paid by {} for {} ({})",
            self.amount,
            super::person::capitalize(&self.payer),
            self.participants.join(", "),
            self.split
        )
    }
}

/// Check an expense amount: positive, bounded, currency precision
pub fn validate_amount(amount: Money, max_amount: Money) -> Result<(), ExpenseValidationError> {
    if !amount.is_positive() {
        return Err(ExpenseValidationError::NotPositive);
    }
    if amount > max_amount {
        return Err(ExpenseValidationError::ExceedsMaximum(max_amount));
    }
    if !amount.has_currency_precision() {
        return Err(ExpenseValidationError::TooPrecise(amount.decimal_places()));
    }
    Ok(())
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    InvalidPayer(NameValidationError),
    NotPositive,
    ExceedsMaximum(Money),
    TooPrecise(u32),
    NoParticipants,
    TooManyParticipants { count: usize, max: usize },
    InvalidParticipant(NameValidationError),
    DuplicateParticipant(String),
    Split(SplitValidationError),
}

impl From<SplitValidationError> for ExpenseValidationError {
    fn from(err: SplitValidationError) -> Self {
        Self::Split(err)
    }
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayer(e) => write!(f, "Invalid payer: {}", e),
            Self::NotPositive => write!(f, "Expense amount must be positive"),
            Self::ExceedsMaximum(max) => write!(f, "Expense amount cannot exceed {}", max),
            Self::TooPrecise(places) => write!(
                f,
                "Expense amount cannot have more than 2 decimal places (got {})",
                places
            ),
            Self::NoParticipants => write!(f, "An expense needs at least one participant"),
            Self::TooManyParticipants { count, max } => {
                write!(f, "Too many participants ({}, max {})", count, max)
            }
            Self::InvalidParticipant(e) => write!(f, "Invalid participant: {}", e),
            Self::DuplicateParticipant(name) => write!(f, "Duplicate participant '{}'", name),
            Self::Split(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
