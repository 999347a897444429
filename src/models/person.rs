//! Person model
//!
//! A participant in the ledger, keyed by a normalized (trimmed, lowercased)
//! name, carrying running paid/owed totals and the derived balance.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Punctuation allowed in names besides letters, digits and whitespace
const NAME_PUNCTUATION: [char; 3] = ['-', '_', '.'];

/// Initial totals for a newly registered person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonTotals {
    pub balance: Money,
    pub paid: Money,
    pub owed: Money,
}

/// A person sharing expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Normalized name, unique within a ledger
    pub name: String,

    /// Total amount this person has paid for the group
    pub paid: Money,

    /// Total of this person's shares across all expenses
    pub owed: Money,

    /// Net position (paid - owed), positive when the group owes this person
    pub balance: Money,
}

impl Person {
    /// Create a person with zeroed totals
    ///
    /// The name is expected to be normalized already (see [`Person::validate_name`]).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_totals(name, PersonTotals::default())
    }

    pub fn with_totals(name: impl Into<String>, totals: PersonTotals) -> Self {
        Self {
            name: name.into(),
            paid: totals.paid,
            owed: totals.owed,
            balance: totals.balance,
        }
    }

    /// Re-derive the balance from the paid and owed totals
    pub fn refresh_balance(&mut self) {
        self.balance = (self.paid - self.owed).round_currency();
    }

    /// Name with the first letter capitalized, for display
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// Normalize a name for use as a ledger key
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Validate a raw name and return its normalized form
    pub fn validate_name(name: &str, max_length: usize) -> Result<String, NameValidationError> {
        let normalized = Self::normalize_name(name);

        if normalized.is_empty() {
            return Err(NameValidationError::Empty);
        }

        let length = normalized.chars().count();
        if length > max_length {
            return Err(NameValidationError::TooLong {
                length,
                max: max_length,
            });
        }

        if let Some(c) = normalized.chars().find(|c| !is_allowed_name_char(*c)) {
            return Err(NameValidationError::InvalidCharacter(c));
        }

        Ok(normalized)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn is_allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || NAME_PUNCTUATION.contains(&c)
}

/// Uppercase the first character of a name
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validation errors for person names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    Empty,
    TooLong { length: usize, max: usize },
    InvalidCharacter(char),
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Name too long ({} chars, max {})", length, max)
            }
            Self::InvalidCharacter(c) => write!(
                f,
                "Name contains invalid character '{}' (use letters, numbers, spaces, hyphens, underscores, dots)",
                c
            ),
        }
    }
}

impl std::error::Error for NameValidationError {}
