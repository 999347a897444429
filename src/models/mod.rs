//! Core data models for fairshare
//!
//! This module contains the data structures of the expense-sharing domain:
//! people, expenses, split strategies, money and the ledger limits.

pub mod expense;
pub mod limits;
pub mod money;
pub mod person;
pub mod split;

pub use expense::{Expense, ExpenseValidationError};
pub use limits::{LedgerLimits, Tolerances};
pub use money::Money;
pub use person::{NameValidationError, Person, PersonTotals};
pub use split::{Share, SplitKind, SplitParams, SplitStrategy, SplitValidationError};
