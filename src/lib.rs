//! Fairshare - shared expense splitting and debt settlement
//!
//! This library keeps a ledger of people and the expenses they share, splits
//! each expense equally, by weight, by percentage or by exact amounts, and
//! settles the resulting balances with as few transfers as it can find.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Money, people, split strategies and expenses
//! - `services`: The ledger, settlement and missing-person policies
//! - `display`: Plain-text formatting for terminal output
//! - `export`: Settlement reports as JSON or CSV
//! - `cli`: Interactive session and demos
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```
//! use fairshare::models::Money;
//! use fairshare::services::{Ledger, NewExpense, RejectMissing};
//!
//! let mut ledger = Ledger::new();
//! for name in ["alice", "bob"] {
//!     ledger.add_person(name)?;
//! }
//! ledger.add_expense(
//!     NewExpense::equal("alice", Money::from_cents(3000), ["alice", "bob"]),
//!     &mut RejectMissing,
//! )?;
//! ledger.recompute_balances();
//!
//! let transfers = ledger.settle();
//! assert_eq!(transfers[0].from, "bob");
//! assert_eq!(transfers[0].amount, Money::from_cents(1500));
//! # Ok::<(), fairshare::FairshareError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{FairshareError, FairshareResult};
