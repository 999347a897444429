//! Service layer for fairshare
//!
//! The ledger owns people and expenses; settlement and missing-person
//! resolution are separate so they can be used and tested on their own.

pub mod ledger;
pub mod policy;
pub mod settlement;

pub use ledger::{AddPersonOutcome, ExpenseAdded, Ledger, LedgerSummary, NewExpense};
pub use policy::{AutoCreate, MissingPersonPolicy, PersonResolution, RejectMissing};
pub use settlement::{Settlement, SettlementCalculator, Transfer};
