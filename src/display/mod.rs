//! Display formatting for terminal output
//!
//! Formats people, expenses, balances and settlements as plain text for the
//! interactive session and the demo command. Names are shown capitalized and
//! amounts carry the configured currency symbol.

pub mod expense;
pub mod person;
pub mod settlement;

pub use expense::{describe_expense, format_expense_list};
pub use person::{format_balance_list, format_people_list};
pub use settlement::{format_summary, format_transfers};

use crate::models::person::capitalize;

/// Join capitalized names as "Alice", "Alice and Bob" or "Alice, Bob, and Carol"
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    let names: Vec<String> = names.iter().map(|n| capitalize(n.as_ref())).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

/// Section heading followed by a rule of matching width
pub fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "-".repeat(title.chars().count()))
}
