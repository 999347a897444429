//! Expense display formatting

use super::join_names;
use crate::models::person::capitalize;
use crate::models::Expense;

/// One-line description, e.g. "£30.00 paid by Bob for Alice and Bob (equal split)"
pub fn describe_expense(expense: &Expense, currency: &str) -> String {
    format!(
        "{} paid by {} for {} ({})",
        expense.amount().format_with_symbol(currency),
        capitalize(expense.payer()),
        join_names(expense.participants()),
        expense.split()
    )
}

/// Numbered list of expenses in the order they were added
pub fn format_expense_list(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.".to_string();
    }

    expenses
        .iter()
        .enumerate()
        .map(|(i, expense)| format!("{}. {}\n", i + 1, describe_expense(expense, currency)))
        .collect()
}
