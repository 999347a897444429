//! Settlement and summary display formatting

use crate::models::person::capitalize;
use crate::services::{LedgerSummary, Transfer};

/// One line per transfer, e.g. "Bob → Alice: £36.00"
pub fn format_transfers(transfers: &[Transfer], currency: &str) -> String {
    if transfers.is_empty() {
        return "Everyone is settled up.".to_string();
    }

    transfers
        .iter()
        .map(|t| {
            format!(
                "{} → {}: {}\n",
                capitalize(&t.from),
                capitalize(&t.to),
                t.amount.format_with_symbol(currency)
            )
        })
        .collect()
}

/// Ledger summary block
pub fn format_summary(summary: &LedgerSummary, currency: &str) -> String {
    if summary.people == 0 {
        return "No people in the ledger yet.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("People:            {}\n", summary.people));
    output.push_str(&format!("Expenses:          {}\n", summary.expenses));

    if let Some(average) = summary.average_expense {
        output.push_str(&format!(
            "Total amount:      {}\n",
            summary.total_spent.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Average expense:   {}\n",
            average.format_with_symbol(currency)
        ));
    }

    if let Some((name, balance)) = &summary.top_creditor {
        output.push_str(&format!(
            "Biggest creditor:  {} ({})\n",
            capitalize(name),
            balance.format_with_symbol(currency)
        ));
    }
    if let Some((name, balance)) = &summary.top_debtor {
        output.push_str(&format!(
            "Biggest debtor:    {} ({})\n",
            capitalize(name),
            balance.abs().format_with_symbol(currency)
        ));
    }

    output
}
