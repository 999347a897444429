//! Non-interactive demonstrations
//!
//! `fairshare demo` replays a weekend trip with every split method and
//! settles it. `fairshare demo --precision` shows that shares are kept at
//! full precision and only rounded when balances are settled.

use std::io::Write;

use rust_decimal::Decimal;

use crate::display::{describe_expense, format_balance_list, format_transfers, heading};
use crate::error::FairshareResult;
use crate::models::person::capitalize;
use crate::models::{Money, SplitKind};
use crate::services::{Ledger, NewExpense, RejectMissing};

/// Run the trip demonstration
pub fn run_demo<W: Write>(out: &mut W, ledger: Ledger, currency: &str) -> FairshareResult<()> {
    let mut ledger = ledger;
    for name in ["alice", "bob", "charlie"] {
        ledger.add_person(name)?;
    }

    let everyone = ["alice", "bob", "charlie"];
    let expenses = [
        NewExpense::equal("alice", Money::from_cents(15000), everyone),
        NewExpense::equal("bob", Money::from_cents(3000), everyone),
        NewExpense::equal("charlie", Money::from_cents(1800), everyone),
    ];
    for expense in expenses {
        ledger.add_expense(expense, &mut RejectMissing)?;
    }

    write!(out, "{}", heading("Weekend trip"))?;
    print_ledger(out, &mut ledger, currency)?;

    // Same group, one of each parameterized split
    let extras = [
        NewExpense::equal("bob", Money::from_cents(6000), everyone).with_split(
            SplitKind::Weighted,
            [
                ("alice", Decimal::ONE),
                ("bob", Decimal::ONE),
                ("charlie", Decimal::TWO),
            ],
        ),
        NewExpense::equal("charlie", Money::from_cents(4000), ["alice", "charlie"]).with_split(
            SplitKind::Percentage,
            [("alice", Decimal::from(25)), ("charlie", Decimal::from(75))],
        ),
        NewExpense::equal("alice", Money::from_cents(2550), ["bob", "charlie"]).with_split(
            SplitKind::Exact,
            [("bob", Decimal::new(1050, 2)), ("charlie", Decimal::from(15))],
        ),
    ];
    for expense in extras {
        ledger.add_expense(expense, &mut RejectMissing)?;
    }

    writeln!(out)?;
    write!(out, "{}", heading("Weekend trip with mixed splits"))?;
    print_ledger(out, &mut ledger, currency)
}

/// Run the rounding demonstration
pub fn run_precision_demo<W: Write>(
    out: &mut W,
    ledger: Ledger,
    currency: &str,
) -> FairshareResult<()> {
    let mut ledger = ledger;
    let everyone = ["alice", "bob", "charlie"];
    for name in everyone {
        ledger.add_person(name)?;
    }
    ledger.add_expense(
        NewExpense::equal("alice", Money::from_cents(1000), everyone),
        &mut RejectMissing,
    )?;

    write!(out, "{}", heading("Precision"))?;
    let expense = &ledger.expenses()[0];
    writeln!(out, "{}", describe_expense(expense, currency))?;
    writeln!(out)?;

    let shares = expense.compute_shares();
    for share in &shares {
        writeln!(
            out,
            "{} owes {}{}",
            capitalize(&share.participant),
            currency,
            share.amount.amount().round_dp(10)
        )?;
    }
    let total: Money = shares.iter().map(|s| s.amount).sum();
    writeln!(
        out,
        "Shares add up to {} before any rounding",
        total.format_with_symbol(currency)
    )?;
    writeln!(out)?;

    print_ledger(out, &mut ledger, currency)?;

    let residual: Money = ledger.people().iter().map(|p| p.balance).sum();
    writeln!(
        out,
        "Rounding residual of {} was cleared at settlement",
        residual.format_with_symbol(currency)
    )?;
    Ok(())
}

fn print_ledger<W: Write>(out: &mut W, ledger: &mut Ledger, currency: &str) -> FairshareResult<()> {
    for expense in ledger.expenses() {
        writeln!(out, "{}", describe_expense(expense, currency))?;
    }
    writeln!(out)?;

    ledger.recompute_balances();
    writeln!(out, "Balances:")?;
    write!(out, "{}", format_balance_list(&ledger.people_by_balance(), currency))?;
    writeln!(out)?;

    let transfers = ledger.settle();
    writeln!(out, "Settlement:")?;
    write!(out, "{}", format_transfers(&transfers, currency))?;

    // settle() zeroed the balances; bring them back for callers
    ledger.recompute_balances();
    Ok(())
}
