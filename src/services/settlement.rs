//! Settlement calculation
//!
//! Turns net balances into a list of point-to-point transfers using greedy
//! largest-first matching: the biggest creditor is paid by the biggest
//! debtor until one of them is square, then the next pair is matched.
//!
//! This usually needs close to the minimum number of transfers but is not
//! guaranteed to be optimal; a true minimum needs a subset-sum search.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Money;

/// A single payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

/// Result of a settlement run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Transfers in the order they were generated
    pub transfers: Vec<Transfer>,
    /// Balances after every transfer is applied, in input order
    pub balances: Vec<(String, Money)>,
}

impl Settlement {
    /// Sum of all transfer amounts
    pub fn total_transferred(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Greedy settlement calculator
pub struct SettlementCalculator {
    tolerance: Money,
}

impl SettlementCalculator {
    /// Balances within `tolerance` of zero count as settled
    pub fn new(tolerance: Money) -> Self {
        Self { tolerance }
    }

    /// Calculate transfers that bring every balance within tolerance of zero
    ///
    /// Ties between equally large creditors or debtors go to whoever comes
    /// first in `balances`.
    pub fn calculate(&self, balances: Vec<(String, Money)>) -> Settlement {
        let mut working: Vec<(String, Money)> = balances
            .into_iter()
            .map(|(name, balance)| (name, balance.round_currency()))
            .collect();

        let mut creditors: Vec<usize> = (0..working.len())
            .filter(|&i| working[i].1 > self.tolerance)
            .collect();
        let mut debtors: Vec<usize> = (0..working.len())
            .filter(|&i| working[i].1 < -self.tolerance)
            .collect();

        let mut transfers = Vec::new();

        while let (Some(c), Some(d)) = (
            extreme(&creditors, &working, |a, b| a > b),
            extreme(&debtors, &working, |a, b| a < b),
        ) {
            let (creditor, debtor) = (creditors[c], debtors[d]);
            if working[creditor].1 <= self.tolerance {
                break;
            }

            let amount = working[creditor]
                .1
                .min(working[debtor].1.abs())
                .round_currency();

            debug!(
                from = %working[debtor].0,
                to = %working[creditor].0,
                %amount,
                "settlement transfer"
            );
            transfers.push(Transfer {
                from: working[debtor].0.clone(),
                to: working[creditor].0.clone(),
                amount,
            });

            working[creditor].1 = (working[creditor].1 - amount).round_currency();
            working[debtor].1 = (working[debtor].1 + amount).round_currency();

            if working[creditor].1.is_within(self.tolerance) {
                creditors.remove(c);
            }
            if working[debtor].1.is_within(self.tolerance) {
                debtors.remove(d);
            }
        }

        // Absorb residual rounding drift
        for (_, balance) in working.iter_mut() {
            if balance.is_within(self.tolerance) {
                *balance = Money::zero();
            }
        }

        Settlement {
            transfers,
            balances: working,
        }
    }
}

/// Position in `set` of the first balance preferred by `better`
fn extreme(
    set: &[usize],
    balances: &[(String, Money)],
    better: impl Fn(Money, Money) -> bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (pos, &index) in set.iter().enumerate() {
        match best {
            Some(b) if !better(balances[index].1, balances[set[b]].1) => {}
            _ => best = Some(pos),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calculator() -> SettlementCalculator {
        SettlementCalculator::new(Money::from_cents(1))
    }

    fn balances(entries: &[(&str, i64)]) -> Vec<(String, Money)> {
        entries
            .iter()
            .map(|(name, cents)| (name.to_string(), Money::from_cents(*cents)))
            .collect()
    }

    fn transfer(from: &str, to: &str, cents: i64) -> Transfer {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount: Money::from_cents(cents),
        }
    }

    #[rstest]
    #[case::one_creditor_two_debtors(
        &[("alice", 8400), ("bob", -3600), ("charlie", -4800)],
        vec![transfer("charlie", "alice", 4800), transfer("bob", "alice", 3600)]
    )]
    #[case::two_creditors_one_debtor(
        &[("alice", 5000), ("bob", 2000), ("carol", -7000)],
        vec![transfer("carol", "alice", 5000), transfer("carol", "bob", 2000)]
    )]
    #[case::pairwise(
        &[("alice", 1000), ("bob", -1000)],
        vec![transfer("bob", "alice", 1000)]
    )]
    #[case::already_settled(&[("alice", 0), ("bob", 0)], vec![])]
    #[case::empty(&[], vec![])]
    #[case::within_tolerance(&[("alice", 1), ("bob", -1)], vec![])]
    fn settlement_cases(
        calculator: SettlementCalculator,
        #[case] input: &[(&str, i64)],
        #[case] expected: Vec<Transfer>,
    ) {
        let settlement = calculator.calculate(balances(input));
        assert_eq!(settlement.transfers, expected);
        assert!(settlement.balances.iter().all(|(_, b)| b.is_zero()));
    }

    #[rstest]
    fn ties_break_by_input_order(calculator: SettlementCalculator) {
        let settlement = calculator.calculate(balances(&[
            ("alice", 667),
            ("bob", -333),
            ("charlie", -333),
        ]));

        assert_eq!(
            settlement.transfers,
            vec![
                transfer("bob", "alice", 333),
                transfer("charlie", "alice", 333)
            ]
        );
        // The leftover cent is clamped to zero
        assert!(settlement.balances.iter().all(|(_, b)| b.is_zero()));
    }

    #[rstest]
    fn transfers_cover_total_credit(calculator: SettlementCalculator) {
        let input = balances(&[
            ("a", 12_345),
            ("b", -2_000),
            ("c", 4_321),
            ("d", -9_999),
            ("e", -4_667),
        ]);
        let credit: Money = input
            .iter()
            .map(|(_, b)| *b)
            .filter(|b| b.is_positive())
            .sum();

        let settlement = calculator.calculate(input);

        assert_eq!(settlement.total_transferred(), credit);
        assert!(settlement.transfers.len() <= 4);
        assert!(settlement.transfers.iter().all(|t| t.amount.is_positive()));
        assert!(settlement
            .balances
            .iter()
            .all(|(_, b)| b.is_within(Money::from_cents(1))));
    }

    #[rstest]
    fn unrounded_balances_are_rounded_first(calculator: SettlementCalculator) {
        let settlement = calculator.calculate(vec![
            ("alice".to_string(), Money::parse("6.6666666").unwrap()),
            ("bob".to_string(), Money::parse("-6.6666666").unwrap()),
        ]);
        assert_eq!(settlement.transfers, vec![transfer("bob", "alice", 667)]);
    }
}
