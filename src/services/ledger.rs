//! Ledger service
//!
//! Owns the people and expenses of a group, recomputes balances from the
//! expense history and settles them into transfers.
//!
//! A `Ledger` is not synchronized. Every mutator takes `&mut self`; sharing
//! one between threads needs an external lock.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::policy::{MissingPersonPolicy, PersonResolution};
use super::settlement::{SettlementCalculator, Transfer};
use crate::error::{FairshareError, FairshareResult};
use crate::models::{
    Expense, LedgerLimits, Money, Person, PersonTotals, SplitKind, SplitParams, SplitStrategy,
    Tolerances,
};

/// Raw expense input, before names are normalized or parameters checked
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub payer: String,
    pub amount: Money,
    pub participants: Vec<String>,
    pub split: SplitKind,
    /// Per-participant weights, percentages or exact amounts
    pub params: Vec<(String, Decimal)>,
}

impl NewExpense {
    /// Equal split with no parameters
    pub fn equal<S: Into<String>>(
        payer: impl Into<String>,
        amount: Money,
        participants: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount,
            participants: participants.into_iter().map(Into::into).collect(),
            split: SplitKind::Equal,
            params: Vec::new(),
        }
    }

    /// Use a parameterized split
    pub fn with_split<S: Into<String>>(
        mut self,
        split: SplitKind,
        params: impl IntoIterator<Item = (S, Decimal)>,
    ) -> Self {
        self.split = split;
        self.params = params.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }
}

/// Result of registering a person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPersonOutcome {
    Added,
    /// The name was already registered; nothing changed
    AlreadyExists,
}

/// Result of recording an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseAdded {
    /// People registered on the way, in the order they were resolved
    pub created: Vec<String>,
}

/// Aggregate figures for the whole ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub people: usize,
    pub expenses: usize,
    pub total_spent: Money,
    /// None when no expenses are recorded
    pub average_expense: Option<Money>,
    pub top_creditor: Option<(String, Money)>,
    pub top_debtor: Option<(String, Money)>,
}

/// The expense ledger for one group
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    people: Vec<Person>,
    index: HashMap<String, usize>,
    expenses: Vec<Expense>,
    limits: LedgerLimits,
    tolerances: Tolerances,
}

impl Ledger {
    /// Create an empty ledger with default limits and tolerances
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(limits: LedgerLimits, tolerances: Tolerances) -> Self {
        Self {
            limits,
            tolerances,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &LedgerLimits {
        &self.limits
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Register a person with zeroed totals
    ///
    /// Registering an existing name is a no-op reported as
    /// [`AddPersonOutcome::AlreadyExists`].
    pub fn add_person(&mut self, name: &str) -> FairshareResult<AddPersonOutcome> {
        self.add_person_with(name, PersonTotals::default())
    }

    /// Register a person with initial totals
    pub fn add_person_with(
        &mut self,
        name: &str,
        totals: PersonTotals,
    ) -> FairshareResult<AddPersonOutcome> {
        let name = Person::validate_name(name, self.limits.max_name_length)
            .map_err(|e| FairshareError::Validation(e.to_string()))?;

        if self.index.contains_key(&name) {
            info!(person = %name, "person already registered");
            return Ok(AddPersonOutcome::AlreadyExists);
        }

        let max_total = self.limits.max_initial_total();
        for (label, value) in [
            ("balance", totals.balance),
            ("paid", totals.paid),
            ("owed", totals.owed),
        ] {
            if !value.has_currency_precision() {
                return Err(FairshareError::Validation(format!(
                    "Initial {} cannot have more than 2 decimal places",
                    label
                )));
            }
            if value.abs() > max_total {
                return Err(FairshareError::Validation(format!(
                    "Initial {} cannot exceed {} in either direction",
                    label, max_total
                )));
            }
        }

        self.ensure_capacity(1)?;
        self.insert_person(Person::with_totals(name.clone(), totals));
        info!(person = %name, "person added");

        Ok(AddPersonOutcome::Added)
    }

    /// Validate and record an expense
    ///
    /// Unknown payers or participants are passed to `policy`. Nothing is
    /// changed unless the whole expense is accepted.
    pub fn add_expense(
        &mut self,
        input: NewExpense,
        policy: &mut dyn MissingPersonPolicy,
    ) -> FairshareResult<ExpenseAdded> {
        let params = SplitParams::new(input.params).map_err(validation)?;
        let strategy = SplitStrategy::new(
            input.split,
            params,
            self.tolerances.percentage,
            self.limits.max_amount,
        )
        .map_err(validation)?;
        let expense = Expense::new(
            &input.payer,
            input.amount,
            &input.participants,
            strategy,
            &self.limits,
        )
        .map_err(|e| {
            warn!(error = %e, "expense rejected");
            validation(e)
        })?;

        let mut missing: Vec<&str> = Vec::new();
        let names = std::iter::once(expense.payer())
            .chain(expense.participants().iter().map(String::as_str));
        for name in names {
            if !self.index.contains_key(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }

        for name in &missing {
            if policy.resolve(name)? == PersonResolution::Reject {
                warn!(person = %name, "unknown person rejected");
                return Err(FairshareError::person_not_found(*name));
            }
        }
        self.ensure_capacity(missing.len())?;

        let created: Vec<String> = missing.into_iter().map(String::from).collect();
        for name in &created {
            self.insert_person(Person::new(name.clone()));
            info!(person = %name, "person created for expense");
        }

        if let Some(&i) = self.index.get(expense.payer()) {
            self.people[i].paid += expense.amount();
        }

        info!(
            payer = %expense.payer(),
            amount = %expense.amount(),
            split = %expense.split(),
            participants = expense.participants().len(),
            "expense added"
        );
        self.expenses.push(expense);

        Ok(ExpenseAdded { created })
    }

    /// Rebuild every owed total and balance from the expense history
    ///
    /// Paid totals are kept; they are maintained as expenses are added.
    pub fn recompute_balances(&mut self) {
        for person in &mut self.people {
            person.owed = Money::zero();
        }

        for expense in &self.expenses {
            for share in expense.compute_shares() {
                if let Some(&i) = self.index.get(&share.participant) {
                    self.people[i].owed += share.amount;
                }
            }
        }

        for person in &mut self.people {
            person.refresh_balance();
        }

        debug!(
            people = self.people.len(),
            expenses = self.expenses.len(),
            "balances recomputed"
        );
    }

    /// Settle the current balances into transfers
    ///
    /// The settled (zero) balances are written back to each person. Expenses
    /// are untouched, so [`Self::recompute_balances`] restores the balances.
    pub fn settle(&mut self) -> Vec<Transfer> {
        let settlement =
            SettlementCalculator::new(self.tolerances.settlement).calculate(self.balances());

        for (person, (_, balance)) in self.people.iter_mut().zip(settlement.balances) {
            person.balance = balance;
        }

        info!(transfers = settlement.transfers.len(), "ledger settled");
        settlement.transfers
    }

    /// People in registration order
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Look up a person by raw or normalized name
    pub fn person(&self, name: &str) -> Option<&Person> {
        self.index
            .get(&Person::normalize_name(name))
            .map(|&i| &self.people[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.person(name).is_some()
    }

    /// Expenses in the order they were added
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.expenses.is_empty()
    }

    /// Current balances in registration order
    pub fn balances(&self) -> Vec<(String, Money)> {
        self.people
            .iter()
            .map(|p| (p.name.clone(), p.balance))
            .collect()
    }

    /// People ordered from largest credit to largest debt
    pub fn people_by_balance(&self) -> Vec<&Person> {
        let mut people: Vec<&Person> = self.people.iter().collect();
        people.sort_by(|a, b| b.balance.cmp(&a.balance));
        people
    }

    /// Aggregate figures over the current balances
    pub fn summary(&self) -> LedgerSummary {
        let total_spent: Money = self.expenses.iter().map(Expense::amount).sum();
        let average_expense = if self.expenses.is_empty() {
            None
        } else {
            Some((total_spent / Decimal::from(self.expenses.len())).round_currency())
        };

        let by_balance = self.people_by_balance();
        let top_creditor = by_balance
            .first()
            .filter(|p| p.balance > self.tolerances.settlement)
            .map(|p| (p.name.clone(), p.balance));
        let top_debtor = by_balance
            .last()
            .filter(|p| p.balance < -self.tolerances.settlement)
            .map(|p| (p.name.clone(), p.balance));

        LedgerSummary {
            people: self.people.len(),
            expenses: self.expenses.len(),
            total_spent,
            average_expense,
            top_creditor,
            top_debtor,
        }
    }

    fn ensure_capacity(&self, additional: usize) -> FairshareResult<()> {
        if self.people.len() + additional > self.limits.max_people {
            return Err(FairshareError::Validation(format!(
                "Cannot have more than {} people",
                self.limits.max_people
            )));
        }
        Ok(())
    }

    fn insert_person(&mut self, person: Person) {
        self.index.insert(person.name.clone(), self.people.len());
        self.people.push(person);
    }
}

fn validation(err: impl std::fmt::Display) -> FairshareError {
    FairshareError::Validation(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::policy::{AutoCreate, RejectMissing};

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ledger_with(names: &[&str]) -> Ledger {
        let mut ledger = Ledger::new();
        for name in names {
            ledger.add_person(name).unwrap();
        }
        ledger
    }

    fn balance(ledger: &Ledger, name: &str) -> Money {
        ledger.person(name).unwrap().balance
    }

    fn total_balance(ledger: &Ledger) -> Money {
        ledger.people().iter().map(|p| p.balance).sum()
    }

    fn trip() -> Ledger {
        let mut ledger = ledger_with(&["alice", "bob", "charlie"]);
        let everyone = ["alice", "bob", "charlie"];
        for (payer, amount) in [("alice", "150.00"), ("bob", "30.00"), ("charlie", "18.00")] {
            ledger
                .add_expense(NewExpense::equal(payer, money(amount), everyone), &mut RejectMissing)
                .unwrap();
        }
        ledger.recompute_balances();
        ledger
    }

    #[test]
    fn test_add_person_is_idempotent() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_person("Alice").unwrap(), AddPersonOutcome::Added);
        assert_eq!(
            ledger.add_person("  ALICE ").unwrap(),
            AddPersonOutcome::AlreadyExists
        );
        assert_eq!(ledger.people().len(), 1);
        assert_eq!(ledger.people()[0].name, "alice");
    }

    #[test]
    fn test_add_person_validation() {
        let mut ledger = Ledger::new();
        assert!(ledger.add_person("").unwrap_err().is_validation());
        assert!(ledger.add_person("bob#1").unwrap_err().is_validation());
        assert!(ledger.add_person(&"x".repeat(51)).unwrap_err().is_validation());

        let totals = PersonTotals {
            paid: money("1.005"),
            ..PersonTotals::default()
        };
        assert!(ledger.add_person_with("carol", totals).unwrap_err().is_validation());
        assert!(ledger.people().is_empty());
    }

    #[test]
    fn test_add_person_rejects_oversized_totals() {
        let mut ledger = Ledger::new();
        let huge = money("79200000000000000000000000000");
        for totals in [
            PersonTotals {
                paid: huge,
                ..PersonTotals::default()
            },
            PersonTotals {
                owed: huge,
                ..PersonTotals::default()
            },
            PersonTotals {
                balance: -huge,
                ..PersonTotals::default()
            },
        ] {
            let err = ledger.add_person_with("alice", totals).unwrap_err();
            assert!(err.is_validation());
        }
        assert!(ledger.people().is_empty());

        // the bound itself is accepted and later expenses still add up
        let max_total = ledger.limits().max_initial_total();
        let totals = PersonTotals {
            paid: max_total,
            balance: max_total,
            ..PersonTotals::default()
        };
        ledger.add_person_with("alice", totals).unwrap();
        ledger
            .add_expense(NewExpense::equal("alice", money("10"), ["alice"]), &mut RejectMissing)
            .unwrap();
        assert_eq!(ledger.person("alice").unwrap().paid, max_total + money("10"));
    }

    #[test]
    fn test_max_people() {
        let limits = LedgerLimits {
            max_people: 2,
            ..LedgerLimits::default()
        };
        let mut ledger = Ledger::with_config(limits, Tolerances::default());
        ledger.add_person("a").unwrap();
        ledger.add_person("b").unwrap();

        // existing names stay idempotent at capacity
        assert_eq!(ledger.add_person("a").unwrap(), AddPersonOutcome::AlreadyExists);
        assert!(ledger.add_person("c").unwrap_err().is_validation());

        let err = ledger
            .add_expense(NewExpense::equal("a", money("10"), ["a", "c"]), &mut AutoCreate)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn test_reference_scenario_balances() {
        let ledger = trip();
        assert_eq!(balance(&ledger, "alice"), money("84.00"));
        assert_eq!(balance(&ledger, "bob"), money("-36.00"));
        assert_eq!(balance(&ledger, "charlie"), money("-48.00"));
        assert_eq!(ledger.person("alice").unwrap().paid, money("150"));
        assert_eq!(ledger.person("alice").unwrap().owed, money("66"));
    }

    #[test]
    fn test_reference_scenario_settlement() {
        let mut ledger = trip();
        let mut transfers = ledger.settle();
        transfers.sort_by(|a, b| a.from.cmp(&b.from));

        assert_eq!(transfers.len(), 2);
        assert_eq!(
            (transfers[0].from.as_str(), transfers[0].to.as_str(), transfers[0].amount),
            ("bob", "alice", money("36.00"))
        );
        assert_eq!(
            (transfers[1].from.as_str(), transfers[1].to.as_str(), transfers[1].amount),
            ("charlie", "alice", money("48.00"))
        );
        assert!(ledger.people().iter().all(|p| p.balance.is_zero()));
    }

    #[test]
    fn test_settle_then_recompute_restores_balances() {
        let mut ledger = trip();
        let before = ledger.balances();
        ledger.settle();
        assert_eq!(ledger.expenses().len(), 3);

        ledger.recompute_balances();
        assert_eq!(ledger.balances(), before);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut ledger = trip();
        let first = ledger.balances();
        ledger.recompute_balances();
        ledger.recompute_balances();
        assert_eq!(ledger.balances(), first);
    }

    #[test]
    fn test_precision_scenario() {
        let mut ledger = ledger_with(&["alice", "bob", "charlie"]);
        ledger
            .add_expense(
                NewExpense::equal("alice", money("10.00"), ["alice", "bob", "charlie"]),
                &mut RejectMissing,
            )
            .unwrap();
        ledger.recompute_balances();

        assert_eq!(balance(&ledger, "alice"), money("6.67"));
        assert_eq!(balance(&ledger, "bob"), money("-3.33"));
        assert_eq!(balance(&ledger, "charlie"), money("-3.33"));
        assert!(total_balance(&ledger).is_within(Money::from_cents(1)));

        let transfers = ledger.settle();
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.amount == money("3.33")));
        assert!(ledger.people().iter().all(|p| p.balance.is_zero()));
    }

    #[test]
    fn test_conservation_across_split_kinds() {
        let mut ledger = ledger_with(&["alice", "bob", "carol"]);
        let expenses = [
            NewExpense::equal("alice", money("100"), ["alice", "bob", "carol"]),
            NewExpense::equal("bob", money("45.50"), ["alice", "bob", "carol"])
                .with_split(
                    SplitKind::Weighted,
                    [("alice", dec("1")), ("bob", dec("2")), ("carol", dec("4"))],
                ),
            NewExpense::equal("carol", money("80"), ["alice", "bob"])
                .with_split(
                    SplitKind::Percentage,
                    [("alice", dec("33.33")), ("bob", dec("66.67"))],
                ),
            NewExpense::equal("alice", money("12.34"), ["bob", "carol"])
                .with_split(SplitKind::Exact, [("bob", dec("10")), ("carol", dec("2.34"))]),
        ];
        for expense in expenses {
            ledger.add_expense(expense, &mut RejectMissing).unwrap();
        }
        ledger.recompute_balances();

        assert!(total_balance(&ledger).is_within(Money::from_cents(2)));
    }

    #[test]
    fn test_oversized_exact_amounts_rejected() {
        let mut ledger = ledger_with(&["alice", "bob"]);
        let huge = dec("79200000000000000000000000000");
        let err = ledger
            .add_expense(
                NewExpense::equal("alice", money("10"), ["alice", "bob"])
                    .with_split(SplitKind::Exact, [("alice", huge), ("bob", huge)]),
                &mut RejectMissing,
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("cannot exceed"));
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn test_missing_people_rejected() {
        let mut ledger = ledger_with(&["alice"]);
        let err = ledger
            .add_expense(
                NewExpense::equal("alice", money("20"), ["alice", "Dave"]),
                &mut RejectMissing,
            )
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Person not found: dave");
        assert!(ledger.expenses().is_empty());
        assert!(ledger.person("alice").unwrap().paid.is_zero());
    }

    #[test]
    fn test_missing_people_created() {
        let mut ledger = ledger_with(&["alice"]);
        let added = ledger
            .add_expense(
                NewExpense::equal("Erin", money("20"), ["alice", "dave", "erin"]),
                &mut AutoCreate,
            )
            .unwrap();

        assert_eq!(added.created, ["erin", "dave"]);
        assert_eq!(ledger.person("erin").unwrap().paid, money("20"));
        assert!(ledger.contains("dave"));
    }

    #[test]
    fn test_partial_rejection_creates_nobody() {
        let mut ledger = ledger_with(&["alice"]);
        let mut policy = |name: &str| {
            if name == "dave" {
                PersonResolution::Create
            } else {
                PersonResolution::Reject
            }
        };
        let err = ledger
            .add_expense(
                NewExpense::equal("alice", money("20"), ["dave", "erin"]),
                &mut policy,
            )
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!ledger.contains("dave"));
    }

    #[test]
    fn test_invalid_expense_never_consults_policy() {
        let mut ledger = Ledger::new();
        let mut asked = 0;
        let mut policy = |_: &str| {
            asked += 1;
            PersonResolution::Create
        };
        let input = NewExpense::equal("alice", money("10"), ["alice", "bob"])
            .with_split(SplitKind::Percentage, [("alice", dec("50")), ("bob", dec("40"))]);

        let err = ledger.add_expense(input, &mut policy).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(asked, 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_expense_validation_messages() {
        let mut ledger = ledger_with(&["alice", "bob"]);

        let err = ledger
            .add_expense(NewExpense::equal("alice", money("0"), ["alice"]), &mut RejectMissing)
            .unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = ledger
            .add_expense(
                NewExpense::equal("alice", money("1000000"), ["alice"]),
                &mut RejectMissing,
            )
            .unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));

        let input = NewExpense::equal("alice", money("10"), ["alice", "bob"])
            .with_split(SplitKind::Exact, [("alice", dec("4"))]);
        let err = ledger.add_expense(input, &mut RejectMissing).unwrap_err();
        assert!(err.to_string().contains("bob"));
    }

    #[test]
    fn test_settle_empty_ledger() {
        let mut ledger = Ledger::new();
        assert!(ledger.settle().is_empty());
        ledger.recompute_balances();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_people_by_balance_and_summary() {
        let ledger = trip();
        let order: Vec<&str> = ledger
            .people_by_balance()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(order, ["alice", "bob", "charlie"]);

        let summary = ledger.summary();
        assert_eq!(summary.people, 3);
        assert_eq!(summary.expenses, 3);
        assert_eq!(summary.total_spent, money("198.00"));
        assert_eq!(summary.average_expense, Some(money("66.00")));
        assert_eq!(summary.top_creditor, Some(("alice".into(), money("84"))));
        assert_eq!(summary.top_debtor, Some(("charlie".into(), money("-48"))));
    }

    #[test]
    fn test_summary_of_empty_ledger() {
        let summary = Ledger::new().summary();
        assert_eq!(summary.average_expense, None);
        assert_eq!(summary.top_creditor, None);
        assert_eq!(summary.top_debtor, None);
    }
}
