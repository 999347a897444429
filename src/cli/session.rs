//! Interactive menu session
//!
//! Drives a [`Ledger`] from a numbered menu. Payers and participants can be
//! picked by number or typed by name; unknown names go through the configured
//! missing-person mode.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::prompt::{parse_choice, PromptPolicy, Prompter};
use crate::config::{FairsharePaths, MissingPersonMode, Settings};
use crate::display::{
    format_balance_list, format_expense_list, format_people_list, format_summary,
    format_transfers, heading,
};
use crate::error::{FairshareError, FairshareResult};
use crate::export::{write_report_file, ExportFormat, SettlementReport};
use crate::models::expense::validate_amount;
use crate::models::limits::{MAX_PERCENTAGE, MAX_WEIGHT};
use crate::models::person::capitalize;
use crate::models::{Person, SplitKind};
use crate::services::{AddPersonOutcome, AutoCreate, Ledger, NewExpense, RejectMissing};

const MENU: [&str; 9] = [
    "Add a person",
    "Add an expense",
    "View all people",
    "View all expenses",
    "View current balances",
    "Show summary",
    "Settle debts",
    "Export settlement",
    "Exit",
];

/// Session options taken from settings and command line flags
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub currency: String,
    pub missing: MissingPersonMode,
    pub export_dir: PathBuf,
}

impl SessionOptions {
    pub fn from_settings(settings: &Settings, paths: &FairsharePaths) -> Self {
        Self {
            currency: settings.currency_symbol.clone(),
            missing: settings.missing_person,
            export_dir: paths.export_dir(),
        }
    }
}

/// An interactive session over one ledger
pub struct Session<R, W> {
    ledger: Ledger,
    prompter: Prompter<R, W>,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(ledger: Ledger, prompter: Prompter<R, W>, options: SessionOptions) -> Self {
        Self {
            ledger,
            prompter,
            options,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Consume the session, returning the ledger and the output sink
    pub fn into_parts(self) -> (Ledger, W) {
        (self.ledger, self.prompter.into_output())
    }

    /// Run the menu loop until the user exits or input ends
    pub fn run(&mut self) -> FairshareResult<()> {
        self.prompter.say("Fairshare - split expenses fairly among friends")?;

        loop {
            self.print_menu()?;
            let choice = match self.prompter.choice("Enter your choice (1-9): ", MENU.len()) {
                Ok(choice) => choice,
                Err(FairshareError::Cancelled) => break,
                Err(e) => return Err(e),
            };
            debug!(choice = choice + 1, "menu selection");

            let result = match choice {
                0 => self.add_person(),
                1 => self.add_expense(),
                2 => self.view_people(),
                3 => self.view_expenses(),
                4 => self.view_balances(),
                5 => self.show_summary(),
                6 => self.settle(),
                7 => self.export(),
                _ => break,
            };

            match result {
                Ok(()) => {}
                Err(FairshareError::Cancelled) => break,
                Err(e @ (FairshareError::Validation(_) | FairshareError::NotFound { .. })) => {
                    warn!(error = %e, "operation rejected");
                    self.prompter.say(format!("Error: {}", e))?;
                }
                Err(e) => return Err(e),
            }
        }

        self.prompter.say("Goodbye!")?;
        Ok(())
    }

    fn print_menu(&mut self) -> FairshareResult<()> {
        self.prompter.say("")?;
        self.prompter.print(heading("Menu"))?;
        for (i, item) in MENU.iter().enumerate() {
            self.prompter.say(format!("{}. {}", i + 1, item))?;
        }
        Ok(())
    }

    fn add_person(&mut self) -> FairshareResult<()> {
        loop {
            let name = self
                .prompter
                .line("Enter person's name (or 'back' to return): ")?;
            if name.eq_ignore_ascii_case("back") {
                return Ok(());
            }

            match self.ledger.add_person(&name) {
                Ok(AddPersonOutcome::Added) => {
                    let name = Person::normalize_name(&name);
                    return self
                        .prompter
                        .say(format!("{} has been added.", capitalize(&name)));
                }
                Ok(AddPersonOutcome::AlreadyExists) => {
                    let name = Person::normalize_name(&name);
                    return self
                        .prompter
                        .say(format!("{} is already in the ledger.", capitalize(&name)));
                }
                Err(e) if e.is_validation() => self.prompter.say(format!("Error: {}", e))?,
                Err(e) => return Err(e),
            }
        }
    }

    fn add_expense(&mut self) -> FairshareResult<()> {
        let names = self.names();
        self.list_people()?;

        let payer = self.prompter.ask("Who paid? (number or name): ", |answer| {
            pick_person(answer, &names)
        })?;

        let max = self.ledger.limits().max_amount;
        let amount_prompt = format!("Enter expense amount ({}): ", self.options.currency);
        let amount = self.prompter.money(&amount_prompt, |amount| {
            validate_amount(amount, max).map_err(|e| e.to_string())
        })?;

        let participants = self.prompter.ask(
            "Participants (numbers or names separated by commas, or 'all'): ",
            |answer| pick_participants(answer, &names),
        )?;

        self.prompter.say("Choose split method:")?;
        for (i, kind) in SplitKind::ALL.iter().enumerate() {
            self.prompter.say(format!("  {}. {}", i + 1, kind.label()))?;
        }
        let kind = self.prompter.ask("Enter choice (1-4 or a name): ", |answer| {
            parse_choice(answer, SplitKind::ALL.len())
                .map(|i| SplitKind::ALL[i])
                .or_else(|_| answer.parse::<SplitKind>().map_err(|e| e.to_string()))
        })?;
        let params = self.split_params(kind, &participants)?;

        let input = NewExpense::equal(payer, amount, participants).with_split(kind, params);
        let added = match self.options.missing {
            MissingPersonMode::Prompt => self
                .ledger
                .add_expense(input, &mut PromptPolicy::new(&mut self.prompter))?,
            MissingPersonMode::Create => self.ledger.add_expense(input, &mut AutoCreate)?,
            MissingPersonMode::Reject => self.ledger.add_expense(input, &mut RejectMissing)?,
        };

        for name in &added.created {
            self.prompter
                .say(format!("{} has been added.", capitalize(name)))?;
        }
        self.prompter.say(format!(
            "Expense of {} added.",
            amount.format_with_symbol(&self.options.currency)
        ))
    }

    /// Ask for the per-participant parameters of `kind`
    fn split_params(
        &mut self,
        kind: SplitKind,
        participants: &[String],
    ) -> FairshareResult<Vec<(String, Decimal)>> {
        let mut params = Vec::with_capacity(participants.len());

        match kind {
            SplitKind::Equal => {}
            SplitKind::Weighted => {
                for name in participants {
                    let prompt = format!("Weight for {}: ", capitalize(name));
                    let weight = self.prompter.decimal(&prompt, |w| {
                        if w < Decimal::ZERO {
                            Err("Weight cannot be negative.".into())
                        } else if w > MAX_WEIGHT {
                            Err(format!("Weight cannot exceed {}.", MAX_WEIGHT))
                        } else {
                            Ok(())
                        }
                    })?;
                    params.push((name.clone(), weight));
                }
            }
            SplitKind::Percentage => {
                let mut total = Decimal::ZERO;
                if let Some((last, rest)) = participants.split_last() {
                    for name in rest {
                        let remaining = MAX_PERCENTAGE - total;
                        let prompt = format!("Percentage for {} (%): ", capitalize(name));
                        let percent = self.prompter.decimal(&prompt, |p| {
                            if p <= Decimal::ZERO || p > MAX_PERCENTAGE {
                                Err("Percentage must be between 0 and 100.".into())
                            } else if p > remaining {
                                Err(format!("Total would exceed 100%. Remaining: {}%", remaining))
                            } else {
                                Ok(())
                            }
                        })?;
                        total += percent;
                        params.push((name.clone(), percent));
                    }

                    let remaining = MAX_PERCENTAGE - total;
                    self.prompter.say(format!(
                        "Remaining percentage for {}: {}%",
                        capitalize(last),
                        remaining
                    ))?;
                    params.push((last.clone(), remaining));
                }
            }
            SplitKind::Exact => {
                let max = self.ledger.limits().max_amount;
                let currency = self.options.currency.clone();
                for name in participants {
                    let prompt = format!("Amount for {} ({}): ", capitalize(name), currency);
                    let amount = self.prompter.money(&prompt, |m| {
                        if m.is_negative() {
                            Err("Amount cannot be negative.".into())
                        } else if m > max {
                            Err(format!(
                                "Amount cannot exceed {}.",
                                max.format_with_symbol(&currency)
                            ))
                        } else {
                            Ok(())
                        }
                    })?;
                    params.push((name.clone(), amount.amount()));
                }
            }
        }

        Ok(params)
    }

    fn view_people(&mut self) -> FairshareResult<()> {
        self.prompter.print(heading("People"))?;
        self.prompter.print(format_people_list(self.ledger.people()))?;
        self.prompter.say("")
    }

    fn view_expenses(&mut self) -> FairshareResult<()> {
        self.prompter.print(heading("Expenses"))?;
        let list = format_expense_list(self.ledger.expenses(), &self.options.currency);
        self.prompter.print(list)?;
        self.prompter.say("")
    }

    fn view_balances(&mut self) -> FairshareResult<()> {
        self.ledger.recompute_balances();
        self.prompter.print(heading("Current balances"))?;
        self.print_balances()
    }

    fn show_summary(&mut self) -> FairshareResult<()> {
        self.ledger.recompute_balances();
        self.prompter.print(heading("Summary"))?;
        let summary = format_summary(&self.ledger.summary(), &self.options.currency);
        self.prompter.print(summary)?;
        self.prompter.say("")
    }

    fn settle(&mut self) -> FairshareResult<()> {
        if self.ledger.expenses().is_empty() {
            return self.prompter.say("No expenses to settle.");
        }

        self.ledger.recompute_balances();
        self.prompter.print(heading("Current balances"))?;
        self.print_balances()?;

        let transfers = self.ledger.settle();
        self.prompter.say("")?;
        self.prompter.print(heading("Settlement transactions"))?;
        self.prompter
            .print(format_transfers(&transfers, &self.options.currency))?;
        self.prompter.say("")?;

        self.prompter.say("Settlement complete.")?;
        self.prompter.print(heading("Final balances"))?;
        self.print_balances()
    }

    fn export(&mut self) -> FairshareResult<()> {
        if self.ledger.expenses().is_empty() {
            return self.prompter.say("No expenses to settle.");
        }

        self.prompter.say("Export format:")?;
        self.prompter.say("  1. JSON (full report)")?;
        self.prompter.say("  2. CSV (transfers only)")?;
        let format = match self.prompter.choice("Enter choice (1-2): ", 2)? {
            0 => ExportFormat::Json,
            _ => ExportFormat::Csv,
        };

        self.ledger.recompute_balances();
        let before = self.ledger.people().to_vec();
        let transfers = self.ledger.settle();
        self.ledger.recompute_balances();

        let report = SettlementReport::new(&before, transfers, &self.options.currency);
        let path = write_report_file(&report, format, &self.options.export_dir)?;
        self.prompter
            .say(format!("Settlement exported to: {}", path.display()))
    }

    fn print_balances(&mut self) -> FairshareResult<()> {
        let table = format_balance_list(&self.ledger.people_by_balance(), &self.options.currency);
        self.prompter.print(table)?;
        self.prompter.say("")
    }

    fn list_people(&mut self) -> FairshareResult<()> {
        if self.ledger.people().is_empty() {
            return Ok(());
        }
        self.prompter.say("Available people:")?;
        let list = format_people_list(self.ledger.people());
        for line in list.lines() {
            self.prompter.say(format!("  {}", line))?;
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.ledger.people().iter().map(|p| p.name.clone()).collect()
    }
}

/// Resolve a number (1-based into `people`) or a typed name
fn pick_person(answer: &str, people: &[String]) -> Result<String, String> {
    if answer.is_empty() {
        return Err("Please enter a number or a name.".into());
    }
    if answer.chars().all(|c| c.is_ascii_digit()) {
        if people.is_empty() {
            return Err("No people available yet. Enter a name instead.".into());
        }
        return parse_choice(answer, people.len()).map(|i| people[i].clone());
    }
    Ok(answer.to_string())
}

/// Resolve a comma separated list of numbers and names, or "all"
fn pick_participants(answer: &str, people: &[String]) -> Result<Vec<String>, String> {
    if answer.eq_ignore_ascii_case("all") {
        if people.is_empty() {
            return Err("No people available yet. Enter names instead.".into());
        }
        return Ok(people.to_vec());
    }

    let mut picked: Vec<String> = Vec::new();
    for token in answer.split(',').map(str::trim) {
        let name = pick_person(token, people)?;
        let key = Person::normalize_name(&name);
        if picked.iter().any(|p| Person::normalize_name(p) == key) {
            return Err(format!("{} was selected twice.", capitalize(&key)));
        }
        picked.push(name);
    }
    Ok(picked)
}
