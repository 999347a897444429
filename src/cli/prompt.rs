//! Line-based prompting
//!
//! All interactive input goes through [`Prompter`], which reads from any
//! `BufRead` and writes to any `Write`. Invalid answers are reported and the
//! question is asked again; end of input surfaces as
//! [`FairshareError::Cancelled`].

use std::fmt::Display;
use std::io::{BufRead, Write};

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{FairshareError, FairshareResult};
use crate::models::person::capitalize;
use crate::models::Money;
use crate::services::{MissingPersonPolicy, PersonResolution};

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line of text
    pub fn say(&mut self, text: impl Display) -> FairshareResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write text without a trailing newline
    pub fn print(&mut self, text: impl Display) -> FairshareResult<()> {
        write!(self.output, "{}", text)?;
        Ok(())
    }

    /// Ask a question and return the trimmed answer
    pub fn line(&mut self, prompt: &str) -> FairshareResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            self.say("")?;
            return Err(FairshareError::Cancelled);
        }

        Ok(input.trim().to_string())
    }

    /// Ask until `parse` accepts the answer
    ///
    /// Rejections are shown to the user and the prompt repeats.
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> FairshareResult<T> {
        loop {
            let answer = self.line(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => {
                    debug!(%answer, %message, "answer rejected");
                    self.say(format!("Error: {}", message))?;
                }
            }
        }
    }

    /// Ask for a menu choice between 1 and `count`, returned zero-based
    pub fn choice(&mut self, prompt: &str, count: usize) -> FairshareResult<usize> {
        self.ask(prompt, |answer| parse_choice(answer, count))
    }

    /// Ask a yes/no question
    pub fn confirm(&mut self, prompt: &str) -> FairshareResult<bool> {
        self.ask(prompt, |answer| match answer.to_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Err("Please answer yes or no.".to_string()),
        })
    }

    /// Ask for a monetary amount, validated by `check`
    pub fn money(
        &mut self,
        prompt: &str,
        mut check: impl FnMut(Money) -> Result<(), String>,
    ) -> FairshareResult<Money> {
        self.ask(prompt, |answer| {
            let amount = Money::parse(answer).map_err(|e| e.to_string())?;
            check(amount)?;
            Ok(amount)
        })
    }

    /// Ask for a plain number, validated by `check`
    pub fn decimal(
        &mut self,
        prompt: &str,
        mut check: impl FnMut(Decimal) -> Result<(), String>,
    ) -> FairshareResult<Decimal> {
        self.ask(prompt, |answer| {
            let value: Decimal = answer
                .trim_end_matches('%')
                .trim()
                .parse()
                .map_err(|_| "Please enter a valid number.".to_string())?;
            check(value)?;
            Ok(value)
        })
    }
}

/// Parse a 1-based menu choice into a zero-based index
pub fn parse_choice(answer: &str, count: usize) -> Result<usize, String> {
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err(format!("Please enter a number between 1 and {}.", count)),
    }
}

/// Asks the user before registering an unknown person
pub struct PromptPolicy<'a, R, W> {
    prompter: &'a mut Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> PromptPolicy<'a, R, W> {
    pub fn new(prompter: &'a mut Prompter<R, W>) -> Self {
        Self { prompter }
    }
}

impl<R: BufRead, W: Write> MissingPersonPolicy for PromptPolicy<'_, R, W> {
    fn resolve(&mut self, name: &str) -> FairshareResult<PersonResolution> {
        let question = format!(
            "{} is not in the ledger. Add them? (y/n): ",
            capitalize(name)
        );
        if self.prompter.confirm(&question)? {
            Ok(PersonResolution::Create)
        } else {
            Ok(PersonResolution::Reject)
        }
    }
}
