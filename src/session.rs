//! Interactive menu session over a [`Ledger`]
//!
//! The session owns its collaborators: the storage the ledger is loaded from
//! and saved to, and the input and output streams of the console.

use std::io::{BufRead, Write};

use chrono::{Local, Month, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    codec::{self, round_cents},
    errors::Error,
    ops::total_amount,
    types::{Expense, Ledger, Storage, DELIMITER},
};

/// Outcome of reading one reply from the console
enum Reply {
    /// A trimmed line of input
    Line(String),
    /// The input stream is exhausted
    Closed,
}

/// A single interactive run: menu loop, prompts and reports
pub struct Session<S, R, W> {
    ledger: Ledger,
    storage: S,
    input: R,
    output: W,
    /// Cleared when the storage could not be read, so exit cannot clobber it
    save_on_exit: bool,
}

impl<S, R, W> Session<S, R, W>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    /// Creates a session over an already loaded ledger
    pub fn new(ledger: Ledger, storage: S, input: R, output: W) -> Self {
        Self {
            ledger,
            storage,
            input,
            output,
            save_on_exit: true,
        }
    }

    /// Loads the ledger from `storage` and creates a session over it.
    ///
    /// If the storage cannot be read, the failure is reported on `output` and
    /// the session starts empty with saving disabled, leaving the unread
    /// resource untouched.
    /// # Errors
    /// [`Error::MalformedRecord`] if the stored ledger does not decode
    pub fn open(storage: S, input: R, mut output: W) -> Result<Self, Error> {
        match Ledger::load(&storage) {
            Ok(ledger) => Ok(Self::new(ledger, storage, input, output)),
            Err(Error::Storage(err)) => {
                tracing::error!("failed to load expenses: {err}");
                writeln!(output, "Error loading expenses: {err}")?;
                writeln!(output, "Changes made in this session will not be saved.")?;
                let mut session = Self::new(Ledger::new(), storage, input, output);
                session.save_on_exit = false;
                Ok(session)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the ledger in its current state
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Consumes the session, returning the ledger and storage
    pub fn into_parts(self) -> (Ledger, S) {
        (self.ledger, self.storage)
    }

    /// Runs the menu loop until the user exits or input runs out, then saves.
    ///
    /// A failed save is reported on the output and does not make this fail.
    /// # Errors
    /// [`Error::Storage`] only if the console streams themselves fail
    pub fn run(&mut self) -> Result<(), Error> {
        writeln!(self.output, "ExpenseEase - Personal Finance Tracker")?;
        loop {
            self.print_menu()?;
            let choice = match self.read_reply()? {
                Reply::Line(choice) => choice,
                Reply::Closed => break,
            };
            match choice.as_str() {
                "1" => self.add_expense()?,
                "2" => self.remove_expense()?,
                "3" => self.view_all()?,
                "4" => self.monthly_summary()?,
                "5" => self.category_report()?,
                "6" => break,
                _ => writeln!(self.output, "Invalid choice")?,
            }
        }
        self.save()
    }

    fn save(&mut self) -> Result<(), Error> {
        if !self.save_on_exit {
            writeln!(self.output, "Expenses not saved. Goodbye!")?;
            return Ok(());
        }
        match self.ledger.save(&mut self.storage) {
            Ok(()) => writeln!(self.output, "Expenses saved. Goodbye!")?,
            Err(err) => {
                tracing::error!("failed to save expenses: {err}");
                writeln!(self.output, "Error saving expenses: {err}")?;
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> Result<(), Error> {
        write!(
            self.output,
            "\n===== MAIN MENU =====\n\
             1. Add Expense\n\
             2. Remove Expense\n\
             3. View All Expenses\n\
             4. Monthly Summary\n\
             5. Category Report\n\
             6. Exit\n\
             Select an option: "
        )?;
        self.output.flush()?;
        Ok(())
    }

    fn add_expense(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\nAdd New Expense")?;
        let Some(category) = self.prompt_until("Category (e.g., Food, Transport): ", parse_category)?
        else {
            return Ok(());
        };
        let Some(amount) = self.prompt_until("Amount: $", codec::parse_amount)? else {
            return Ok(());
        };
        let Some(date) =
            self.prompt_until("Date [YYYY-MM-DD] (today if blank): ", parse_date_or_today)?
        else {
            return Ok(());
        };
        let Some(description) = self.prompt_until("Description: ", parse_description)? else {
            return Ok(());
        };
        self.ledger.add(category, amount, date, description);
        writeln!(self.output, "Expense added!")?;
        Ok(())
    }

    fn remove_expense(&mut self) -> Result<(), Error> {
        if self.ledger.is_empty() {
            writeln!(self.output, "No expenses to remove")?;
            return Ok(());
        }
        writeln!(self.output, "\nRemove Expense")?;
        for (position, expense) in self.ledger.list_all().iter().enumerate() {
            writeln!(self.output, "{}", numbered(position + 1, expense))?;
        }
        let Some(reply) = self.prompt("Enter expense number to remove (0 to cancel): ")? else {
            return Ok(());
        };
        let Ok(index) = reply.parse::<usize>() else {
            writeln!(self.output, "Invalid number")?;
            return Ok(());
        };
        match self.ledger.remove_at(index) {
            Ok(Some(removed)) => writeln!(self.output, "Removed: {removed}")?,
            Ok(None) => (),
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(())
    }

    fn view_all(&mut self) -> Result<(), Error> {
        if self.ledger.is_empty() {
            writeln!(self.output, "No expenses recorded")?;
            return Ok(());
        }
        writeln!(self.output, "\nAll Expenses ({})", self.ledger.len())?;
        for expense in &self.ledger {
            writeln!(self.output, "{expense}")?;
        }
        writeln!(self.output, "\nTotal: ${:.2}", round_cents(self.ledger.total()))?;
        Ok(())
    }

    fn monthly_summary(&mut self) -> Result<(), Error> {
        writeln!(self.output, "\nMonthly Summary")?;
        let Some(year) = self.prompt_until("Enter year (YYYY): ", parse_year)? else {
            return Ok(());
        };
        let Some(month) = self.prompt_until("Enter month (1-12): ", parse_month)? else {
            return Ok(());
        };
        let month_name = month.name();
        let expenses = self.ledger.filter_by_month(year, month.number_from_month());
        if expenses.is_empty() {
            writeln!(self.output, "No expenses for {month_name} {year}")?;
            return Ok(());
        }
        for expense in &expenses {
            writeln!(self.output, "{expense}")?;
        }
        let total = round_cents(total_amount(expenses));
        writeln!(self.output, "\nTotal for {month_name} {year}: ${total:.2}")?;
        Ok(())
    }

    fn category_report(&mut self) -> Result<(), Error> {
        if self.ledger.is_empty() {
            writeln!(self.output, "No expenses recorded")?;
            return Ok(());
        }
        let report = self.ledger.group_by_category();
        writeln!(self.output, "\nCategory Report")?;
        for (category, total) in &report {
            writeln!(self.output, "{category:<15}: ${:.2}", round_cents(*total))?;
        }
        let grand_total = round_cents(report.values().copied().sum::<Decimal>());
        writeln!(self.output, "\nGrand Total: ${grand_total:.2}")?;
        Ok(())
    }

    fn read_reply(&mut self) -> Result<Reply, Error> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Reply::Closed);
        }
        Ok(Reply::Line(line.trim().to_owned()))
    }

    /// Asks once. `None` means the input is exhausted.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        match self.read_reply()? {
            Reply::Line(line) => Ok(Some(line)),
            Reply::Closed => Ok(None),
        }
    }

    /// Asks until `parse` accepts the reply, reporting each rejection.
    fn prompt_until<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<Option<T>, Error> {
        while let Some(reply) = self.prompt(prompt)? {
            match parse(&reply) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => writeln!(self.output, "Please try again: {reason}")?,
            }
        }
        Ok(None)
    }
}

/// Category text must not split the stored line
fn parse_category(text: &str) -> Result<String, String> {
    if text.contains(DELIMITER) {
        return Err(format!("{DELIMITER:?} is not allowed here"));
    }
    parse_description(text)
}

fn parse_description(text: &str) -> Result<String, String> {
    if text.contains(['\r', '\n']) {
        return Err("line breaks are not allowed".to_owned());
    }
    Ok(text.to_owned())
}

fn parse_date_or_today(text: &str) -> Result<NaiveDate, String> {
    if text.is_empty() {
        return Ok(Local::now().date_naive());
    }
    codec::parse_date(text).map_err(|_| "use YYYY-MM-DD format".to_owned())
}

fn parse_year(text: &str) -> Result<i32, String> {
    text.parse().map_err(|_| format!("invalid year {text:?}"))
}

fn parse_month(text: &str) -> Result<Month, String> {
    let month: u8 = text.parse().map_err(|_| format!("invalid month {text:?}"))?;
    Month::try_from(month).map_err(|_| "month must be 1-12".to_owned())
}

fn numbered(position: usize, expense: &Expense) -> String {
    format!("{position:>2}. {expense}")
}
