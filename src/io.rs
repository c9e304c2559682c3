//! Helpers for loading and saving ledgers, and for exporting reports

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    codec,
    errors::Error,
    types::{Expense, Ledger, Storage},
};

impl Ledger {
    /// Loads a ledger from storage.
    ///
    /// A storage resource that does not exist yet loads as an empty ledger.
    /// # Errors
    /// [`Error::Storage`] if the resource cannot be read, and
    /// [`Error::MalformedRecord`] for the first line that does not decode;
    /// nothing is loaded in either case
    pub fn load<S>(storage: &S) -> Result<Self, Error>
    where
        S: Storage + ?Sized,
    {
        let Some(reader) = storage.reader()? else {
            return Ok(Ledger::new());
        };
        let expenses = read_expenses(reader)?;
        tracing::debug!(count = expenses.len(), "loaded expenses");
        Ok(expenses.into())
    }

    /// Writes every expense to storage, replacing whatever it held before.
    /// # Errors
    /// [`Error::Storage`] if the resource cannot be opened or written
    pub fn save<S>(&self, storage: &mut S) -> Result<(), Error>
    where
        S: Storage + ?Sized,
    {
        let mut writer = storage.writer()?;
        write_expenses(&mut writer, self)?;
        tracing::debug!(count = self.len(), "saved expenses");
        Ok(())
    }
}

/// Reads stored expense lines from a stream.
///
/// Blank and whitespace-only lines are skipped.
///
/// Expects input data in this format (no header):
/// ```text
/// Food,12.50,2024-03-15,Lunch with team
///
/// Transport,5.00,2024-03-20,Bus
/// ```
pub fn read_expenses<R>(reader: R) -> Result<Vec<Expense>, Error>
where
    R: BufRead,
{
    let mut expenses = vec![];
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        expenses.push(codec::decode_line(&line, index + 1)?);
    }
    Ok(expenses)
}

/// Writes expenses in stored form, one newline-terminated line each.
pub fn write_expenses<'a, W, I>(writer: &mut W, expenses: I) -> Result<(), Error>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a Expense>,
{
    for expense in expenses {
        writeln!(writer, "{}", codec::encode(expense))?;
    }
    writer.flush()?;
    Ok(())
}

/// Type used for serializing an [`Expense`] as a CSV row.
#[derive(Serialize, Debug)]
struct ExpenseRow<'a> {
    /// The day of the expense
    date: NaiveDate,
    /// The category label
    category: &'a str,
    /// The amount spent
    amount: Decimal,
    /// The free-form note
    description: &'a str,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            date: expense.date,
            category: &expense.category,
            amount: expense.amount,
            description: &expense.description,
        }
    }
}

/// Type used for serializing one line of a category report.
#[derive(Serialize, Debug)]
struct CategoryTotal {
    /// The category label
    category: String,
    /// Sum of all amounts in the category
    total: Decimal,
}

/// Outputs expenses as standard CSV, with quoting where needed.
///
/// Output data will be in the form:
/// ```csv
/// date,category,amount,description
/// 2024-03-15,Food,12.50,"Lunch, with team"
/// ```
pub fn write_expenses_to_csv<'a, W, I>(writer: &mut W, expenses: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Expense>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for expense in expenses {
        csv_writer.serialize(ExpenseRow::from(expense))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Outputs per-category totals of the ledger as CSV, sorted by category.
///
/// Output data will be in the form:
/// ```csv
/// category,total
/// Food,19.75
/// Transport,5.00
/// ```
pub fn write_category_report_to_csv<W>(writer: &mut W, ledger: &Ledger) -> Result<(), Error>
where
    W: Write,
{
    let mut totals: Vec<CategoryTotal> = ledger
        .group_by_category()
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| a.category.cmp(&b.category));
    let mut csv_writer = csv::Writer::from_writer(writer);
    for total in totals {
        csv_writer.serialize(total)?;
    }
    csv_writer.flush()?;
    Ok(())
}
