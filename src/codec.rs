//! The one-line text form of an [`Expense`]
//!
//! ```text
//! category,amount,date,description
//! Food,12.50,2024-03-15,Lunch with team
//! ```
//!
//! The description is the remainder of the line after the third delimiter,
//! so it is never split further. Delimiters inside it are written as
//! [`SENTINEL`] and turned back on read. Line breaks in either text field
//! are written as spaces, and delimiters in the category as [`SENTINEL`];
//! neither is turned back on read.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    errors::Error,
    types::{Expense, DATE_FORMAT, DELIMITER, SENTINEL},
};

/// Renders an expense as a single stored line, without a line terminator
#[must_use]
pub fn encode(expense: &Expense) -> String {
    format!(
        "{category}{d}{amount}{d}{date}{d}{description}",
        category = single_line(&expense.category).replace(DELIMITER, &SENTINEL.to_string()),
        amount = expense.amount,
        date = expense.date.format(DATE_FORMAT),
        description = single_line(&expense.description).replace(DELIMITER, &SENTINEL.to_string()),
        d = DELIMITER,
    )
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Parses a single stored line.
///
/// Errors are reported against line 1; use [`decode_line`] to name the
/// line within a larger resource.
/// # Errors
/// [`Error::MalformedRecord`] if the line has fewer than three fields, or the
/// amount or date does not parse
pub fn decode(line: &str) -> Result<Expense, Error> {
    decode_line(line, 1)
}

/// Parses a stored line, attributing any error to `line_number`
pub(crate) fn decode_line(line: &str, line_number: usize) -> Result<Expense, Error> {
    let mut fields = line.splitn(4, DELIMITER);
    let (Some(category), Some(amount), Some(date)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::malformed(
            line_number,
            "expected at least 3 comma-separated fields",
        ));
    };
    let amount = parse_amount(amount).map_err(|reason| Error::malformed(line_number, reason))?;
    let date = parse_date(date).map_err(|reason| Error::malformed(line_number, reason))?;
    let description = fields
        .next()
        .map(|description| description.replace(SENTINEL, &DELIMITER.to_string()))
        .unwrap_or_default();
    Ok(Expense {
        category: category.to_owned(),
        amount,
        date,
        description,
    })
}

/// Parses an amount, ignoring surrounding whitespace.
///
/// Plain (`12.50`) and scientific (`1.25e1`) notation are both accepted;
/// digit separators (`1_000`) are not.
pub fn parse_amount(text: &str) -> Result<Decimal, String> {
    let text = text.trim();
    if text.contains('_') {
        return Err(format!("invalid amount {text:?}"));
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| format!("invalid amount {text:?}"))
}

/// Parses a `YYYY-MM-DD` date, ignoring surrounding whitespace
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| format!("invalid date {text:?}"))
}

/// Rounds to whole cents, halves away from zero
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl FromStr for Expense {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        decode(line)
    }
}

/// Human-readable form, as shown in listings.
///
/// This is not the stored form; see [`encode`] for that.
impl Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {:<15} ${:.2} - {}",
            self.date.format(DATE_FORMAT),
            self.category,
            round_cents(self.amount),
            self.description
        )
    }
}
