//! Common datatypes supporting functions throughout the expense tracker

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Error;

/// Separates the fields of a stored record
pub const DELIMITER: char = ',';

/// Stands in for [`DELIMITER`] inside a stored description.
///
/// The substitution is reversed on read, so a description that really
/// contains this character comes back with a [`DELIMITER`] in its place.
pub const SENTINEL: char = ';';

/// Format used for dates in stored records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ledger file used when no other location is configured
pub const DEFAULT_LEDGER_PATH: &str = "expenses.txt";

/// A single recorded expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Free-form label the expense is grouped under
    pub(crate) category: String,
    /// The amount spent. May be negative (refunds and the like).
    pub(crate) amount: Decimal,
    /// The calendar day the expense happened on
    pub(crate) date: NaiveDate,
    /// Free-form note, possibly empty
    pub(crate) description: String,
}

impl Expense {
    /// Creates a new expense
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount,
            date,
            description: description.into(),
        }
    }

    /// Returns the category label
    #[must_use]
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the amount spent
    #[must_use]
    #[inline]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the date of the expense
    #[must_use]
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the description
    #[must_use]
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The working set of expenses for one session, in insertion order.
///
/// # Limitations
/// Only a single operation is allowed on the ledger at any given time;
/// wrap it in a [`Mutex`](std::sync::Mutex) to share it.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    /// Storage for the records, oldest first
    pub(crate) expenses: Vec<Expense>,
}

impl Ledger {
    /// Creates a new, empty [`Ledger`].
    #[must_use]
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Returns the number of records
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Returns whether the ledger holds no records
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

impl From<Vec<Expense>> for Ledger {
    fn from(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.iter()
    }
}

impl IntoIterator for Ledger {
    type Item = Expense;
    type IntoIter = std::vec::IntoIter<Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.expenses.into_iter()
    }
}

/// An interface to the durable resource backing a [`Ledger`].
///
/// Each handle returned is a scoped acquisition: the resource is released
/// when the handle is dropped, on success and error paths alike.
pub trait Storage {
    /// Opens the resource for reading.
    ///
    /// Returns `Ok(None)` when the resource does not exist yet.
    fn reader(&self) -> Result<Option<Box<dyn BufRead + '_>>, Error>;

    /// Opens the resource for writing, discarding any prior content.
    fn writer(&mut self) -> Result<Box<dyn Write + '_>, Error>;
}
