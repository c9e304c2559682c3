use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    errors::Error,
    types::{Expense, Ledger},
};

impl Ledger {
    /// Appends a new expense to the end of the ledger and returns it.
    pub fn add(
        &mut self,
        category: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> &Expense {
        self.push(Expense::new(category, amount, date, description))
    }

    /// Appends an existing expense to the end of the ledger and returns it.
    pub fn push(&mut self, expense: Expense) -> &Expense {
        self.expenses.push(expense);
        &self.expenses[self.expenses.len() - 1]
    }

    /// Removes the expense at a 1-based position, as numbered for the user.
    ///
    /// Position `0` means "cancel": nothing is removed and `Ok(None)` is returned.
    /// Later expenses move down one position.
    /// # Errors
    /// [`Error::IndexOutOfRange`] if `index` is past the end; the ledger is unchanged
    pub fn remove_at(&mut self, index: usize) -> Result<Option<Expense>, Error> {
        if index == 0 {
            return Ok(None);
        }
        if index > self.expenses.len() {
            tracing::warn!(index, len = self.expenses.len(), "removal out of range");
            return Err(Error::IndexOutOfRange {
                index,
                len: self.expenses.len(),
            });
        }
        Ok(Some(self.expenses.remove(index - 1)))
    }

    /// Returns all expenses in insertion order
    #[must_use]
    #[inline]
    pub fn list_all(&self) -> &[Expense] {
        &self.expenses
    }

    /// Returns the expenses dated within the given year and month (1 = January),
    /// keeping their relative order.
    ///
    /// `month` is not checked; a value outside `1..=12` simply matches nothing.
    #[must_use]
    pub fn filter_by_month(&self, year: i32, month: u32) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|expense| expense.date.year() == year && expense.date.month() == month)
            .collect()
    }

    /// Sums amounts per category. Categories are compared exactly, case included.
    ///
    /// The iteration order of the returned map is unspecified.
    #[must_use]
    pub fn group_by_category(&self) -> HashMap<String, Decimal> {
        let mut totals = HashMap::new();
        for expense in &self.expenses {
            *totals
                .entry(expense.category.clone())
                .or_insert(Decimal::ZERO) += expense.amount;
        }
        totals
    }

    /// Sum of every amount in the ledger
    #[must_use]
    pub fn total(&self) -> Decimal {
        total_amount(self)
    }
}

/// Sums the amounts of any set of expenses. An empty set sums to zero.
pub fn total_amount<'a, I>(expenses: I) -> Decimal
where
    I: IntoIterator<Item = &'a Expense>,
{
    expenses
        .into_iter()
        .fold(Decimal::ZERO, |total, expense| total + expense.amount)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add("Food", dec!(12.50), date(2024, 3, 15), "Lunch");
        ledger.add("Transport", dec!(5.00), date(2024, 3, 20), "Bus");
        ledger.add("Food", dec!(7.25), date(2024, 4, 1), "Groceries");
        ledger.add("food", dec!(1.10), date(2023, 3, 2), "Snack");
        ledger.add("Refund", dec!(-4.00), date(2024, 3, 31), "");
        ledger
    }

    #[test]
    fn test_add_appends() {
        let mut ledger = sample_ledger();
        let before = ledger.len();
        let added = ledger
            .add("Rent", dec!(900), date(2024, 5, 1), "May")
            .clone();
        assert_eq!(ledger.len(), before + 1);
        assert_eq!(ledger.list_all().last(), Some(&added));
        assert_eq!(added.category(), "Rent");
    }

    #[test]
    fn test_add_allows_duplicates_and_empty_text() {
        let mut ledger = Ledger::new();
        ledger.add("", dec!(1), date(2024, 1, 1), "");
        ledger.add("", dec!(1), date(2024, 1, 1), "");
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.list_all()[0], ledger.list_all()[1]);
    }

    #[test]
    fn test_remove_zero_is_cancel() {
        let mut ledger = sample_ledger();
        let before = ledger.clone();
        assert!(ledger.remove_at(0).unwrap().is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_remove_at() {
        let mut ledger = sample_ledger();
        let removed = ledger.remove_at(2).unwrap().unwrap();
        assert_eq!(removed.category(), "Transport");
        assert_eq!(ledger.len(), 4);
        // Later entries shift down
        assert_eq!(ledger.list_all()[1].description(), "Groceries");
        let removed = ledger.remove_at(4).unwrap().unwrap();
        assert_eq!(removed.category(), "Refund");
        let removed = ledger.remove_at(1).unwrap().unwrap();
        assert_eq!(removed.description(), "Lunch");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut ledger = sample_ledger();
        let before = ledger.clone();
        match ledger.remove_at(6) {
            Err(Error::IndexOutOfRange { index: 6, len: 5 }) => (),
            other => panic!("Unexpected result {other:?}"),
        }
        assert_eq!(ledger, before);
        assert!(Ledger::new().remove_at(1).is_err());
    }

    #[test]
    fn test_total_amount() {
        let ledger = sample_ledger();
        assert_eq!(total_amount(&ledger), dec!(21.85));
        assert_eq!(ledger.total(), dec!(21.85));
        assert_eq!(total_amount(&Ledger::new()), Decimal::ZERO);
        assert_eq!(total_amount(ledger.filter_by_month(2024, 3)), dec!(13.50));
    }

    #[test]
    fn test_filter_by_month() {
        let ledger = sample_ledger();
        let march: Vec<&str> = ledger
            .filter_by_month(2024, 3)
            .into_iter()
            .map(Expense::description)
            .collect();
        assert_eq!(march, vec!["Lunch", "Bus", ""]);
        assert_eq!(ledger.filter_by_month(2023, 3).len(), 1);
        assert!(ledger.filter_by_month(2024, 2).is_empty());
        assert!(ledger.filter_by_month(2024, 13).is_empty());
    }

    #[test]
    fn test_group_by_category() {
        let ledger = sample_ledger();
        let totals = ledger.group_by_category();
        assert_eq!(totals.len(), 4);
        assert_eq!(totals["Food"], dec!(19.75));
        assert_eq!(totals["food"], dec!(1.10));
        assert_eq!(totals["Transport"], dec!(5.00));
        assert_eq!(totals["Refund"], dec!(-4.00));
        let sum: Decimal = totals.values().copied().sum();
        assert_eq!(sum, ledger.total());
        assert!(Ledger::new().group_by_category().is_empty());
    }
}
