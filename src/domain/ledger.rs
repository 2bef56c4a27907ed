use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Category, Cents, Dated, ExpenseTransaction, IncomeTransaction, Period};

/// Aggregate metrics for one slice of the ledger.
/// `by_category` only carries categories that actually occur; unused
/// categories get no entry rather than an explicit zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Cents,
    pub expense: Cents,
    pub balance: Cents,
    pub by_category: BTreeMap<Category, Cents>,
}

/// Compute totals, balance and the expense category breakdown from raw
/// records. A sum over an empty slice is exactly 0.
pub fn summarize(expenses: &[ExpenseTransaction], incomes: &[IncomeTransaction]) -> Totals {
    let income: Cents = incomes.iter().map(|t| t.amount_cents).sum();
    let expense: Cents = expenses.iter().map(|t| t.amount_cents).sum();

    let mut by_category: BTreeMap<Category, Cents> = BTreeMap::new();
    for entry in expenses {
        *by_category.entry(entry.category).or_insert(0) += entry.amount_cents;
    }

    Totals {
        income,
        expense,
        balance: income - expense,
        by_category,
    }
}

/// Keep the entries whose date falls inside `period`. Entries without a
/// parsable date never match any period.
pub fn filter_by_period<T: Dated + Clone>(entries: &[T], period: Period) -> Vec<T> {
    entries
        .iter()
        .filter(|entry| entry.date().is_some_and(|date| period.contains(date)))
        .cloned()
        .collect()
}

/// Sort entries by date, most recent first. The sort is stable, so entries
/// sharing a date keep their original relative order. Dateless entries sink
/// to the end.
pub fn sort_recent_first<T: Dated>(entries: &mut [T]) {
    entries.sort_by(|a, b| b.date().cmp(&a.date()));
}

/// Every parsable date across both transaction sequences, used to derive
/// the selectable periods.
pub fn all_dates(expenses: &[ExpenseTransaction], incomes: &[IncomeTransaction]) -> Vec<NaiveDate> {
    expenses
        .iter()
        .filter_map(|t| t.date)
        .chain(incomes.iter().filter_map(|t| t.date))
        .collect()
}
