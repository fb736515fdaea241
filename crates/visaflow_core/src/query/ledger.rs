//! Ledger view: filtering, ordering and summary statistics.
//!
//! # Invariants
//! - Summaries are scoped to the view they are given, not the collection.
//! - Monthly buckets appear in first-occurrence order of the view.

use super::{contains_ignore_case, Filter, Totals};
use crate::model::finance::{Category, EntryType, FinanceEntry};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of entries reported by `top_expenses` in a summary.
pub const TOP_EXPENSES_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Ledger table parameters. Defaults to newest business date first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Matched against `description`.
    pub search_text: String,
    pub entry_type: Filter<EntryType>,
    pub category: Filter<Category>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl LedgerQuery {
    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.sort_direction = direction;
        self
    }

    /// Column-header click: the active key flips direction, a new key
    /// starts descending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Desc;
        }
    }
}

/// Filters `entries` by `query`, then stable-sorts by the query sort key.
pub fn filter_and_sort_entries<'a>(
    entries: &'a [FinanceEntry],
    query: &LedgerQuery,
) -> Vec<&'a FinanceEntry> {
    let needle = query.search_text.to_lowercase();
    let mut view: Vec<&FinanceEntry> = entries
        .iter()
        .filter(|entry| query.entry_type.matches(&entry.entry_type))
        .filter(|entry| query.category.matches(&entry.category))
        .filter(|entry| contains_ignore_case(&entry.description, &needle))
        .collect();

    view.sort_by(|a, b| {
        let ordering = match query.sort_key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
        };
        apply_direction(ordering, query.sort_direction)
    });
    view
}

// Reversing the comparator (not the output) keeps ties in input order.
fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Per calendar month totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub count: usize,
}

impl MonthlyBucket {
    /// Display label, e.g. `January 2024`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Summary block shown under the ledger table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary<'a> {
    pub totals: Totals,
    pub top_expenses: Vec<&'a FinanceEntry>,
    pub monthly: Vec<MonthlyBucket>,
}

impl LedgerSummary<'_> {
    pub fn total_income(&self) -> Decimal {
        self.totals.income
    }

    pub fn total_expense(&self) -> Decimal {
        self.totals.expense
    }

    pub fn net_balance(&self) -> Decimal {
        self.totals.net_balance()
    }

    pub fn month(&self, label: &str) -> Option<&MonthlyBucket> {
        self.monthly.iter().find(|bucket| bucket.label() == label)
    }
}

/// Computes the ledger summary for an already filtered/sorted view.
pub fn summarize_ledger<'a>(view: &[&'a FinanceEntry]) -> LedgerSummary<'a> {
    LedgerSummary {
        totals: Totals::from_entries(view.iter().copied()),
        top_expenses: top_expenses(view, TOP_EXPENSES_LIMIT),
        monthly: monthly_breakdown(view),
    }
}

/// Largest expenses first; equal amounts keep view order.
pub fn top_expenses<'a>(view: &[&'a FinanceEntry], limit: usize) -> Vec<&'a FinanceEntry> {
    let mut expenses: Vec<&FinanceEntry> = view
        .iter()
        .copied()
        .filter(|entry| entry.entry_type == EntryType::Expense)
        .collect();
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    expenses.truncate(limit);
    expenses
}

/// Groups the view by calendar month of `date`.
pub fn monthly_breakdown(view: &[&FinanceEntry]) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = Vec::new();
    let mut index: HashMap<(i32, u32), usize> = HashMap::new();

    for entry in view {
        let key = (entry.date.year(), entry.date.month());
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(MonthlyBucket {
                year: key.0,
                month: key.1,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
                count: 0,
            });
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        match entry.entry_type {
            EntryType::Income => bucket.income += entry.amount,
            EntryType::Expense => bucket.expense += entry.amount,
        }
        bucket.count += 1;
    }

    buckets
}
