//! Query Engine: pure views and aggregates over collection snapshots.
//!
//! # Responsibility
//! - Filter, sort and aggregate customers and ledger entries for rendering.
//!
//! # Invariants
//! - Functions never mutate their input and keep no state between calls.
//! - Filtering preserves the relative order of the input.
//! - Sorting is stable: equal keys keep input order in both directions.
//! - Money is accumulated as `Decimal`; rounding happens only in
//!   `format_money`.

pub mod customers;
pub mod dashboard;
pub mod ledger;

use crate::model::finance::{EntryType, FinanceEntry};
use crate::model::ParseEnumError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Label accepted by every enum filter to disable it.
pub const FILTER_ALL: &str = "All";

/// Enum filter: either everything or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == FILTER_ALL {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

/// Income/expense sums over a set of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FinanceEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut totals, entry| {
            totals.add(entry.entry_type, entry.amount);
            totals
        })
    }

    pub fn add(&mut self, entry_type: EntryType, amount: Decimal) {
        match entry_type {
            EntryType::Income => self.income += amount,
            EntryType::Expense => self.expense += amount,
        }
    }

    /// Income minus expense.
    pub fn net_balance(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Case-insensitive substring test; an empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

/// Formats a currency amount with two decimals, e.g. `$1234.50`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
