//! Export boundary: flat tabular rows, CSV files and printable reports.
//!
//! # Responsibility
//! - Project records into ordered label -> text rows.
//! - Hand rows to the CSV and HTML report writers.
//!
//! # Invariants
//! - Column order is the order labels first appear across rows.
//! - Export never reads or writes the record store.

pub mod csv;
pub mod print;

use crate::model::customer::Customer;
use crate::model::finance::FinanceEntry;
use crate::query::format_money;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use self::csv::{export_csv, parse_csv, to_csv, CsvExport};
pub use self::print::PrintReport;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// One exported row: ordered `(column label, cell text)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    fields: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell, replacing an earlier cell with the same label.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(label, value);
        self
    }

    pub fn set(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, cell)) => *cell = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }
}

/// Union of row labels in first-appearance order.
pub fn column_labels(rows: &[FlatRecord]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for label in rows.iter().flat_map(FlatRecord::labels) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Short date as shown in tables, e.g. `1/5/2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Customer table export rows.
pub fn customer_rows(customers: &[&Customer]) -> Vec<FlatRecord> {
    customers
        .iter()
        .map(|customer| {
            FlatRecord::new()
                .with("Full Name", customer.full_name.as_str())
                .with("Passport Number", customer.passport_number.as_str())
                .with("Medical Fitness", customer.medical_fitness.as_str())
                .with("Agent Name", customer.agent_name.as_str())
                .with("Visa Status", customer.visa_status.as_str())
                .with("Created At", display_date(customer.created_at.date_naive()))
        })
        .collect()
}

/// Ledger export rows with plain numeric amounts.
pub fn ledger_rows(entries: &[&FinanceEntry]) -> Vec<FlatRecord> {
    entries
        .iter()
        .map(|entry| ledger_row(entry, entry.amount.normalize().to_string()))
        .collect()
}

/// Ledger report rows with currency-formatted amounts.
pub fn ledger_print_rows(entries: &[&FinanceEntry]) -> Vec<FlatRecord> {
    entries
        .iter()
        .map(|entry| ledger_row(entry, format_money(entry.amount)))
        .collect()
}

fn ledger_row(entry: &FinanceEntry, amount: String) -> FlatRecord {
    FlatRecord::new()
        .with("Date", display_date(entry.date))
        .with("Type", entry.entry_type.as_str())
        .with("Category", entry.category.as_str())
        .with("Amount", amount)
        .with("Description", entry.description.as_str())
}
