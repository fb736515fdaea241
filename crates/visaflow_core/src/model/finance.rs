//! Ledger entry record.
//!
//! # Invariants
//! - `amount > 0`; direction is carried by `entry_type`, never by sign.
//! - `date` is the business date and is independent of `created_at`.

use super::{require_id, require_text, ParseEnumError, Record, RecordId, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage key for the ledger collection.
pub const FINANCE_KEY: &str = "visaflow-finance";

/// Largest accepted entry amount (one trillion). Sums of any realistic
/// ledger stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            other => Err(ParseEnumError {
                kind: "entry type",
                value: other.to_string(),
            }),
        }
    }
}

/// Ledger category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Visa,
    Medical,
    Ticket,
    #[serde(rename = "Service Charge")]
    ServiceCharge,
    Others,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Medical => "Medical",
            Self::Ticket => "Ticket",
            Self::ServiceCharge => "Service Charge",
            Self::Others => "Others",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Visa" => Ok(Self::Visa),
            "Medical" => Ok(Self::Medical),
            "Ticket" => Ok(Self::Ticket),
            "Service Charge" => Ok(Self::ServiceCharge),
            "Others" => Ok(Self::Others),
            other => Err(ParseEnumError {
                kind: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// Persisted income/expense entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntry {
    pub id: RecordId,
    pub entry_type: EntryType,
    pub category: Category,
    /// Currency units; JSON numbers and strings are both accepted on read.
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Ledger form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceEntryDraft {
    pub entry_type: EntryType,
    pub category: Category,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

impl FinanceEntryDraft {
    pub fn new(
        entry_type: EntryType,
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            entry_type,
            category,
            amount,
            description: description.into(),
            date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount(self.amount)?;
        require_text("description", &self.description)
    }
}

impl Record for FinanceEntry {
    type Draft = FinanceEntryDraft;

    const STORE_KEY: &'static str = FINANCE_KEY;
    const KIND: &'static str = "finance_entry";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate_draft(draft: &FinanceEntryDraft) -> Result<(), ValidationError> {
        draft.validate()
    }

    fn from_draft(id: RecordId, draft: FinanceEntryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            entry_type: draft.entry_type,
            category: draft.category,
            amount: draft.amount,
            description: draft.description,
            date: draft.date,
            created_at: now,
        }
    }

    // Ledger entries carry no modification timestamp.
    fn revise(original: &Self, draft: FinanceEntryDraft, _now: DateTime<Utc>) -> Self {
        Self::from_draft(original.id.clone(), draft, original.created_at)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        check_amount(self.amount)?;
        require_text("description", &self.description)
    }
}

fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}
