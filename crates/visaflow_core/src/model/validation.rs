//! Validation and parsing errors for domain records.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for record input or persisted record state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank after trimming.
    MissingField { field: &'static str },
    /// Ledger amounts must be strictly positive.
    NonPositiveAmount(Decimal),
    /// Ledger amounts are capped so collection sums stay representable.
    AmountTooLarge { amount: Decimal, max: Decimal },
    /// Record identifier is blank.
    EmptyId,
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated,
}

impl ValidationError {
    /// Name of the offending field, for inline form error placement.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::NonPositiveAmount(_) | Self::AmountTooLarge { .. } => "amount",
            Self::EmptyId => "id",
            Self::UpdatedBeforeCreated => "updatedAt",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "{} is required", field_label(field)),
            Self::NonPositiveAmount(_) => write!(f, "Amount must be greater than 0"),
            Self::AmountTooLarge { max, .. } => write!(f, "Amount must not exceed {max}"),
            Self::EmptyId => write!(f, "record id cannot be empty"),
            Self::UpdatedBeforeCreated => write!(f, "updatedAt must be >= createdAt"),
        }
    }
}

impl Error for ValidationError {}

fn field_label(field: &str) -> &str {
    match field {
        "fullName" => "Full name",
        "passportNumber" => "Passport number",
        "agentName" => "Agent name",
        "description" => "Description",
        other => other,
    }
}

/// Unknown display name for one of the record enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseEnumError {}
