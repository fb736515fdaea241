//! Domain records for the agency dashboard.
//!
//! # Responsibility
//! - Define the `Customer` and `FinanceEntry` records and their drafts.
//! - Own record lifecycle rules (identity assignment, revision, validation).
//!
//! # Invariants
//! - `id` and `created_at` never change after a record is created.
//! - `updated_at >= created_at` for every customer.
//! - Finance amounts are exact decimals and strictly positive.

pub mod customer;
pub mod finance;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use validation::{ParseEnumError, ValidationError};

/// Opaque record identifier.
///
/// Fresh identifiers are UUID v4 strings; persisted legacy identifiers are
/// accepted as-is as long as they are non-empty.
pub type RecordId = String;

/// Lifecycle contract shared by every persisted record type.
///
/// The repository only talks to records through this trait, so one
/// collection implementation serves customers and ledger entries alike.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Caller-submitted field set without identity or timestamps.
    type Draft;

    /// Storage key holding the serialized collection.
    const STORE_KEY: &'static str;
    /// Short name used in diagnostics.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Validates caller input before it is turned into a record.
    fn validate_draft(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Builds a brand-new record with the given identity.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Builds the replacement for `original`, keeping its identity and
    /// creation time and refreshing modification metadata.
    fn revise(original: &Self, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Checks invariants of a fully-formed record (used on load).
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Generates a fresh record identifier.
pub fn new_record_id() -> RecordId {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

pub(crate) fn require_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    Ok(())
}
