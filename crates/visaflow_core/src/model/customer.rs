//! Customer record and visa lifecycle enums.
//!
//! # Responsibility
//! - Define the persisted customer shape (camelCase JSON, as stored by the
//!   dashboard since its first release).
//! - Provide draft validation used before any repository write.
//!
//! # Invariants
//! - `id` is unique within the customer collection and never reused.
//! - `updated_at >= created_at`.
//! - `passport_scan_url` is only a reference; the bytes live in the store.

use super::{require_id, require_text, ParseEnumError, Record, RecordId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage key for the customer collection.
pub const CUSTOMERS_KEY: &str = "visaflow-customers";

/// Medical examination outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MedicalFitness {
    #[default]
    Pending,
    Fit,
    Unfit,
}

impl MedicalFitness {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Fit => "Fit",
            Self::Unfit => "Unfit",
        }
    }
}

impl Display for MedicalFitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MedicalFitness {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Fit" => Ok(Self::Fit),
            "Unfit" => Ok(Self::Unfit),
            other => Err(ParseEnumError {
                kind: "medical fitness",
                value: other.to_string(),
            }),
        }
    }
}

/// Visa application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisaStatus {
    #[default]
    Pending,
    Processing,
    Approved,
    Rejected,
}

impl VisaStatus {
    /// All statuses in dashboard display order.
    pub const ALL: [VisaStatus; 4] = [
        VisaStatus::Pending,
        VisaStatus::Processing,
        VisaStatus::Approved,
        VisaStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl Display for VisaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisaStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "visa status",
                value: other.to_string(),
            }),
        }
    }
}

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    pub full_name: String,
    pub passport_number: String,
    pub medical_fitness: MedicalFitness,
    pub agent_name: String,
    pub visa_status: VisaStatus,
    /// Reference to an attachment held by the store (URL or handle).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_scan_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer form input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub full_name: String,
    pub passport_number: String,
    pub medical_fitness: MedicalFitness,
    pub agent_name: String,
    pub visa_status: VisaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_scan_url: Option<String>,
}

impl CustomerDraft {
    /// Creates a draft with `Pending` medical and visa state.
    pub fn new(
        full_name: impl Into<String>,
        passport_number: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            passport_number: passport_number.into(),
            agent_name: agent_name.into(),
            ..Self::default()
        }
    }

    pub fn with_visa_status(mut self, status: VisaStatus) -> Self {
        self.visa_status = status;
        self
    }

    pub fn with_medical_fitness(mut self, fitness: MedicalFitness) -> Self {
        self.medical_fitness = fitness;
        self
    }

    /// Checks required fields in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("fullName", &self.full_name)?;
        require_text("passportNumber", &self.passport_number)?;
        require_text("agentName", &self.agent_name)?;
        Ok(())
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            full_name: customer.full_name.clone(),
            passport_number: customer.passport_number.clone(),
            medical_fitness: customer.medical_fitness,
            agent_name: customer.agent_name.clone(),
            visa_status: customer.visa_status,
            passport_scan_url: customer.passport_scan_url.clone(),
        }
    }
}

impl Record for Customer {
    type Draft = CustomerDraft;

    const STORE_KEY: &'static str = CUSTOMERS_KEY;
    const KIND: &'static str = "customer";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate_draft(draft: &CustomerDraft) -> Result<(), ValidationError> {
        draft.validate()
    }

    fn from_draft(id: RecordId, draft: CustomerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: draft.full_name,
            passport_number: draft.passport_number,
            medical_fitness: draft.medical_fitness,
            agent_name: draft.agent_name,
            visa_status: draft.visa_status,
            passport_scan_url: draft.passport_scan_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn revise(original: &Self, draft: CustomerDraft, now: DateTime<Utc>) -> Self {
        let mut revised = Self::from_draft(original.id.clone(), draft, original.created_at);
        revised.updated_at = now.max(original.created_at);
        revised
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_text("fullName", &self.full_name)?;
        require_text("passportNumber", &self.passport_number)?;
        require_text("agentName", &self.agent_name)?;
        if self.updated_at < self.created_at {
            return Err(ValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }
}
