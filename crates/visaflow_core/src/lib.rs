//! Core domain logic for the VisaFlow agency dashboard.
//! This crate owns record invariants, persistence and every derived view;
//! the UI only renders what it returns.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use export::{CsvExport, ExportError, FlatRecord, PrintReport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::customer::{Customer, CustomerDraft, MedicalFitness, VisaStatus};
pub use model::finance::{Category, EntryType, FinanceEntry, FinanceEntryDraft, MAX_AMOUNT};
pub use model::{Record, RecordId, ValidationError};
pub use query::customers::{filter_customers, CustomerFilter};
pub use query::dashboard::{dashboard_stats, DashboardStats, VisaStatusCounts};
pub use query::ledger::{
    filter_and_sort_entries, summarize_ledger, LedgerQuery, LedgerSummary, MonthlyBucket,
    SortDirection, SortKey,
};
pub use query::{format_money, Filter, Totals};
pub use repo::{CollectionRepository, CustomerRepository, FinanceRepository, RepoError, RepoResult};
pub use service::agency_service::{AgencyService, LedgerView};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
