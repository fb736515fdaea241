//! Agency dashboard use-case service.
//!
//! # Responsibility
//! - Own the customer and ledger repositories over one store.
//! - Provide the page-level entry points: mutations, views, exports.
//!
//! # Invariants
//! - Every view is recomputed from the current repository snapshot.
//! - Mutations report persistence failures; nothing is retried.

use crate::export::{
    customer_rows, export_csv, ledger_print_rows, ledger_rows, CsvExport, PrintReport,
};
use crate::model::customer::{Customer, CustomerDraft};
use crate::model::finance::{FinanceEntry, FinanceEntryDraft};
use crate::query::customers::{filter_customers, CustomerFilter};
use crate::query::dashboard::{dashboard_stats, DashboardStats};
use crate::query::ledger::{filter_and_sort_entries, summarize_ledger, LedgerQuery, LedgerSummary};
use crate::repo::{CustomerRepository, FinanceRepository, RepoResult};
use crate::store::KeyValueStore;
use log::info;

pub const CUSTOMERS_EXPORT_BASENAME: &str = "customers-export";
pub const LEDGER_EXPORT_BASENAME: &str = "finance-ledger";
pub const LEDGER_REPORT_TITLE: &str = "Finance Ledger Report";

/// Filtered/sorted ledger rows together with their summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerView<'a> {
    pub entries: Vec<&'a FinanceEntry>,
    pub summary: LedgerSummary<'a>,
}

/// Facade used by the view layer.
pub struct AgencyService<S> {
    customers: CustomerRepository<S>,
    finance: FinanceRepository<S>,
}

impl<S: KeyValueStore> AgencyService<S> {
    /// Opens both collections over a shared store handle.
    pub fn open(store: S) -> RepoResult<Self>
    where
        S: Clone,
    {
        let customers = CustomerRepository::open(store.clone())?;
        let finance = FinanceRepository::open(store)?;
        info!(
            "event=service_open module=service status=ok customers={} entries={}",
            customers.len(),
            finance.len()
        );
        Ok(Self { customers, finance })
    }

    /// Builds the service from pre-configured repositories.
    pub fn from_repositories(
        customers: CustomerRepository<S>,
        finance: FinanceRepository<S>,
    ) -> Self {
        Self { customers, finance }
    }

    pub fn customer_repository(&self) -> &CustomerRepository<S> {
        &self.customers
    }

    pub fn finance_repository(&self) -> &FinanceRepository<S> {
        &self.finance
    }

    /// Re-reads both collections from the store.
    pub fn reload(&mut self) -> RepoResult<()> {
        self.customers.load()?;
        self.finance.load()?;
        Ok(())
    }

    /// Customer form submit: replaces `editing` when set, appends otherwise.
    pub fn save_customer(
        &mut self,
        editing: Option<&str>,
        draft: CustomerDraft,
    ) -> RepoResult<&[Customer]> {
        match editing {
            Some(id) => self.customers.replace(id, draft),
            None => self.customers.append(draft),
        }
    }

    pub fn add_customer(&mut self, draft: CustomerDraft) -> RepoResult<&[Customer]> {
        self.customers.append(draft)
    }

    pub fn update_customer(&mut self, id: &str, draft: CustomerDraft) -> RepoResult<&[Customer]> {
        self.customers.replace(id, draft)
    }

    pub fn delete_customer(&mut self, id: &str) -> RepoResult<&[Customer]> {
        self.customers.remove(id)
    }

    pub fn add_finance_entry(&mut self, draft: FinanceEntryDraft) -> RepoResult<&[FinanceEntry]> {
        self.finance.append(draft)
    }

    pub fn update_finance_entry(
        &mut self,
        id: &str,
        draft: FinanceEntryDraft,
    ) -> RepoResult<&[FinanceEntry]> {
        self.finance.replace(id, draft)
    }

    pub fn delete_finance_entry(&mut self, id: &str) -> RepoResult<&[FinanceEntry]> {
        self.finance.remove(id)
    }

    pub fn customers(&self, filter: &CustomerFilter) -> Vec<&Customer> {
        filter_customers(self.customers.records(), filter)
    }

    pub fn ledger(&self, query: &LedgerQuery) -> LedgerView<'_> {
        let entries = filter_and_sort_entries(self.finance.records(), query);
        let summary = summarize_ledger(&entries);
        LedgerView { entries, summary }
    }

    pub fn dashboard(&self) -> DashboardStats<'_> {
        dashboard_stats(self.customers.records(), self.finance.records())
    }

    /// CSV of the filtered customer table; `None` when nothing matches.
    pub fn export_customers(&self, filter: &CustomerFilter) -> Option<CsvExport> {
        export_csv(
            &customer_rows(&self.customers(filter)),
            CUSTOMERS_EXPORT_BASENAME,
        )
    }

    /// CSV of the filtered/sorted ledger; `None` when nothing matches.
    pub fn export_ledger(&self, query: &LedgerQuery) -> Option<CsvExport> {
        let entries = filter_and_sort_entries(self.finance.records(), query);
        export_csv(&ledger_rows(&entries), LEDGER_EXPORT_BASENAME)
    }

    /// Printable report of the filtered/sorted ledger.
    pub fn print_ledger(&self, query: &LedgerQuery) -> PrintReport {
        let entries = filter_and_sort_entries(self.finance.records(), query);
        PrintReport::new(LEDGER_REPORT_TITLE, ledger_print_rows(&entries))
    }
}
