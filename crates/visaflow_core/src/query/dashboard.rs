//! Dashboard aggregate statistics.

use super::Totals;
use crate::model::customer::{Customer, VisaStatus};
use crate::model::finance::FinanceEntry;
use crate::model::Record;
use rust_decimal::Decimal;

/// Number of records shown in each "recent" list.
pub const RECENT_LIMIT: usize = 5;

/// Customer counts per visa status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisaStatusCounts {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl VisaStatusCounts {
    pub fn from_customers(customers: &[Customer]) -> Self {
        customers.iter().fold(Self::default(), |mut counts, customer| {
            counts.total += 1;
            *counts.bucket_mut(customer.visa_status) += 1;
            counts
        })
    }

    pub fn count(&self, status: VisaStatus) -> usize {
        match status {
            VisaStatus::Pending => self.pending,
            VisaStatus::Processing => self.processing,
            VisaStatus::Approved => self.approved,
            VisaStatus::Rejected => self.rejected,
        }
    }

    fn bucket_mut(&mut self, status: VisaStatus) -> &mut usize {
        match status {
            VisaStatus::Pending => &mut self.pending,
            VisaStatus::Processing => &mut self.processing,
            VisaStatus::Approved => &mut self.approved,
            VisaStatus::Rejected => &mut self.rejected,
        }
    }
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats<'a> {
    pub visa: VisaStatusCounts,
    /// Computed over the full ledger, not a filtered view.
    pub totals: Totals,
    /// Newest first by `created_at`.
    pub recent_customers: Vec<&'a Customer>,
    /// Newest first by `created_at`.
    pub recent_entries: Vec<&'a FinanceEntry>,
}

impl DashboardStats<'_> {
    pub fn total_income(&self) -> Decimal {
        self.totals.income
    }

    pub fn total_expense(&self) -> Decimal {
        self.totals.expense
    }

    pub fn net_balance(&self) -> Decimal {
        self.totals.net_balance()
    }
}

pub fn dashboard_stats<'a>(
    customers: &'a [Customer],
    entries: &'a [FinanceEntry],
) -> DashboardStats<'a> {
    DashboardStats {
        visa: VisaStatusCounts::from_customers(customers),
        totals: Totals::from_entries(entries),
        recent_customers: most_recent(customers, RECENT_LIMIT),
        recent_entries: most_recent(entries, RECENT_LIMIT),
    }
}

/// The `limit` most recently created records, newest first.
pub fn most_recent<T: Record>(records: &[T], limit: usize) -> Vec<&T> {
    let mut ordered: Vec<&T> = records.iter().collect();
    ordered.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
    ordered.truncate(limit);
    ordered
}
