//! Customer list filtering.

use super::{contains_ignore_case, Filter};
use crate::model::customer::{Customer, VisaStatus};

/// Customer table filter parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Matched against name, passport number and agent name.
    pub search_text: String,
    pub status: Filter<VisaStatus>,
}

impl CustomerFilter {
    pub fn search(search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: Filter<VisaStatus>) -> Self {
        self.status = status;
        self
    }
}

/// Returns the customers matching `filter`, in input order.
pub fn filter_customers<'a>(customers: &'a [Customer], filter: &CustomerFilter) -> Vec<&'a Customer> {
    let needle = filter.search_text.to_lowercase();
    customers
        .iter()
        .filter(|customer| filter.status.matches(&customer.visa_status))
        .filter(|customer| {
            contains_ignore_case(&customer.full_name, &needle)
                || contains_ignore_case(&customer.passport_number, &needle)
                || contains_ignore_case(&customer.agent_name, &needle)
        })
        .collect()
}
