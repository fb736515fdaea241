//! Collection repositories with write-through persistence.
//!
//! # Responsibility
//! - Own the authoritative in-memory sequence of each record type.
//! - Mirror every mutation to the store as a full-sequence write.
//!
//! # Invariants
//! - Drafts are validated before any write.
//! - The in-memory sequence only changes after the store accepted the write.
//! - Persisted state that fails validation is reported, never masked.

pub mod collection;

use crate::model::customer::Customer;
use crate::model::finance::FinanceEntry;

pub use collection::{CollectionRepository, RepoError, RepoResult};

/// Customer collection over store `S`.
pub type CustomerRepository<S> = CollectionRepository<S, Customer>;
/// Ledger collection over store `S`.
pub type FinanceRepository<S> = CollectionRepository<S, FinanceEntry>;
