//! Generic ordered collection backed by one store key.
//!
//! # Invariants
//! - Insertion order is preserved; `replace` keeps the element position.
//! - Identifiers are unique within the collection.
//! - `replace`/`remove` of an unknown id are no-ops; the `try_` forms report
//!   `RepoError::NotFound` instead.

use crate::model::{new_record_id, Record, RecordId, ValidationError};
use crate::store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 8;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection reads and mutations.
#[derive(Debug)]
pub enum RepoError {
    /// Draft or persisted record failed validation.
    Validation(ValidationError),
    /// The store rejected a read or write; nothing was committed.
    Persistence(StoreError),
    NotFound(RecordId),
    /// The id source kept returning identifiers already in use.
    IdCollision(RecordId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist: {err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::IdCollision(id) => write!(f, "generated id already in use: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound(_) | Self::IdCollision(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

/// Ordered record collection with write-through to a `KeyValueStore`.
pub struct CollectionRepository<S, T> {
    store: S,
    records: Vec<T>,
    clock: fn() -> DateTime<Utc>,
    id_source: fn() -> RecordId,
}

impl<S: KeyValueStore, T: Record> CollectionRepository<S, T> {
    /// Opens the collection and loads its persisted contents.
    pub fn open(store: S) -> RepoResult<Self> {
        let mut repo = Self {
            store,
            records: Vec::new(),
            clock: Utc::now,
            id_source: new_record_id,
        };
        repo.load()?;
        Ok(repo)
    }

    /// Replaces the time source used for `created_at`/`updated_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier generator used by `append`.
    pub fn with_id_source(mut self, id_source: fn() -> RecordId) -> Self {
        self.id_source = id_source;
        self
    }

    /// Re-reads the persisted sequence. A missing key loads as empty.
    pub fn load(&mut self) -> RepoResult<&[T]> {
        let records = match self.store.get(T::STORE_KEY)? {
            Some(value) => decode_records::<T>(value)?,
            None => Vec::new(),
        };
        debug!(
            "event=collection_load module=repo status=ok kind={} count={}",
            T::KIND,
            records.len()
        );
        self.records = records;
        Ok(&self.records)
    }

    /// Current snapshot in insertion order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Creates a record from `draft` and appends it to the end.
    ///
    /// The new record gets a fresh id and `created_at == updated_at == now`.
    pub fn append(&mut self, draft: T::Draft) -> RepoResult<&[T]> {
        T::validate_draft(&draft)?;
        let id = self.allocate_id()?;
        let record = T::from_draft(id, draft, (self.clock)());

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next, "append")?;
        Ok(&self.records)
    }

    /// Replaces the record with `id` in place, or does nothing if absent.
    pub fn replace(&mut self, id: &str, draft: T::Draft) -> RepoResult<&[T]> {
        match self.replace_record(id, draft) {
            Ok(()) => {}
            Err(RepoError::NotFound(missing)) => warn!(
                "event=record_replace module=repo status=not_found kind={} id={}",
                T::KIND,
                missing
            ),
            Err(err) => return Err(err),
        }
        Ok(&self.records)
    }

    /// Replaces the record with `id` in place, failing with `NotFound`.
    pub fn try_replace(&mut self, id: &str, draft: T::Draft) -> RepoResult<&[T]> {
        self.replace_record(id, draft)?;
        Ok(&self.records)
    }

    /// Removes the record with `id`, or does nothing if absent.
    pub fn remove(&mut self, id: &str) -> RepoResult<&[T]> {
        match self.remove_record(id) {
            Ok(()) => {}
            Err(RepoError::NotFound(missing)) => warn!(
                "event=record_remove module=repo status=not_found kind={} id={}",
                T::KIND,
                missing
            ),
            Err(err) => return Err(err),
        }
        Ok(&self.records)
    }

    /// Removes the record with `id`, failing with `NotFound`.
    pub fn try_remove(&mut self, id: &str) -> RepoResult<&[T]> {
        self.remove_record(id)?;
        Ok(&self.records)
    }

    fn replace_record(&mut self, id: &str, draft: T::Draft) -> RepoResult<()> {
        let Some(position) = self.position(id) else {
            return Err(RepoError::NotFound(id.to_string()));
        };
        T::validate_draft(&draft)?;

        let mut next = self.records.clone();
        next[position] = T::revise(&self.records[position], draft, (self.clock)());
        self.commit(next, "replace")
    }

    fn remove_record(&mut self, id: &str) -> RepoResult<()> {
        if self.position(id).is_none() {
            return Err(RepoError::NotFound(id.to_string()));
        }

        let next = self
            .records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        self.commit(next, "remove")
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn allocate_id(&self) -> RepoResult<RecordId> {
        let mut last = RecordId::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = (self.id_source)();
            if !candidate.trim().is_empty() && self.position(&candidate).is_none() {
                return Ok(candidate);
            }
            last = candidate;
        }
        Err(RepoError::IdCollision(last))
    }

    fn commit(&mut self, next: Vec<T>, op: &str) -> RepoResult<()> {
        let value = serde_json::to_value(&next).map_err(|err| {
            RepoError::InvalidData(format!("failed to encode {} collection: {err}", T::KIND))
        })?;

        if let Err(err) = self.store.set(T::STORE_KEY, &value) {
            error!(
                "event=collection_write module=repo status=error op={} kind={} error={}",
                op,
                T::KIND,
                err
            );
            return Err(err.into());
        }

        info!(
            "event=collection_write module=repo status=ok op={} kind={} count={}",
            op,
            T::KIND,
            next.len()
        );
        self.records = next;
        Ok(())
    }
}

fn decode_records<T: Record>(value: serde_json::Value) -> RepoResult<Vec<T>> {
    let records: Vec<T> = serde_json::from_value(value).map_err(|err| {
        RepoError::InvalidData(format!("invalid {} collection: {err}", T::KIND))
    })?;

    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in &records {
        record.validate().map_err(|err| {
            RepoError::InvalidData(format!("{} `{}`: {err}", T::KIND, record.id()))
        })?;
        if !seen.insert(record.id()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate {} id `{}`",
                T::KIND,
                record.id()
            )));
        }
    }

    Ok(records)
}
