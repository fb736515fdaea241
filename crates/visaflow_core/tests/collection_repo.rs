use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use visaflow_core::db::open_db_in_memory;
use visaflow_core::{
    Category, CustomerDraft, CustomerRepository, EntryType, FinanceEntryDraft, FinanceRepository,
    KeyValueStore, MemoryStore, RepoError, SqliteStore, StoreError, VisaStatus,
};

static TICKS: AtomicI64 = AtomicI64::new(0);

fn ticking_clock() -> DateTime<Utc> {
    let tick = TICKS.fetch_add(1, Ordering::SeqCst);
    Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
}

fn fixed_id() -> String {
    "same-id".to_string()
}

fn jane() -> CustomerDraft {
    CustomerDraft::new("Jane Doe", "P123", "Alice")
}

fn expense(amount: &str, description: &str) -> FinanceEntryDraft {
    FinanceEntryDraft::new(
        EntryType::Expense,
        Category::Others,
        amount.parse().unwrap(),
        description,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
}

#[test]
fn load_of_missing_key_is_empty() {
    let store = MemoryStore::new();
    let repo = CustomerRepository::open(&store).unwrap();
    assert!(repo.is_empty());
}

#[test]
fn append_assigns_identity_and_writes_through() {
    let store = MemoryStore::new();
    let mut repo = CustomerRepository::open(&store).unwrap();

    let records = repo.append(jane()).unwrap();
    assert_eq!(records.len(), 1);

    let mut reloaded = CustomerRepository::open(&store).unwrap();
    let loaded = reloaded.load().unwrap();
    let last = loaded.last().unwrap();
    assert!(!last.id.is_empty());
    assert_eq!(last.full_name, "Jane Doe");
    assert_eq!(last.passport_number, "P123");
    assert_eq!(last.agent_name, "Alice");
    assert_eq!(last.visa_status, VisaStatus::Pending);
    assert_eq!(last.created_at, last.updated_at);
}

#[test]
fn append_preserves_insertion_order_and_unique_ids() {
    let store = MemoryStore::new();
    let mut repo = FinanceRepository::open(&store).unwrap();

    for (index, amount) in ["10", "50", "30"].iter().enumerate() {
        repo.append(expense(amount, &format!("entry {index}"))).unwrap();
    }

    let descriptions: Vec<&str> = repo
        .records()
        .iter()
        .map(|entry| entry.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["entry 0", "entry 1", "entry 2"]);

    let ids: HashSet<&str> = repo.records().iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn append_retries_colliding_ids_and_then_gives_up() {
    let store = MemoryStore::new();
    let mut repo = CustomerRepository::open(&store)
        .unwrap()
        .with_id_source(fixed_id);

    repo.append(jane()).unwrap();
    let err = repo.append(jane()).unwrap_err();
    assert!(matches!(err, RepoError::IdCollision(id) if id == "same-id"));
    assert_eq!(repo.len(), 1);
}

#[test]
fn replace_keeps_position_id_and_created_at() {
    let store = MemoryStore::new();
    let mut repo = CustomerRepository::open(&store)
        .unwrap()
        .with_clock(ticking_clock);

    repo.append(CustomerDraft::new("First", "P1", "Alice")).unwrap();
    repo.append(jane()).unwrap();
    repo.append(CustomerDraft::new("Last", "P3", "Alice")).unwrap();
    let original = repo.records()[1].clone();

    let records = repo
        .replace(
            &original.id,
            jane().with_visa_status(VisaStatus::Approved),
        )
        .unwrap();

    let updated = &records[1];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
    assert_eq!(updated.visa_status, VisaStatus::Approved);
    assert_eq!(records[0].full_name, "First");
    assert_eq!(records[2].full_name, "Last");
}

#[test]
fn replace_unknown_id_is_a_no_op_and_try_replace_reports_it() {
    let store = MemoryStore::new();
    let mut repo = CustomerRepository::open(&store).unwrap();
    repo.append(jane()).unwrap();
    let before = repo.records().to_vec();
    let raw_before = store.raw("visaflow-customers");

    let after = repo.replace("missing", jane()).unwrap();
    assert_eq!(after, before.as_slice());
    assert_eq!(store.raw("visaflow-customers"), raw_before);

    let err = repo.try_replace("missing", jane()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "missing"));
}

#[test]
fn replace_unknown_id_ignores_draft_validity() {
    let store = MemoryStore::new();
    let mut repo = CustomerRepository::open(&store).unwrap();
    repo.append(jane()).unwrap();

    let blank = CustomerDraft::new(" ", "P123", "Alice");
    assert_eq!(repo.replace("missing", blank.clone()).unwrap().len(), 1);
    assert!(matches!(
        repo.try_replace("missing", blank.clone()).unwrap_err(),
        RepoError::NotFound(_)
    ));

    let id = repo.records()[0].id.clone();
    assert!(matches!(
        repo.replace(&id, blank).unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[test]
fn remove_filters_by_id_and_unknown_id_is_a_no_op() {
    let store = MemoryStore::new();
    let mut repo = FinanceRepository::open(&store).unwrap();
    repo.append(expense("10", "keep")).unwrap();
    repo.append(expense("20", "drop")).unwrap();
    let drop_id = repo.records()[1].id.clone();

    let records = repo.remove(&drop_id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "keep");

    assert_eq!(repo.remove(&drop_id).unwrap().len(), 1);
    assert!(matches!(
        repo.try_remove(&drop_id).unwrap_err(),
        RepoError::NotFound(_)
    ));

    let reloaded = FinanceRepository::open(&store).unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn invalid_draft_is_rejected_before_any_write() {
    let store = MemoryStore::new();
    let mut repo = FinanceRepository::open(&store).unwrap();

    let err = repo.append(expense("0", "free")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(store.raw("visaflow-finance").is_none());
}

#[test]
fn failed_write_surfaces_persistence_error_and_keeps_memory_state() {
    let store = MemoryStore::with_quota(600);
    let mut repo = CustomerRepository::open(&store).unwrap();
    repo.append(jane()).unwrap();
    let committed = repo.records().to_vec();

    let mut last_err = None;
    for index in 0..10 {
        if let Err(err) = repo.append(CustomerDraft::new(format!("Customer {index}"), "PX", "Bob")) {
            last_err = Some(err);
            break;
        }
    }

    let err = last_err.expect("quota should eventually be exceeded");
    assert!(matches!(
        err,
        RepoError::Persistence(StoreError::QuotaExceeded { .. })
    ));

    let persisted = CustomerRepository::open(&store).unwrap();
    assert_eq!(persisted.records(), repo.records());
    assert!(repo.records().starts_with(&committed));
}

#[test]
fn load_rejects_invalid_persisted_state() {
    let store = MemoryStore::new();
    store.insert_raw(
        "visaflow-finance",
        json!([{
            "id": "1",
            "entryType": "Income",
            "category": "Visa",
            "amount": -5,
            "description": "bad",
            "date": "2024-01-05",
            "createdAt": "2024-01-05T00:00:00Z"
        }])
        .to_string(),
    );

    let err = FinanceRepository::open(&store).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("greater than 0")));
}

#[test]
fn load_rejects_persisted_amount_above_cap() {
    let store = MemoryStore::new();
    store.insert_raw(
        "visaflow-finance",
        json!([{
            "id": "1",
            "entryType": "Income",
            "category": "Visa",
            "amount": "79228162514264337593543950334",
            "description": "imported",
            "date": "2024-01-05",
            "createdAt": "2024-01-05T00:00:00Z"
        }])
        .to_string(),
    );

    let err = FinanceRepository::open(&store).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("must not exceed")));
}

#[test]
fn append_rejects_amount_above_cap_without_writing() {
    let store = MemoryStore::new();
    let mut repo = FinanceRepository::open(&store).unwrap();

    let err = repo
        .append(expense("1000000000000.01", "Charter"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.is_empty());
    assert!(store.raw("visaflow-finance").is_none());
}

#[test]
fn load_rejects_duplicate_ids() {
    let store = MemoryStore::new();
    let customer = json!({
        "id": "dup",
        "fullName": "Jane",
        "passportNumber": "P1",
        "medicalFitness": "Pending",
        "agentName": "Alice",
        "visaStatus": "Pending",
        "createdAt": "2024-01-05T00:00:00Z",
        "updatedAt": "2024-01-05T00:00:00Z"
    });
    store
        .set("visaflow-customers", &json!([customer.clone(), customer]))
        .unwrap();

    let err = CustomerRepository::open(&store).err().unwrap();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("duplicate")));
}

#[test]
fn collections_share_one_sqlite_store_under_separate_keys() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let mut customers = CustomerRepository::open(store).unwrap();
    let mut finance = FinanceRepository::open(store).unwrap();
    customers.append(jane()).unwrap();
    finance.append(expense("12.34", "visa fee")).unwrap();

    assert_eq!(
        store.keys().unwrap(),
        vec!["visaflow-customers".to_string(), "visaflow-finance".to_string()]
    );
    let reloaded = FinanceRepository::open(store).unwrap();
    assert_eq!(reloaded.records()[0].amount, Decimal::new(1234, 2));
}
