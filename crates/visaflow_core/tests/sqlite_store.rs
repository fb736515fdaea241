use serde_json::json;
use visaflow_core::db::{open_db, open_db_in_memory, DbError};
use visaflow_core::{KeyValueStore, SqliteStore, StoreError};

#[test]
fn missing_key_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    assert!(store.get("visaflow-customers").unwrap().is_none());
}

#[test]
fn set_then_get_returns_same_document_and_upserts() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    store.set("visaflow-finance", &json!([{"id": "1"}])).unwrap();
    store
        .set("visaflow-finance", &json!([{"id": "1"}, {"id": "2"}]))
        .unwrap();

    assert_eq!(
        store.get("visaflow-finance").unwrap(),
        Some(json!([{"id": "1"}, {"id": "2"}]))
    );
    assert_eq!(store.keys().unwrap(), vec!["visaflow-finance".to_string()]);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visaflow.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        store.set("visaflow-customers", &json!([])).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    assert_eq!(store.get("visaflow-customers").unwrap(), Some(json!([])));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteStore::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        StoreError::Db(DbError::SchemaBehind { found: 0, .. })
    ));
}

#[test]
fn empty_key_write_fails_without_panicking() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let err = store.set("", &json!([])).unwrap_err();
    assert!(matches!(err, StoreError::Db(DbError::Sqlite(_))));
}
