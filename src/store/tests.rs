#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Category, ValidationError};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 10, 0, 0).unwrap()
}

fn empty_store() -> ExpenseStore<MemoryBackend> {
    ExpenseStore::new(MemoryBackend::default())
}

fn draft(amount: &str, category: &str, note: &str) -> ExpenseDraft {
    ExpenseDraft::new(amount, category, note)
}

fn record(id: i64, amount: &str, category: &str) -> ExpenseRecord {
    let mut rec = ExpenseRecord::from_draft(&draft(amount, category, ""), now()).unwrap();
    rec.id = id;
    rec
}

// ── list_all ──────────────────────────────────────────────────

#[test]
fn test_list_all_without_slot_is_empty() {
    let store = empty_store();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_list_all_is_idempotent() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    store.add(record(2, "6", "home")).unwrap();
    let first = store.list_all().unwrap();
    let second = store.list_all().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_list_all_unparseable_slot_is_empty() {
    let store = ExpenseStore::new(MemoryBackend::with_slot(EXPENSES_SLOT, "{not json"));
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_list_all_non_array_slot_is_empty() {
    let store = ExpenseStore::new(MemoryBackend::with_slot(EXPENSES_SLOT, r#"{"id":1}"#));
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_list_all_skips_bad_records() {
    let raw = r#"[
        {"id":1,"amount":10,"category":"comida","note":"","date":"2024-05-01T12:00:00.000Z"},
        {"id":2,"amount":null,"category":"comida","note":"","date":"2024-05-02T12:00:00.000Z"},
        {"id":3,"amount":4.5,"category":"transporte","date":"2024-05-03T12:00:00.000Z"}
    ]"#;
    let store = ExpenseStore::new(MemoryBackend::with_slot(EXPENSES_SLOT, raw));
    let all = store.list_all().unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(all[1].category, Category::Transport);
    assert_eq!(all[1].amount, dec!(4.5));
}

// ── add ───────────────────────────────────────────────────────

#[test]
fn test_add_preserves_insertion_order() {
    let mut store = empty_store();
    store.add(record(30, "1", "food")).unwrap();
    store.add(record(10, "2", "food")).unwrap();
    store.add(record(20, "3", "food")).unwrap();
    let ids: Vec<i64> = store.list_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn test_add_count_matches_and_each_is_retrievable() {
    let mut store = empty_store();
    for i in 0..25 {
        store.add(record(i, "1.25", "other")).unwrap();
    }
    assert_eq!(store.list_all().unwrap().len(), 25);
    for i in 0..25 {
        assert_eq!(store.get(i).unwrap().unwrap().id, i);
    }
}

#[test]
fn test_add_rewrites_whole_collection() {
    let mut store = empty_store();
    store.add(record(1, "1", "food")).unwrap();
    store.add(record(2, "2", "food")).unwrap();
    let raw = store.backend().read_slot(EXPENSES_SLOT).unwrap().unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(store.backend().writes, 2);
}

// ── create ────────────────────────────────────────────────────

#[test]
fn test_create_stores_validated_record() {
    let mut store = empty_store();
    let rec = store.create(&draft("50.00", "comida", ""), now()).unwrap();
    assert_eq!(rec.id, now().timestamp_millis());
    assert_eq!(rec.category, Category::Food);
    assert_eq!(store.get(rec.id).unwrap(), Some(rec));
}

#[test]
fn test_create_same_millisecond_gets_unique_ids() {
    let mut store = empty_store();
    let a = store.create(&draft("1", "food", ""), now()).unwrap();
    let b = store.create(&draft("2", "food", ""), now()).unwrap();
    let c = store.create(&draft("3", "food", ""), now()).unwrap();
    assert_eq!(b.id, a.id + 1);
    assert_eq!(c.id, a.id + 2);
    assert_eq!(store.list_all().unwrap().len(), 3);
}

#[test]
fn test_create_ids_increase_when_clock_goes_back() {
    let mut store = empty_store();
    let a = store.create(&draft("1", "food", ""), now()).unwrap();
    let b = store
        .create(&draft("1", "food", ""), now() - Duration::hours(1))
        .unwrap();
    assert!(b.id > a.id);
}

#[test]
fn test_create_invalid_is_validation_error_and_stores_nothing() {
    let mut store = empty_store();
    let err = store.create(&draft("abc", "food", ""), now()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::InvalidAmount("abc".into()))
    );

    let err = store.create(&draft("5", "pets", ""), now()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::UnknownCategory(_))
    ));

    assert!(store.list_all().unwrap().is_empty());
    assert_eq!(store.backend().writes, 0);
}

#[test]
fn test_create_too_large_stores_nothing() {
    let mut store = empty_store();
    let err = store
        .create(&draft("50000000000000000000000000000", "food", ""), now())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ValidationError>(),
        Some(ValidationError::AmountTooLarge(_))
    ));
    assert!(store.list_all().unwrap().is_empty());
    assert_eq!(store.backend().writes, 0);
}

#[test]
fn test_created_amount_matches_reloaded_amount() {
    let mut store = empty_store();
    let created = store.create(&draft("999999999.99", "home", "rent"), now()).unwrap();
    assert_eq!(created.amount, dec!(999999999.99));
    assert_eq!(store.list_all().unwrap(), vec![created]);
}

// ── delete_by_id ──────────────────────────────────────────────

#[test]
fn test_delete_removes_record() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    store.add(record(2, "6", "food")).unwrap();
    assert!(store.delete_by_id(1).unwrap());
    let all = store.list_all().unwrap();
    assert!(all.iter().all(|r| r.id != 1));
    assert_eq!(all.len(), 1);
}

#[test]
fn test_delete_twice_is_noop() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    assert!(store.delete_by_id(1).unwrap());
    assert!(!store.delete_by_id(1).unwrap());
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_delete_unknown_does_not_write() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    let writes = store.backend().writes;
    assert!(!store.delete_by_id(999).unwrap());
    assert_eq!(store.backend().writes, writes);
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_delete_removes_only_first_duplicate() {
    let mut store = empty_store();
    store.add(record(7, "1", "food")).unwrap();
    store.add(record(7, "2", "home")).unwrap();
    assert!(store.delete_by_id(7).unwrap());
    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].category, Category::Home);
}

#[test]
fn test_add_then_delete_restores_previous_state() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    let before = store.list_all().unwrap();

    let rec = store.create(&draft("20", "transport", ""), now()).unwrap();
    assert_eq!(store.list_all().unwrap().len(), before.len() + 1);
    store.delete_by_id(rec.id).unwrap();

    assert_eq!(store.list_all().unwrap(), before);
}

// ── Damaged storage ───────────────────────────────────────────

#[test]
fn test_write_over_corrupt_slot_preserves_raw_data() {
    let mut store = ExpenseStore::new(MemoryBackend::with_slot(EXPENSES_SLOT, "{oops"));
    store.add(record(1, "5", "food")).unwrap();

    let backup = store.backend().read_slot(CORRUPT_SLOT).unwrap();
    assert_eq!(backup.as_deref(), Some("{oops"));
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_write_over_partly_bad_slot_preserves_raw_data() {
    let raw = r#"[{"id":1,"amount":2,"category":"food","date":"2024-05-01T00:00:00Z"},{"id":2}]"#;
    let mut store = ExpenseStore::new(MemoryBackend::with_slot(EXPENSES_SLOT, raw));
    assert!(store.delete_by_id(1).unwrap());
    assert_eq!(
        store.backend().read_slot(CORRUPT_SLOT).unwrap().as_deref(),
        Some(raw)
    );
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_clean_slot_writes_no_backup() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    store.add(record(2, "5", "food")).unwrap();
    assert!(store.backend().read_slot(CORRUPT_SLOT).unwrap().is_none());
}

#[test]
fn test_slot_replaced_externally_is_seen() {
    let mut store = empty_store();
    store.add(record(1, "5", "food")).unwrap();
    store.backend_mut().write_slot(EXPENSES_SLOT, "[]").unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

// ── SQLite backend ────────────────────────────────────────────

#[test]
fn test_store_over_database() {
    let db = crate::db::Database::open_in_memory().unwrap();
    let mut store = ExpenseStore::new(db);
    let rec = store.create(&draft("9.99", "health", "vitamins"), now()).unwrap();
    assert_eq!(store.list_all().unwrap(), vec![rec.clone()]);
    assert!(store.delete_by_id(rec.id).unwrap());
    assert!(store.list_all().unwrap().is_empty());
}
