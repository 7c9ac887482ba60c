//! SQLite dedup store integration tests.
//!
//! Run with: `cargo test -p surisink-dedupe --test sqlite_store_test`

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use surisink_dedupe::{DedupStore, SqliteDedupStore, StoreError};

async fn open_temp() -> (tempfile::TempDir, SqliteDedupStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteDedupStore::open(&dir.path().join("dedupe.db"))
        .await
        .unwrap();
    (dir, store)
}

#[tokio::test]
async fn check_is_false_until_marked() {
    let (_dir, store) = open_temp().await;

    assert!(!store.check("aa").await.unwrap());
    store
        .mark("aa", "suricata/2024/01/01/1/aa_x", 10, "text/plain")
        .await
        .unwrap();
    assert!(store.check("aa").await.unwrap());
    assert!(!store.check("bb").await.unwrap());
}

#[tokio::test]
async fn marking_twice_increments_count_and_keeps_first_seen() {
    let (_dir, store) = open_temp().await;
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let second = first + Duration::hours(3);

    store
        .mark_at("aa", "key-1", 100, "application/pdf", first)
        .await
        .unwrap();
    store
        .mark_at("aa", "key-2", 100, "application/pdf", second)
        .await
        .unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    let record = store.get("aa").await.unwrap().unwrap();
    assert_eq!(record.occurrence_count, 2);
    assert_eq!(record.first_seen, first);
    assert_eq!(record.last_seen, second);
    assert_eq!(record.object_key, "key-1");
    assert_eq!(record.size_bytes, 100);
    assert_eq!(record.mime_type, "application/pdf");
}

#[tokio::test]
async fn last_seen_never_moves_backwards() {
    let (_dir, store) = open_temp().await;
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    store.mark_at("aa", "k", 1, "text/plain", now).await.unwrap();
    store
        .mark_at("aa", "k", 1, "text/plain", now - Duration::days(1))
        .await
        .unwrap();

    let record = store.get("aa").await.unwrap().unwrap();
    assert_eq!(record.last_seen, now);
    assert!(record.first_seen <= record.last_seen);
}

#[tokio::test]
async fn gc_removes_only_rows_past_retention() {
    let (_dir, store) = open_temp().await;
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    for (hash, age_days) in [("fresh", 0), ("recent", 5), ("stale", 40)] {
        store
            .mark_at(hash, "k", 1, "text/plain", now - Duration::days(age_days))
            .await
            .unwrap();
    }

    let removed = store.purge_older_than_at(30, now).await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.check("fresh").await.unwrap());
    assert!(store.check("recent").await.unwrap());
    assert!(!store.check("stale").await.unwrap());
}

#[tokio::test]
async fn gc_with_zero_retention_is_disabled() {
    let (_dir, store) = open_temp().await;
    let now = Utc::now();
    store
        .mark_at("old", "k", 1, "text/plain", now - Duration::days(400))
        .await
        .unwrap();

    assert_eq!(store.purge_older_than_at(0, now).await.unwrap(), 0);
    assert!(store.check("old").await.unwrap());
}

#[tokio::test]
async fn gc_with_unrepresentable_retention_is_an_error() {
    let (_dir, store) = open_temp().await;
    store.mark("aa", "k", 1, "text/plain").await.unwrap();

    let result = store.purge_older_than(u32::MAX).await;
    assert!(matches!(
        result,
        Err(StoreError::RetentionOutOfRange(u32::MAX))
    ));
    assert!(store.check("aa").await.unwrap());
}

#[tokio::test]
async fn rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dedupe.db");

    let store = SqliteDedupStore::open(&path).await.unwrap();
    store.mark("aa", "k", 1, "text/plain").await.unwrap();
    store.close().await;

    let reopened = SqliteDedupStore::open(&path).await.unwrap();
    assert!(reopened.check("aa").await.unwrap());
}

#[tokio::test]
async fn concurrent_marks_are_not_lost() {
    let (_dir, store) = open_temp().await;
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.mark("same", "k", 1, "text/plain").await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = store.get("same").await.unwrap().unwrap();
    assert_eq!(record.occurrence_count, 16);
    assert_eq!(store.count().await.unwrap(), 1);
}
