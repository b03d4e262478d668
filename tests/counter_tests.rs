// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sequence counter tests.

use flight_tracker::db::sequences;
use std::collections::HashSet;

mod common;
use common::test_db_memory;

const NUM_CONCURRENT_CALLERS: u64 = 64;

#[tokio::test]
async fn test_counter_values_strictly_increase() {
    let db = test_db_memory();

    let mut last = 0;
    for _ in 0..10 {
        let value = db.next_value(sequences::FLIGHTS).await.unwrap();
        assert!(value > last, "{} should be greater than {}", value, last);
        last = value;
    }
    assert_eq!(last, 10);
}

#[tokio::test]
async fn test_missing_counter_starts_at_one() {
    let db = test_db_memory();
    assert_eq!(db.next_value("never-seeded").await.unwrap(), 1);
}

#[tokio::test]
async fn test_counter_continues_from_seeded_value() {
    let db = test_db_memory();
    db.set_counter(sequences::FLIGHTS, 5).await.unwrap();
    assert_eq!(db.next_value(sequences::FLIGHTS).await.unwrap(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_never_share_a_value() {
    let db = test_db_memory();

    let mut handles = vec![];
    for _ in 0..NUM_CONCURRENT_CALLERS {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.next_value(sequences::FLIGHTS).await
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let value = handle
            .await
            .expect("Task join failed")
            .expect("next_value failed");
        assert!(seen.insert(value), "value {} issued twice", value);
    }

    let expected: HashSet<u64> = (1..=NUM_CONCURRENT_CALLERS).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_offline_counter_fails() {
    let db = flight_tracker::db::Database::new_mock();
    let result = db.next_value(sequences::FLIGHTS).await;
    assert!(matches!(
        result,
        Err(flight_tracker::error::AppError::Database(_))
    ));
}
