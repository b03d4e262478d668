// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration, friend lists and search history against the in-memory store.

use flight_tracker::db::Database;
use flight_tracker::error::AppError;

mod common;
use common::test_db_memory;

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";
const CAROL: &str = "carol@example.com";

async fn db_with_users() -> Database {
    let db = test_db_memory();
    db.add_user(ALICE, "Alice").await.unwrap();
    db.add_user(BOB, "Bob").await.unwrap();
    db.add_user(CAROL, "Carol").await.unwrap();
    db
}

// ═══════════════════════════════════════════════════════════════════════════
// USERS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_add_user_starts_empty() {
    let db = test_db_memory();
    assert!(db.get_user(ALICE).await.unwrap().is_none());

    let user = db.add_user(ALICE, "Alice").await.unwrap();
    assert_eq!(user.email, ALICE);
    assert!(user.friends.is_empty());
    assert!(user.search_history_weather.is_empty());
    assert!(user.search_history_flight.is_empty());
    assert_eq!(db.get_user(ALICE).await.unwrap(), Some(user));
}

#[tokio::test]
async fn test_add_user_twice_keeps_original() {
    let db = test_db_memory();
    db.add_user(ALICE, "Alice").await.unwrap();
    db.push_location_history(ALICE, "Japan").await.unwrap();

    let again = db.add_user(ALICE, "Someone Else").await.unwrap();
    assert_eq!(again.name, "Alice");
    assert_eq!(again.search_history_weather, vec!["japan"]);
}

#[tokio::test]
async fn test_login_registers_or_checks_name() {
    let db = test_db_memory();

    let created = db.login(ALICE, "Alice").await.unwrap();
    assert_eq!(created.name, "Alice");

    let existing = db.login(ALICE, "Alice").await.unwrap();
    assert_eq!(existing, created);

    let wrong = db.login(ALICE, "Mallory").await;
    assert!(matches!(wrong, Err(AppError::BadRequest(msg)) if msg == "Invalid name"));
}

// ═══════════════════════════════════════════════════════════════════════════
// FRIENDS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_add_friend_appends_entry() {
    let db = db_with_users().await;

    let user = db.add_friend(ALICE, BOB).await.unwrap();
    assert_eq!(user.friends.len(), 1);
    assert_eq!(user.friends[0].email, BOB);
    assert_eq!(user.friends[0].name, "Bob");

    // Not mutual
    let bob = db.get_user(BOB).await.unwrap().unwrap();
    assert!(bob.friends.is_empty());
}

#[tokio::test]
async fn test_add_friend_twice_fails() {
    let db = db_with_users().await;
    db.add_friend(ALICE, BOB).await.unwrap();

    let second = db.add_friend(ALICE, BOB).await;
    assert!(matches!(second, Err(AppError::BadRequest(_))));
    assert_eq!(db.get_user(ALICE).await.unwrap().unwrap().friends.len(), 1);
}

#[tokio::test]
async fn test_add_self_always_fails() {
    let db = db_with_users().await;
    assert!(matches!(
        db.add_friend(ALICE, ALICE).await,
        Err(AppError::BadRequest(_))
    ));

    // Even for an unknown user
    assert!(matches!(
        db.add_friend("ghost@example.com", "ghost@example.com").await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_add_unknown_friend_or_user_fails() {
    let db = db_with_users().await;

    let missing_friend = db.add_friend(ALICE, "ghost@example.com").await;
    assert!(matches!(missing_friend, Err(AppError::NotFound(msg)) if msg.contains("Friend")));

    let missing_user = db.add_friend("ghost@example.com", ALICE).await;
    assert!(matches!(missing_user, Err(AppError::NotFound(msg)) if msg.contains("User")));
}

#[tokio::test]
async fn test_delete_friend() {
    let db = db_with_users().await;
    db.add_friend(ALICE, BOB).await.unwrap();
    db.add_friend(ALICE, CAROL).await.unwrap();

    let user = db.delete_friend(ALICE, BOB).await.unwrap();
    assert_eq!(user.friends.len(), 1);
    assert_eq!(user.friends[0].email, CAROL);
}

#[tokio::test]
async fn test_delete_friend_not_in_list_fails() {
    let db = db_with_users().await;

    assert!(matches!(
        db.delete_friend(ALICE, BOB).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        db.delete_friend(ALICE, ALICE).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        db.delete_friend("ghost@example.com", BOB).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_friends_detailed_skips_missing_records() {
    let db = test_db_memory();
    flight_tracker::db::seed::seed_demo_data(&db).await.unwrap();

    // A dangling friend entry whose user record is gone
    let mut team = db.get_user("it5007team2@gmail.com").await.unwrap().unwrap();
    team.friends.push(flight_tracker::models::Friend {
        email: "gone@example.com".to_string(),
        name: "Gone".to_string(),
    });
    db.put_user(&team).await.unwrap();

    let friends = db
        .list_friends_detailed("it5007team2@gmail.com")
        .await
        .unwrap();
    let emails: Vec<&str> = friends.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["alice@gmail.com", "bob@gmail.com"]);
    assert_eq!(friends[0].search_history_weather, vec!["bali", "japan"]);

    assert!(matches!(
        db.list_friends_detailed("ghost@example.com").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_friend_adds_are_not_lost() {
    let db = test_db_memory();
    db.add_user(ALICE, "Alice").await.unwrap();

    let count = 20;
    for i in 0..count {
        db.add_user(&format!("friend{}@example.com", i), &format!("Friend {}", i))
            .await
            .unwrap();
    }

    let mut handles = vec![];
    for i in 0..count {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.add_friend(ALICE, &format!("friend{}@example.com", i)).await
        }));
    }
    for handle in handles {
        handle.await.expect("Task join failed").expect("add_friend failed");
    }

    let alice = db.get_user(ALICE).await.unwrap().unwrap();
    assert_eq!(alice.friends.len(), count);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH HISTORY
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_location_history_case_fold_and_dedupe() {
    let db = db_with_users().await;

    db.push_location_history(ALICE, "Japan").await.unwrap();
    db.push_location_history(ALICE, "Bali").await.unwrap();
    let user = db.push_location_history(ALICE, "japan").await.unwrap();

    assert_eq!(user.search_history_weather, vec!["japan", "bali"]);
    assert_eq!(
        db.get_user(ALICE).await.unwrap().unwrap().search_history_weather,
        vec!["japan", "bali"]
    );
}

#[tokio::test]
async fn test_single_entry_after_case_variants() {
    let db = db_with_users().await;
    db.push_location_history(ALICE, "Japan").await.unwrap();
    let user = db.push_location_history(ALICE, "japan").await.unwrap();
    assert_eq!(user.search_history_weather, vec!["japan"]);
}

#[tokio::test]
async fn test_flight_history_uppercase() {
    let db = db_with_users().await;

    db.push_flight_history(BOB, "sq944").await.unwrap();
    db.push_flight_history(BOB, "qf23").await.unwrap();
    let user = db.push_flight_history(BOB, "SQ 944").await.unwrap();

    assert_eq!(user.search_history_flight, vec!["SQ944", "QF23"]);
    // Weather history untouched
    assert!(user.search_history_weather.is_empty());
}

#[tokio::test]
async fn test_location_history_keeps_full_list() {
    let db = db_with_users().await;

    for i in 0..21 {
        db.push_location_history(ALICE, &format!("city{}", i))
            .await
            .unwrap();
    }

    let user = db.get_user(ALICE).await.unwrap().unwrap();
    assert_eq!(user.search_history_weather.len(), 21);
    assert_eq!(user.search_history_weather.first().map(String::as_str), Some("city20"));
    assert_eq!(user.search_history_weather.last().map(String::as_str), Some("city0"));
}

#[tokio::test]
async fn test_history_requires_existing_user() {
    let db = test_db_memory();
    assert!(matches!(
        db.push_location_history("ghost@example.com", "Japan").await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        db.push_flight_history("ghost@example.com", "SQ1").await,
        Err(AppError::NotFound(_))
    ));
}
