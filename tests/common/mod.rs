// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, Utc};
use flight_tracker::config::Config;
use flight_tracker::db::Database;
use flight_tracker::models::FlightDetails;
use flight_tracker::routes::create_router;
use flight_tracker::AppState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a Firestore emulator connection.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    Database::connect_firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create an empty in-memory store.
#[allow(dead_code)]
pub fn test_db_memory() -> Database {
    Database::in_memory()
}

/// Unique email for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

#[allow(dead_code)]
pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap()
        .with_timezone(&Utc)
}

/// Itinerary details for a flight departing at `depart` and arriving two
/// hours later.
#[allow(dead_code)]
pub fn details(flight_number: &str, depart: &str) -> FlightDetails {
    let depart = parse_time(depart);
    FlightDetails {
        flight_number: flight_number.to_string(),
        from: "Singapore".to_string(),
        depart_date_time: depart,
        to: "Bangkok".to_string(),
        arrival_date_time: depart + chrono::Duration::hours(2),
    }
}

/// Create a test app backed by the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app_with(Database::in_memory())
}

/// Create a test app whose store fails every call.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    create_app_with(Database::new_mock())
}

#[allow(dead_code)]
fn create_app_with(db: Database) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default(), db));
    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and return status and parsed body.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
