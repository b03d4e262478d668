// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flight itinerary routes.

use crate::error::{AppError, Result};
use crate::models::history::normalize_flight_query;
use crate::models::{Flight, FlightDetails};
use crate::routes::{require_email, ValidatedJson};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidateEmail};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{email}/flights", get(get_flights))
        .route("/api/users/{email}/shared-flights", get(get_shared_flights))
        .route("/api/flights", post(add_flight))
        .route("/api/flights/{id}", put(update_flight).delete(delete_flight))
        .route("/api/flights/{id}/share", put(update_share_flight))
}

// ─── Request Bodies ──────────────────────────────────────────

/// New flight, including its owner.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightInput {
    #[validate(length(min = 1, max = 100))]
    pub flight_number: String,
    #[validate(length(min = 1, max = 100))]
    pub from: String,
    pub depart_date_time: DateTime<Utc>,
    #[validate(length(min = 1, max = 100))]
    pub to: String,
    pub arrival_date_time: DateTime<Utc>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Editable fields of an existing flight.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFlightInput {
    #[validate(length(min = 1, max = 100))]
    pub flight_number: String,
    #[validate(length(min = 1, max = 100))]
    pub from: String,
    pub depart_date_time: DateTime<Utc>,
    #[validate(length(min = 1, max = 100))]
    pub to: String,
    pub arrival_date_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ShareInput {
    pub share: Vec<String>,
}

fn trimmed_details(
    flight_number: &str,
    from: &str,
    depart_date_time: DateTime<Utc>,
    to: &str,
    arrival_date_time: DateTime<Utc>,
) -> Result<FlightDetails> {
    let flight_number = normalize_flight_query(flight_number);
    if flight_number.is_empty() {
        return Err(AppError::BadRequest("Flight number is empty".to_string()));
    }

    let details = FlightDetails {
        flight_number,
        from: from.trim().to_string(),
        depart_date_time,
        to: to.trim().to_string(),
        arrival_date_time,
    };
    details.validate_schedule()?;
    Ok(details)
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddFlightResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteFlightResponse {
    /// Deleted flight id, or null if nothing was deleted
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub id: Option<u64>,
}

// ─── Handlers ────────────────────────────────────────────────

/// Flights owned by a user.
async fn get_flights(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Flight>>> {
    require_email(&email)?;
    Ok(Json(state.db.list_flights_by_owner(&email).await?))
}

/// Flights other users have shared with a user.
async fn get_shared_flights(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Flight>>> {
    require_email(&email)?;
    Ok(Json(state.db.list_flights_shared_with(&email).await?))
}

async fn add_flight(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<FlightInput>,
) -> Result<Json<AddFlightResponse>> {
    let details = trimmed_details(
        &input.flight_number,
        &input.from,
        input.depart_date_time,
        &input.to,
        input.arrival_date_time,
    )?;

    let flight = state
        .db
        .create_flight(details, &input.email, input.name.trim())
        .await?;

    Ok(Json(AddFlightResponse {
        success: true,
        id: flight.id,
    }))
}

async fn update_flight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    ValidatedJson(input): ValidatedJson<UpdateFlightInput>,
) -> Result<Json<SuccessResponse>> {
    let details = trimmed_details(
        &input.flight_number,
        &input.from,
        input.depart_date_time,
        &input.to,
        input.arrival_date_time,
    )?;

    let success = state.db.update_flight(id, &details).await?;
    Ok(Json(SuccessResponse { success }))
}

async fn update_share_flight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    ValidatedJson(input): ValidatedJson<ShareInput>,
) -> Result<Json<SuccessResponse>> {
    if let Some(bad) = input
        .share
        .iter()
        .map(|e| e.trim())
        .find(|e| !e.is_empty() && !e.validate_email())
    {
        return Err(AppError::BadRequest(format!("Invalid email in share list: {}", bad)));
    }

    let success = state.db.update_flight_share(id, &input.share).await?;
    Ok(Json(SuccessResponse { success }))
}

async fn delete_flight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteFlightResponse>> {
    let id = state.db.delete_flight(id).await?;
    Ok(Json(DeleteFlightResponse { id }))
}
