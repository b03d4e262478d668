// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live flight and weather lookups proxied to third-party APIs.
//!
//! API keys stay on the server; the web client only sees these routes.

use crate::error::Result;
use crate::routes::ValidatedQuery;
use crate::services::{Airport, CurrentWeather, FlightPosition, ForecastEntry};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/track/{flight}", get(track_flight))
        .route("/api/airports/{iata}", get(get_airport))
        .route("/api/weather", get(get_weather))
        .route("/api/weather/forecast", get(get_forecast))
}

#[derive(Debug, Deserialize, Validate)]
struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    lng: f64,
}

async fn track_flight(
    State(state): State<Arc<AppState>>,
    Path(flight): Path<String>,
) -> Result<Json<FlightPosition>> {
    tracing::debug!(flight = %flight, "Tracking flight");
    Ok(Json(state.airlabs.flight_position(&flight).await?))
}

async fn get_airport(
    State(state): State<Arc<AppState>>,
    Path(iata): Path<String>,
) -> Result<Json<Airport>> {
    Ok(Json(state.airlabs.airport(&iata).await?))
}

async fn get_weather(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(coords): ValidatedQuery<Coordinates>,
) -> Result<Json<CurrentWeather>> {
    Ok(Json(state.weather.current(coords.lat, coords.lng).await?))
}

async fn get_forecast(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(coords): ValidatedQuery<Coordinates>,
) -> Result<Json<Vec<ForecastEntry>>> {
    Ok(Json(state.weather.forecast(coords.lat, coords.lng).await?))
}
