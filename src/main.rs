// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flight Tracker API Server
//!
//! Serves flight itineraries, friends and search history to the web client.

use flight_tracker::{config::Config, db::Database, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting Flight Tracker API"
    );

    // Open the store once; it lives for the whole process
    let db = Database::open(&config).await?;

    if config.seed_demo_data {
        flight_tracker::db::seed::seed_demo_data(&db).await?;
    }

    if config.airlabs_api_key.is_none() {
        tracing::warn!("AIRLABS_API_KEY not set, flight tracking disabled");
    }
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set, weather lookups disabled");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = flight_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flight_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
