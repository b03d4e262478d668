// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flight Tracker: shared flight itineraries, friends and search history
//!
//! This crate provides the backend API for logging flights, sharing them
//! with friends, and looking up live flight positions and weather.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{AirLabsClient, WeatherClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub airlabs: AirLabsClient,
    pub weather: WeatherClient,
}

impl AppState {
    /// Build state with API clients configured from `config`.
    pub fn new(config: Config, db: Database) -> Self {
        let airlabs = AirLabsClient::new(config.airlabs_api_key.clone());
        let weather = WeatherClient::new(config.openweather_api_key.clone());
        Self {
            config,
            db,
            airlabs,
            weather,
        }
    }
}
