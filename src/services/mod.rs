// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - third-party API clients.

pub mod airlabs;
pub mod upstream;
pub mod weather;

pub use airlabs::{AirLabsClient, Airport, FlightPosition};
pub use weather::{CurrentWeather, ForecastEntry, WeatherClient};
