// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenWeather API client (current conditions and short forecast).

use crate::error::AppError;
use crate::services::upstream::{read_json, require_key};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SERVICE: &str = "OpenWeather";

/// Number of 3-hour forecast slots requested.
const FORECAST_SLOTS: u32 = 7;

/// OpenWeather API client.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url("https://api.openweathermap.org/data/2.5", api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Current conditions at a coordinate (metric units).
    pub async fn current(&self, lat: f64, lng: f64) -> Result<CurrentWeather, AppError> {
        let raw: RawCurrent = self.get("weather", lat, lng, &[]).await?;
        Ok(raw.into())
    }

    /// Forecast for the next few 3-hour slots at a coordinate.
    pub async fn forecast(&self, lat: f64, lng: f64) -> Result<Vec<ForecastEntry>, AppError> {
        let count = FORECAST_SLOTS.to_string();
        let raw: RawForecast = self
            .get("forecast", lat, lng, &[("cnt", count.as_str())])
            .await?;
        Ok(raw.list.into_iter().filter_map(RawSlot::into_entry).collect())
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        lat: f64,
        lng: f64,
        extra: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let api_key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!("{}/{}", self.base_url, endpoint);
        let (lat, lon) = (lat.to_string(), lng.to_string());

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", api_key),
            ])
            .query(extra)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{} request failed: {}", SERVICE, e)))?;

        read_json(SERVICE, response).await
    }
}

/// Current conditions returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeather {
    pub location: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: Option<u32>,
    pub description: String,
    pub icon: Option<String>,
    pub wind_speed: Option<f64>,
}

/// One forecast slot returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    #[serde(default)]
    name: String,
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawCondition>,
    wind: Option<RawWind>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    list: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    dt: i64,
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawCondition>,
}

fn describe(conditions: Vec<RawCondition>) -> (String, Option<String>) {
    conditions
        .into_iter()
        .next()
        .map(|c| (c.description, c.icon))
        .unwrap_or_default()
}

impl From<RawCurrent> for CurrentWeather {
    fn from(raw: RawCurrent) -> Self {
        let (description, icon) = describe(raw.weather);
        Self {
            location: raw.name,
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like.unwrap_or(raw.main.temp),
            humidity: raw.main.humidity,
            description,
            icon,
            wind_speed: raw.wind.and_then(|w| w.speed),
        }
    }
}

impl RawSlot {
    fn into_entry(self) -> Option<ForecastEntry> {
        let time = DateTime::from_timestamp(self.dt, 0)?;
        let (description, icon) = describe(self.weather);
        Some(ForecastEntry {
            time,
            temperature_c: self.main.temp,
            description,
            icon,
        })
    }
}
