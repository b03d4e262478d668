// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AirLabs API client for live flight positions and airport lookups.
//!
//! AirLabs wraps every result in `{"response": ...}` and reports failures
//! as `{"error": {"message": ...}}` with a 200 status, so both shapes are
//! handled.

use crate::error::AppError;
use crate::models::history::normalize_flight_query;
use crate::services::upstream::{read_json, require_key};
use serde::{Deserialize, Serialize};

const SERVICE: &str = "AirLabs";

/// AirLabs API client.
#[derive(Clone)]
pub struct AirLabsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AirLabsClient {
    /// Create a client against the public AirLabs API.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url("https://airlabs.co/api/v9", api_key)
    }

    /// Create a client against a different base URL (tests, proxies).
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Current position of the aircraft flying `flight_iata`.
    ///
    /// The flight number is normalized the same way as flight search
    /// history entries ("sq 944" → "SQ944").
    pub async fn flight_position(&self, flight_iata: &str) -> Result<FlightPosition, AppError> {
        let flight_iata = normalize_flight_query(flight_iata);
        if flight_iata.is_empty() {
            return Err(AppError::BadRequest("Flight number is empty".to_string()));
        }

        let envelope: Envelope<Vec<FlightPosition>> = self
            .get("flights", &[("flight_iata", flight_iata.as_str())])
            .await?;

        envelope
            .into_result()?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
    }

    /// Airport details for an IATA code.
    pub async fn airport(&self, iata_code: &str) -> Result<Airport, AppError> {
        let iata_code = iata_code.trim().to_uppercase();
        if iata_code.is_empty() {
            return Err(AppError::BadRequest("Airport code is empty".to_string()));
        }

        let envelope: Envelope<Vec<Airport>> = self
            .get("airports", &[("iata_code", iata_code.as_str())])
            .await?;

        envelope
            .into_result()?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Airport {} not found", iata_code)))
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let api_key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("api_key", api_key)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("{} request failed: {}", SERVICE, e)))?;

        read_json(SERVICE, response).await
    }
}

/// AirLabs response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, AppError> {
        if let Some(error) = self.error {
            return Err(AppError::Upstream(format!("{}: {}", SERVICE, error.message)));
        }
        self.response
            .ok_or_else(|| AppError::Upstream(format!("{}: empty response", SERVICE)))
    }
}

/// Live aircraft position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPosition {
    pub flight_iata: Option<String>,
    pub dep_iata: Option<String>,
    pub arr_iata: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Altitude in meters
    pub alt: Option<f64>,
    /// Heading in degrees
    pub dir: Option<f64>,
    /// Ground speed in km/h
    pub speed: Option<f64>,
}

/// Airport location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
    pub iata_code: Option<String>,
    pub lat: f64,
    pub lng: f64,
}
