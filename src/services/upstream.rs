// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response handling shared by the third-party API clients.

use crate::error::AppError;
use serde::de::DeserializeOwned;

/// Check response status and parse the JSON body.
///
/// `service` names the upstream in error messages and logs.
pub async fn read_json<T: DeserializeOwned>(
    service: &str,
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!(service, "Upstream rate limit hit (429)");
            return Err(AppError::Upstream(AppError::UPSTREAM_RATE_LIMIT.to_string()));
        }

        tracing::warn!(service, status = status.as_u16(), "Upstream request failed");
        return Err(AppError::Upstream(format!(
            "{} HTTP {}: {}",
            service, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("{} JSON parse error: {}", service, e)))
}

/// Fail with 503 when an API key was not configured.
pub fn require_key<'a>(service: &str, key: Option<&'a str>) -> Result<&'a str, AppError> {
    key.ok_or_else(|| AppError::ServiceUnavailable(format!("{} API key not configured", service)))
}
