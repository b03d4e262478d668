// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flight itinerary model for storage and API.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored flight record.
///
/// Field names are camelCase on the wire and in the store, matching the
/// documents the web client already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Sequence-assigned id (also used as document ID)
    pub id: u64,
    /// Airline flight number, e.g. "SQ346"
    pub flight_number: String,
    /// Departure location
    pub from: String,
    /// Scheduled departure (UTC)
    pub depart_date_time: DateTime<Utc>,
    /// Arrival location
    pub to: String,
    /// Scheduled arrival (UTC)
    pub arrival_date_time: DateTime<Utc>,
    /// Owner email
    pub email: String,
    /// Owner display name
    pub name: String,
    /// Emails of friends this flight is shared with
    #[serde(default)]
    pub share: Vec<String>,
}

/// The owner-editable part of a flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDetails {
    pub flight_number: String,
    pub from: String,
    pub depart_date_time: DateTime<Utc>,
    pub to: String,
    pub arrival_date_time: DateTime<Utc>,
}

impl FlightDetails {
    /// Reject itineraries that arrive before (or when) they depart.
    pub fn validate_schedule(&self) -> Result<(), AppError> {
        if self.depart_date_time >= self.arrival_date_time {
            return Err(AppError::BadRequest(
                "Departure must be before arrival".to_string(),
            ));
        }
        Ok(())
    }
}

impl Flight {
    /// Build a new flight owned by `email` with an empty share list.
    pub fn new(id: u64, details: FlightDetails, email: &str, name: &str) -> Self {
        Self {
            id,
            flight_number: details.flight_number,
            from: details.from,
            depart_date_time: details.depart_date_time,
            to: details.to,
            arrival_date_time: details.arrival_date_time,
            email: email.to_string(),
            name: name.to_string(),
            share: Vec::new(),
        }
    }

    /// Editable fields of this flight.
    pub fn details(&self) -> FlightDetails {
        FlightDetails {
            flight_number: self.flight_number.clone(),
            from: self.from.clone(),
            depart_date_time: self.depart_date_time,
            to: self.to.clone(),
            arrival_date_time: self.arrival_date_time,
        }
    }

    /// Replace the editable fields. Returns `false` if nothing changed.
    pub fn apply_details(&mut self, details: &FlightDetails) -> bool {
        if self.details() == *details {
            return false;
        }
        self.flight_number = details.flight_number.clone();
        self.from = details.from.clone();
        self.depart_date_time = details.depart_date_time;
        self.to = details.to.clone();
        self.arrival_date_time = details.arrival_date_time;
        true
    }

    /// Replace the share list wholesale. Returns `false` if nothing changed.
    ///
    /// Entries are trimmed; blanks, duplicates and the owner's own email
    /// are dropped. First occurrence order is kept.
    pub fn set_share(&mut self, share: &[String]) -> bool {
        let mut normalized: Vec<String> = Vec::with_capacity(share.len());
        for email in share {
            let email = email.trim();
            if email.is_empty() || email == self.email {
                continue;
            }
            if !normalized.iter().any(|existing| existing == email) {
                normalized.push(email.to_string());
            }
        }

        if normalized == self.share {
            return false;
        }
        self.share = normalized;
        true
    }

    /// Whether `email` has been granted read access.
    pub fn is_shared_with(&self, email: &str) -> bool {
        self.share.iter().any(|e| e == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn details(number: &str) -> FlightDetails {
        FlightDetails {
            flight_number: number.to_string(),
            from: "Singapore".to_string(),
            depart_date_time: Utc.with_ymd_and_hms(2023, 12, 1, 23, 15, 0).unwrap(),
            to: "Zurich".to_string(),
            arrival_date_time: Utc.with_ymd_and_hms(2023, 12, 2, 6, 2, 0).unwrap(),
        }
    }

    #[test]
    fn test_apply_details_reports_change() {
        let mut flight = Flight::new(1, details("SQ346"), "owner@example.com", "Owner");
        assert!(!flight.apply_details(&details("SQ346")));
        assert!(flight.apply_details(&details("SQ345")));
        assert_eq!(flight.flight_number, "SQ345");
        assert_eq!(flight.id, 1);
    }

    #[test]
    fn test_set_share_normalizes() {
        let mut flight = Flight::new(1, details("SQ346"), "owner@example.com", "Owner");
        let changed = flight.set_share(&[
            " alice@example.com ".to_string(),
            "bob@example.com".to_string(),
            "alice@example.com".to_string(),
            "owner@example.com".to_string(),
            "".to_string(),
        ]);
        assert!(changed);
        assert_eq!(flight.share, vec!["alice@example.com", "bob@example.com"]);

        // Same list again is not a modification
        assert!(!flight.set_share(&["alice@example.com".to_string(), "bob@example.com".to_string()]));
        assert!(flight.is_shared_with("bob@example.com"));
        assert!(!flight.is_shared_with("owner@example.com"));
    }

    #[test]
    fn test_schedule_validation() {
        let mut d = details("SQ346");
        assert!(d.validate_schedule().is_ok());

        d.arrival_date_time = d.depart_date_time;
        assert!(matches!(d.validate_schedule(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let flight = Flight::new(7, details("SQ346"), "owner@example.com", "Owner");
        let json = serde_json::to_value(&flight).unwrap();
        assert_eq!(json["flightNumber"], "SQ346");
        assert!(json.get("departDateTime").is_some());
        assert!(json.get("arrivalDateTime").is_some());
        assert_eq!(json["share"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_share_defaults_to_empty() {
        let json = serde_json::json!({
            "id": 3,
            "flightNumber": "FD354",
            "from": "Singapore",
            "departDateTime": "2023-12-09T17:10:00Z",
            "to": "Bangkok",
            "arrivalDateTime": "2023-12-09T18:40:00Z",
            "email": "owner@example.com",
            "name": "Owner"
        });
        let flight: Flight = serde_json::from_value(json).unwrap();
        assert!(flight.share.is_empty());
    }
}
