// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data for local development.
//!
//! Three users who are all friends with each other and a handful of
//! flights shared between them. The `flights` counter is set to the number
//! of seeded flights so newly created flights continue the sequence.

use crate::db::{sequences, Database};
use crate::error::AppError;
use crate::models::{Flight, Friend, User};
use chrono::{DateTime, NaiveDateTime, Utc};

const TEAM: (&str, &str) = ("it5007team2@gmail.com", "Team 2");
const ALICE: (&str, &str) = ("alice@gmail.com", "Alice");
const BOB: (&str, &str) = ("bob@gmail.com", "Bob");

fn friend((email, name): (&str, &str)) -> Friend {
    Friend {
        email: email.to_string(),
        name: name.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn at(timestamp: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bad seed timestamp {timestamp}: {e}")))
}

/// Users of the demo data set.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            email: TEAM.0.to_string(),
            name: TEAM.1.to_string(),
            friends: vec![friend(ALICE), friend(BOB)],
            search_history_weather: strings(&["penang", "united states", "switzerland"]),
            search_history_flight: strings(&["SQ944", "QF23"]),
        },
        User {
            email: ALICE.0.to_string(),
            name: ALICE.1.to_string(),
            friends: vec![friend(TEAM), friend(BOB)],
            search_history_weather: strings(&["bali", "japan"]),
            search_history_flight: strings(&["SQ118"]),
        },
        User {
            email: BOB.0.to_string(),
            name: BOB.1.to_string(),
            friends: vec![friend(TEAM), friend(ALICE)],
            search_history_weather: strings(&["singapore", "switzerland"]),
            search_history_flight: strings(&["TR302"]),
        },
    ]
}

/// Flights of the demo data set, ids 1 through 5.
pub fn demo_flights() -> Result<Vec<Flight>, AppError> {
    #[rustfmt::skip]
    let rows = [
        (1, "SQ346", "Singapore", "2023-12-01T23:15", "Zurich", "2023-12-02T06:02", TEAM, &[ALICE.0][..]),
        (2, "SQ345", "Zurich", "2023-12-02T11:45", "Singapore", "2023-12-03T05:55", TEAM, &[BOB.0][..]),
        (3, "FD354", "Singapore", "2023-12-09T17:10", "Bangkok", "2023-12-09T18:40", TEAM, &[][..]),
        (4, "CX734", "Singapore", "2023-12-21T16:45", "Hongkong", "2023-12-21T20:45", ALICE, &[TEAM.0, BOB.0][..]),
        (5, "TR652", "Singapore", "2023-12-21T18:20", "Phuket", "2023-12-21T19:20", BOB, &[TEAM.0, ALICE.0][..]),
    ];

    rows.into_iter()
        .map(|(id, number, from, depart, to, arrive, owner, share)| {
            Ok(Flight {
                id,
                flight_number: number.to_string(),
                from: from.to_string(),
                depart_date_time: at(depart)?,
                to: to.to_string(),
                arrival_date_time: at(arrive)?,
                email: owner.0.to_string(),
                name: owner.1.to_string(),
                share: strings(share),
            })
        })
        .collect()
}

/// Write the demo users and flights and reset the flight counter.
///
/// Existing records with the same keys are overwritten.
pub async fn seed_demo_data(db: &Database) -> Result<(), AppError> {
    let users = demo_users();
    for user in &users {
        db.put_user(user).await?;
    }

    let flights = demo_flights()?;
    for flight in &flights {
        db.put_flight(flight).await?;
    }
    db.set_counter(sequences::FLIGHTS, flights.len() as u64)
        .await?;

    tracing::info!(
        users = users.len(),
        flights = flights.len(),
        "Demo data seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_flights_are_well_formed() {
        let flights = demo_flights().unwrap();
        assert_eq!(flights.len(), 5);
        for flight in &flights {
            assert!(flight.depart_date_time < flight.arrival_date_time);
            assert!(!flight.share.contains(&flight.email));
        }
    }

    #[test]
    fn test_demo_friends_exist() {
        let users = demo_users();
        for user in &users {
            for f in &user.friends {
                assert!(users.iter().any(|u| u.email == f.email));
                assert_ne!(f.email, user.email);
            }
        }
    }
}
