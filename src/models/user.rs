// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use crate::error::AppError;
use crate::models::history::{normalize_flight_query, normalize_location_query, push_recent};
use serde::{Deserialize, Serialize};

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Email address (primary key)
    pub email: String,
    /// Display name
    pub name: String,
    /// Friends in the order they were added
    #[serde(default)]
    pub friends: Vec<Friend>,
    /// Weather location searches, most recent first
    #[serde(default)]
    pub search_history_weather: Vec<String>,
    /// Flight number searches, most recent first
    #[serde(default)]
    pub search_history_flight: Vec<String>,
}

/// Friend entry embedded in a user's friend list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub email: String,
    pub name: String,
}

impl User {
    /// A freshly registered user with no friends and empty histories.
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            friends: Vec::new(),
            search_history_weather: Vec::new(),
            search_history_flight: Vec::new(),
        }
    }

    pub fn has_friend(&self, email: &str) -> bool {
        self.friends.iter().any(|f| f.email == email)
    }

    /// Append `friend` to the friend list.
    pub fn add_friend(&mut self, friend: &User) -> Result<(), AppError> {
        if friend.email == self.email {
            return Err(AppError::BadRequest(
                "You cannot add yourself as a friend.".to_string(),
            ));
        }
        if self.has_friend(&friend.email) {
            return Err(AppError::BadRequest(
                "This email is already part of your friends list.".to_string(),
            ));
        }
        self.friends.push(Friend {
            email: friend.email.clone(),
            name: friend.name.clone(),
        });
        Ok(())
    }

    /// Remove the friend entry for `email`.
    pub fn remove_friend(&mut self, email: &str) -> Result<(), AppError> {
        if email == self.email {
            return Err(AppError::BadRequest(
                "You cannot delete yourself as a friend.".to_string(),
            ));
        }
        let index = self
            .friends
            .iter()
            .position(|f| f.email == email)
            .ok_or_else(|| {
                AppError::NotFound("Friend not found in your friends list.".to_string())
            })?;
        self.friends.remove(index);
        Ok(())
    }

    /// Record a weather location search.
    pub fn push_location_search(&mut self, query: &str) -> Result<(), AppError> {
        let entry = normalize_location_query(query);
        if entry.is_empty() {
            return Err(AppError::BadRequest("Search query is empty".to_string()));
        }
        push_recent(&mut self.search_history_weather, entry);
        Ok(())
    }

    /// Record a flight number search.
    pub fn push_flight_search(&mut self, query: &str) -> Result<(), AppError> {
        let entry = normalize_flight_query(query);
        if entry.is_empty() {
            return Err(AppError::BadRequest("Search query is empty".to_string()));
        }
        push_recent(&mut self.search_history_flight, entry);
        Ok(())
    }
}
