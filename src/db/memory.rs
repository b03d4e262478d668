// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process backend for local development and tests.
//!
//! Documents live in concurrent maps. Read-modify-write operations run
//! while holding the entry lock of the document they change, which gives
//! the same per-document atomicity as the Firestore transactions.

use crate::error::AppError;
use crate::models::{Flight, User};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    counters: DashMap<String, u64>,
    flights: DashMap<u64, Flight>,
    users: DashMap<String, User>,
}

/// In-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Counter Operations ──────────────────────────────────────

    pub fn next_value(&self, name: &str) -> u64 {
        let mut current = self.inner.counters.entry(name.to_string()).or_insert_with(|| {
            tracing::warn!(counter = %name, "Counter missing, starting at zero");
            0
        });
        *current += 1;
        *current
    }

    pub fn set_counter(&self, name: &str, value: u64) {
        self.inner.counters.insert(name.to_string(), value);
    }

    // ─── Flight Operations ───────────────────────────────────────

    pub fn get_flight(&self, id: u64) -> Option<Flight> {
        self.inner.flights.get(&id).map(|f| f.value().clone())
    }

    pub fn flights_owned_by(&self, email: &str) -> Vec<Flight> {
        self.flights_matching(|f| f.email == email)
    }

    pub fn flights_shared_with(&self, email: &str) -> Vec<Flight> {
        self.flights_matching(|f| f.is_shared_with(email))
    }

    fn flights_matching(&self, predicate: impl Fn(&Flight) -> bool) -> Vec<Flight> {
        self.inner
            .flights
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn put_flight(&self, flight: &Flight) {
        self.inner.flights.insert(flight.id, flight.clone());
    }

    pub fn modify_flight<F>(&self, id: u64, apply: F) -> bool
    where
        F: Fn(&mut Flight) -> bool,
    {
        match self.inner.flights.get_mut(&id) {
            Some(mut flight) => apply(flight.value_mut()),
            None => false,
        }
    }

    pub fn remove_flight(&self, id: u64) -> Option<u64> {
        self.inner.flights.remove(&id).map(|(id, _)| id)
    }

    // ─── User Operations ─────────────────────────────────────────

    pub fn get_user(&self, email: &str) -> Option<User> {
        self.inner.users.get(email).map(|u| u.value().clone())
    }

    pub fn put_user(&self, user: &User) {
        self.inner.users.insert(user.email.clone(), user.clone());
    }

    /// Returns the stored user and whether it was inserted by this call.
    pub fn insert_user_if_absent(&self, user: User) -> (User, bool) {
        match self.inner.users.entry(user.email.clone()) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => (slot.insert(user).value().clone(), true),
        }
    }

    pub fn modify_user<F>(&self, email: &str, apply: F) -> Result<User, AppError>
    where
        F: Fn(&mut User) -> Result<(), AppError>,
    {
        let mut stored = self
            .inner
            .users
            .get_mut(email)
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        // Apply to a copy so a rejected change leaves the record untouched
        let mut updated = stored.value().clone();
        apply(&mut updated)?;
        *stored = updated.clone();
        Ok(updated)
    }
}
