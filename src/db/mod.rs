// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Database`] is the single store client of the process. It is opened
//! once in `main`, shared with every handler through `AppState`, and never
//! closed. Operations here are the itinerary, friend and search-history
//! rules; the backends only provide storage primitives.

pub mod firestore;
pub mod memory;
pub mod seed;

pub use self::firestore::FirestoreBackend;
pub use self::memory::MemoryBackend;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::models::{Flight, FlightDetails, User};
use futures_util::{stream, StreamExt};

/// Collection names as constants.
pub mod collections {
    pub const FLIGHTS: &str = "flights";
    pub const USERS: &str = "users";
    pub const COUNTERS: &str = "counters";
}

/// Sequence names handed to [`Database::next_value`].
pub mod sequences {
    /// Flight ids
    pub const FLIGHTS: &str = "flights";
}

const MAX_CONCURRENT_DB_OPS: usize = 50;

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreBackend),
    Memory(MemoryBackend),
}

/// Store client shared by all request handlers.
#[derive(Clone)]
pub struct Database {
    backend: Option<Backend>,
}

impl Database {
    /// Open the backend selected in the configuration.
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Firestore => Self::connect_firestore(&config.gcp_project_id).await,
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    /// Connect to Firestore (or the emulator if FIRESTORE_EMULATOR_HOST is set).
    pub async fn connect_firestore(project_id: &str) -> Result<Self, AppError> {
        let backend = FirestoreBackend::connect(project_id).await?;
        Ok(Self {
            backend: Some(Backend::Firestore(backend)),
        })
    }

    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Some(Backend::Memory(MemoryBackend::new())),
        }
    }

    /// Create a mock store for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { backend: None }
    }

    /// Helper to get the backend or return an error if offline.
    fn backend(&self) -> Result<&Backend, AppError> {
        self.backend
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Counter Operations ──────────────────────────────────────

    /// Atomically increment the named sequence and return the new value.
    pub async fn next_value(&self, sequence: &str) -> Result<u64, AppError> {
        let value = match self.backend()? {
            Backend::Firestore(fs) => fs.next_value(sequence).await?,
            Backend::Memory(mem) => mem.next_value(sequence),
        };
        tracing::debug!(counter = sequence, value, "Issued sequence value");
        Ok(value)
    }

    /// Overwrite a sequence's current value (seeding only).
    pub async fn set_counter(&self, sequence: &str, value: u64) -> Result<(), AppError> {
        match self.backend()? {
            Backend::Firestore(fs) => fs.set_counter(sequence, value).await,
            Backend::Memory(mem) => {
                mem.set_counter(sequence, value);
                Ok(())
            }
        }
    }

    // ─── Flight Operations ───────────────────────────────────────

    /// Get a flight by id.
    pub async fn get_flight(&self, id: u64) -> Result<Option<Flight>, AppError> {
        match self.backend()? {
            Backend::Firestore(fs) => fs.get_flight(id).await,
            Backend::Memory(mem) => Ok(mem.get_flight(id)),
        }
    }

    /// All flights owned by `email`, ordered by id.
    pub async fn list_flights_by_owner(&self, email: &str) -> Result<Vec<Flight>, AppError> {
        let mut flights = match self.backend()? {
            Backend::Firestore(fs) => fs.flights_owned_by(email).await?,
            Backend::Memory(mem) => mem.flights_owned_by(email),
        };
        flights.sort_by_key(|f| f.id);
        Ok(flights)
    }

    /// All flights, from any owner, shared with `email`, ordered by id.
    pub async fn list_flights_shared_with(&self, email: &str) -> Result<Vec<Flight>, AppError> {
        let mut flights = match self.backend()? {
            Backend::Firestore(fs) => fs.flights_shared_with(email).await?,
            Backend::Memory(mem) => mem.flights_shared_with(email),
        };
        flights.sort_by_key(|f| f.id);
        Ok(flights)
    }

    /// Create a flight with the next id from the `flights` sequence.
    pub async fn create_flight(
        &self,
        details: FlightDetails,
        owner_email: &str,
        owner_name: &str,
    ) -> Result<Flight, AppError> {
        let id = self.next_value(sequences::FLIGHTS).await?;
        let flight = Flight::new(id, details, owner_email, owner_name);
        self.put_flight(&flight).await?;

        tracing::info!(flight_id = id, email = owner_email, "Flight created");
        Ok(flight)
    }

    /// Create or overwrite a flight as-is.
    pub async fn put_flight(&self, flight: &Flight) -> Result<(), AppError> {
        match self.backend()? {
            Backend::Firestore(fs) => fs.put_flight(flight).await,
            Backend::Memory(mem) => {
                mem.put_flight(flight);
                Ok(())
            }
        }
    }

    /// Replace a flight's editable fields.
    ///
    /// Returns `true` only if the flight exists and something changed.
    pub async fn update_flight(&self, id: u64, details: &FlightDetails) -> Result<bool, AppError> {
        let details = details.clone();
        let apply = move |flight: &mut Flight| flight.apply_details(&details);
        let modified = self.modify_flight(id, apply).await?;

        tracing::debug!(flight_id = id, modified, "Flight update");
        Ok(modified)
    }

    /// Replace a flight's share list wholesale.
    ///
    /// Returns `true` only if the flight exists and the list changed.
    pub async fn update_flight_share(&self, id: u64, share: &[String]) -> Result<bool, AppError> {
        let share = share.to_vec();
        let apply = move |flight: &mut Flight| flight.set_share(&share);
        let modified = self.modify_flight(id, apply).await?;

        tracing::debug!(flight_id = id, modified, "Flight share update");
        Ok(modified)
    }

    async fn modify_flight<F>(&self, id: u64, apply: F) -> Result<bool, AppError>
    where
        F: Fn(&mut Flight) -> bool + Clone + Send + Sync + 'static,
    {
        match self.backend()? {
            Backend::Firestore(fs) => fs.modify_flight(id, apply).await,
            Backend::Memory(mem) => Ok(mem.modify_flight(id, apply)),
        }
    }

    /// Delete a flight. Returns the id only if a flight was removed.
    pub async fn delete_flight(&self, id: u64) -> Result<Option<u64>, AppError> {
        let deleted = match self.backend()? {
            Backend::Firestore(fs) => fs.remove_flight(id).await?,
            Backend::Memory(mem) => mem.remove_flight(id),
        };

        if deleted.is_some() {
            tracing::info!(flight_id = id, "Flight deleted");
        }
        Ok(deleted)
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by email.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        match self.backend()? {
            Backend::Firestore(fs) => fs.get_user(email).await,
            Backend::Memory(mem) => Ok(mem.get_user(email)),
        }
    }

    /// Create or overwrite a user as-is.
    pub async fn put_user(&self, user: &User) -> Result<(), AppError> {
        match self.backend()? {
            Backend::Firestore(fs) => fs.put_user(user).await,
            Backend::Memory(mem) => {
                mem.put_user(user);
                Ok(())
            }
        }
    }

    /// Register a user with empty friends and histories.
    ///
    /// If the email is already registered the stored user is returned
    /// unchanged.
    pub async fn add_user(&self, email: &str, name: &str) -> Result<User, AppError> {
        let candidate = User::new(email, name);
        let (stored, inserted) = match self.backend()? {
            Backend::Firestore(fs) => fs.insert_user_if_absent(candidate).await?,
            Backend::Memory(mem) => mem.insert_user_if_absent(candidate),
        };

        if inserted {
            tracing::info!(email, "User registered");
        } else {
            tracing::debug!(email, "User already registered");
        }
        Ok(stored)
    }

    /// Manual sign-in: returns the existing user if the name matches,
    /// registers a new one if the email is unknown.
    pub async fn login(&self, email: &str, name: &str) -> Result<User, AppError> {
        match self.get_user(email).await? {
            Some(existing) if existing.name != name => {
                tracing::debug!(email, "Login rejected: name mismatch");
                Err(AppError::BadRequest("Invalid name".to_string()))
            }
            Some(existing) => Ok(existing),
            None => self.add_user(email, name).await,
        }
    }

    async fn modify_user<F>(&self, email: &str, apply: F) -> Result<User, AppError>
    where
        F: Fn(&mut User) -> Result<(), AppError> + Clone + Send + Sync + 'static,
    {
        match self.backend()? {
            Backend::Firestore(fs) => fs.modify_user(email, apply).await,
            Backend::Memory(mem) => mem.modify_user(email, apply),
        }
    }

    // ─── Friend Operations ───────────────────────────────────────

    /// Add `friend_email` to `user_email`'s friend list.
    pub async fn add_friend(&self, user_email: &str, friend_email: &str) -> Result<User, AppError> {
        if user_email == friend_email {
            return Err(AppError::BadRequest(
                "You cannot add yourself as a friend.".to_string(),
            ));
        }

        let friend = self
            .get_user(friend_email)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend not found on website.".to_string()))?;

        let user = self
            .modify_user(user_email, move |user: &mut User| user.add_friend(&friend))
            .await?;

        tracing::info!(email = user_email, friend = friend_email, "Friend added");
        Ok(user)
    }

    /// Remove `friend_email` from `user_email`'s friend list.
    pub async fn delete_friend(
        &self,
        user_email: &str,
        friend_email: &str,
    ) -> Result<User, AppError> {
        if user_email == friend_email {
            return Err(AppError::BadRequest(
                "You cannot delete yourself as a friend.".to_string(),
            ));
        }

        let friend_email_owned = friend_email.to_string();
        let user = self
            .modify_user(user_email, move |user: &mut User| {
                user.remove_friend(&friend_email_owned)
            })
            .await?;

        tracing::info!(email = user_email, friend = friend_email, "Friend removed");
        Ok(user)
    }

    /// Full user records for every friend of `email`, in friend-list order.
    ///
    /// Friends whose record no longer exists are skipped.
    pub async fn list_friends_detailed(&self, email: &str) -> Result<Vec<User>, AppError> {
        let user = self
            .get_user(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let friends = stream::iter(user.friends)
            .map(|friend| async move { self.get_user(&friend.email).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<User>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<User>>, AppError>>()?;

        Ok(friends.into_iter().flatten().collect())
    }

    // ─── Search History Operations ───────────────────────────────

    /// Record a weather location search (lowercased, most recent first).
    pub async fn push_location_history(&self, email: &str, query: &str) -> Result<User, AppError> {
        let query = query.to_string();
        self.modify_user(email, move |user: &mut User| {
            user.push_location_search(&query)
        })
        .await
    }

    /// Record a flight number search (uppercased, most recent first).
    pub async fn push_flight_history(&self, email: &str, query: &str) -> Result<User, AppError> {
        let query = query.to_string();
        self.modify_user(email, move |user: &mut User| user.push_flight_search(&query))
            .await
    }
}
