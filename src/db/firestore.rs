// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore backend with typed operations.
//!
//! Provides storage primitives for:
//! - Counters (named sequences)
//! - Flights (keyed by sequence id)
//! - Users (keyed by URL-encoded email)
//!
//! Every read-modify-write runs inside a Firestore transaction. The client
//! retries the transaction when a document it read changed before commit,
//! so concurrent updates to the same user or flight are never lost.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Counter, Flight, User};
use futures_util::FutureExt;

/// Document ID for a user. Emails may contain characters Firestore does not
/// accept in IDs, so they are URL-encoded.
pub fn user_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Firestore-backed store.
#[derive(Clone)]
pub struct FirestoreBackend {
    client: firestore::FirestoreDb,
}

impl FirestoreBackend {
    /// Connect to Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Connect to the emulator with unauthenticated access.
    async fn connect_emulator(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Counter Operations ──────────────────────────────────────

    /// Atomically increment the named counter and return the new value.
    ///
    /// A missing counter document is created at zero, so the first value
    /// handed out is 1.
    pub async fn next_value(&self, name: &str) -> Result<u64, AppError> {
        let name = name.to_string();

        self.client
            .run_transaction(|db, transaction| {
                let name = name.clone();
                async move {
                    let current: Option<Counter> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COUNTERS)
                        .obj()
                        .one(&name)
                        .await?;

                    let mut counter = current.unwrap_or_else(|| {
                        tracing::warn!(counter = %name, "Counter document missing, starting at zero");
                        Counter::new(&name)
                    });
                    counter.current += 1;

                    db.fluent()
                        .update()
                        .in_col(collections::COUNTERS)
                        .document_id(&name)
                        .object(&counter)
                        .add_to_transaction(transaction)?;

                    Ok(counter.current)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Counter {} increment failed: {}", name, e)))
    }

    /// Overwrite a counter's current value.
    pub async fn set_counter(&self, name: &str, value: u64) -> Result<(), AppError> {
        let counter = Counter {
            name: name.to_string(),
            current: value,
        };
        let _: Counter = self
            .client
            .fluent()
            .update()
            .in_col(collections::COUNTERS)
            .document_id(name)
            .object(&counter)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Flight Operations ───────────────────────────────────────

    /// Get a flight by id.
    pub async fn get_flight(&self, id: u64) -> Result<Option<Flight>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::FLIGHTS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All flights owned by `email`.
    pub async fn flights_owned_by(&self, email: &str) -> Result<Vec<Flight>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::FLIGHTS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All flights whose share list contains `email` (server-side filter).
    pub async fn flights_shared_with(&self, email: &str) -> Result<Vec<Flight>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::FLIGHTS)
            .filter(|q| q.for_all([q.field("share").array_contains(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a flight.
    pub async fn put_flight(&self, flight: &Flight) -> Result<(), AppError> {
        let _: Flight = self
            .client
            .fluent()
            .update()
            .in_col(collections::FLIGHTS)
            .document_id(flight.id.to_string())
            .object(flight)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read a flight, apply `apply`, and write it back if it reported a change.
    ///
    /// Returns `false` when the flight does not exist or nothing changed.
    pub async fn modify_flight<F>(&self, id: u64, apply: F) -> Result<bool, AppError>
    where
        F: Fn(&mut Flight) -> bool + Clone + Send + Sync + 'static,
    {
        self.client
            .run_transaction(|db, transaction| {
                let apply = apply.clone();
                async move {
                    let current: Option<Flight> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::FLIGHTS)
                        .obj()
                        .one(&id.to_string())
                        .await?;

                    let Some(mut flight) = current else {
                        return Ok(false);
                    };
                    if !apply(&mut flight) {
                        return Ok(false);
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::FLIGHTS)
                        .document_id(id.to_string())
                        .object(&flight)
                        .add_to_transaction(transaction)?;

                    Ok(true)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Flight {} update failed: {}", id, e)))
    }

    /// Delete a flight. Returns the id only if a document was removed.
    pub async fn remove_flight(&self, id: u64) -> Result<Option<u64>, AppError> {
        self.client
            .run_transaction(|db, transaction| {
                async move {
                    let current: Option<Flight> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::FLIGHTS)
                        .obj()
                        .one(&id.to_string())
                        .await?;

                    if current.is_none() {
                        return Ok(None);
                    }

                    db.fluent()
                        .delete()
                        .from(collections::FLIGHTS)
                        .document_id(id.to_string())
                        .add_to_transaction(transaction)?;

                    Ok(Some(id))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Flight {} delete failed: {}", id, e)))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by email.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&user_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a user.
    pub async fn put_user(&self, user: &User) -> Result<(), AppError> {
        let _: User = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_doc_id(&user.email))
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Store `user` unless a user with that email exists; return whichever
    /// record is now stored.
    pub async fn insert_user_if_absent(&self, user: User) -> Result<(User, bool), AppError> {
        let doc_id = user_doc_id(&user.email);

        self.client
            .run_transaction(|db, transaction| {
                let user = user.clone();
                let doc_id = doc_id.clone();
                async move {
                    let existing: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&doc_id)
                        .await?;

                    if let Some(existing) = existing {
                        return Ok((existing, false));
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&doc_id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok((user, true))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User insert failed: {}", e)))
    }

    /// Read a user, apply `apply`, and write the result back in one
    /// transaction. Errors from `apply` abort without writing.
    pub async fn modify_user<F>(&self, email: &str, apply: F) -> Result<User, AppError>
    where
        F: Fn(&mut User) -> Result<(), AppError> + Clone + Send + Sync + 'static,
    {
        let doc_id = user_doc_id(email);

        let outcome = self
            .client
            .run_transaction(|db, transaction| {
                let apply = apply.clone();
                let doc_id = doc_id.clone();
                async move {
                    let current: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&doc_id)
                        .await?;

                    let Some(mut user) = current else {
                        return Ok(Err(AppError::NotFound("User not found.".to_string())));
                    };
                    if let Err(e) = apply(&mut user) {
                        return Ok(Err(e));
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .document_id(&doc_id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(user))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("User update failed: {}", e)))?;

        outcome
    }
}
