// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User, friend and search-history routes.

use crate::error::Result;
use crate::models::User;
use crate::routes::{require_email, ValidatedJson};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/users", post(add_user))
        .route("/api/users/{email}", get(get_user))
        .route("/api/users/{email}/friends", get(get_user_friends).post(add_friend))
        .route(
            "/api/users/{email}/friends/{friend_email}",
            delete(delete_friend),
        )
        .route(
            "/api/users/{email}/history/weather",
            post(add_location_search_history),
        )
        .route(
            "/api/users/{email}/history/flights",
            post(add_flight_search_history),
        )
}

/// Email and display name, used for registration and manual sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendInput {
    #[validate(email)]
    pub friend_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchInput {
    #[validate(length(min = 1, max = 100))]
    pub query: String,
}

// ─── Users ───────────────────────────────────────────────────

/// Get a user; `null` if the email is not registered.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Option<User>>> {
    require_email(&email)?;
    Ok(Json(state.db.get_user(&email).await?))
}

async fn add_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> Result<Json<User>> {
    Ok(Json(
        state.db.add_user(input.email.trim(), input.name.trim()).await?,
    ))
}

/// Sign in with email and name, registering unknown emails.
async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> Result<Json<User>> {
    Ok(Json(
        state.db.login(input.email.trim(), input.name.trim()).await?,
    ))
}

// ─── Friends ─────────────────────────────────────────────────

/// Full records of a user's friends.
async fn get_user_friends(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<User>>> {
    require_email(&email)?;
    Ok(Json(state.db.list_friends_detailed(&email).await?))
}

async fn add_friend(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    ValidatedJson(input): ValidatedJson<FriendInput>,
) -> Result<Json<User>> {
    let email = email.trim();
    require_email(email)?;
    Ok(Json(
        state
            .db
            .add_friend(email, input.friend_email.trim())
            .await?,
    ))
}

async fn delete_friend(
    State(state): State<Arc<AppState>>,
    Path((email, friend_email)): Path<(String, String)>,
) -> Result<Json<User>> {
    let email = email.trim();
    require_email(email)?;
    Ok(Json(
        state
            .db
            .delete_friend(email, friend_email.trim())
            .await?,
    ))
}

// ─── Search History ──────────────────────────────────────────

async fn add_location_search_history(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    ValidatedJson(input): ValidatedJson<SearchInput>,
) -> Result<Json<User>> {
    require_email(&email)?;
    Ok(Json(
        state.db.push_location_history(&email, &input.query).await?,
    ))
}

async fn add_flight_search_history(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    ValidatedJson(input): ValidatedJson<SearchInput>,
) -> Result<Json<User>> {
    require_email(&email)?;
    Ok(Json(
        state.db.push_flight_history(&email, &input.query).await?,
    ))
}
