// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User collection routes.

use super::route_both;
use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{User, UserFilter, UserPatch, UserPayload};
use crate::views::{user_view, LookupTables, UserView};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    let router = route_both(
        Router::new(),
        "/api/users",
        get(list_users).post(create_user),
    );
    route_both(
        router,
        "/api/users/{id}",
        get(get_user)
            .put(replace_user)
            .patch(patch_user)
            .delete(delete_user),
    )
}

async fn find_user(state: &AppState, id: &str) -> Result<User> {
    state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::not_found(collections::USERS, id))
}

async fn render(state: &AppState, user: &User) -> Result<Json<UserView>> {
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(user_view(user, &lookup)))
}

/// List users, optionally filtered by `team_id` or `email`.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<UserView>>> {
    let users = state.db.list_users(&filter).await?;
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(users.iter().map(|u| user_view(u, &lookup)).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<UserPayload>, AppError>,
) -> Result<(StatusCode, Json<UserView>)> {
    payload.validate()?;

    let user = state.db.insert_user(User::new(payload)).await?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, render(&state, &user).await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserView>> {
    let user = find_user(&state, &id).await?;
    render(&state, &user).await
}

async fn replace_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UserPayload>, AppError>,
) -> Result<Json<UserView>> {
    payload.validate()?;

    let mut user = find_user(&state, &id).await?;
    user.replace_with(payload);
    state.db.update_user(&user).await?;

    render(&state, &user).await
}

async fn patch_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<UserPatch>, AppError>,
) -> Result<Json<UserView>> {
    patch.validate()?;

    let mut user = find_user(&state, &id).await?;
    user.apply_patch(patch);
    state.db.update_user(&user).await?;

    render(&state, &user).await
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_user(&id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
