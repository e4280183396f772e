// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard routes.
//!
//! Entries can be edited directly like any other collection, but the usual
//! way to fill the leaderboard is `POST /api/leaderboard/recompute`, which
//! rebuilds it from users and activities.

use super::route_both;
use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{LeaderboardEntry, LeaderboardFilter, LeaderboardPatch, LeaderboardPayload};
use crate::services::recompute_leaderboard;
use crate::views::{leaderboard_view, LeaderboardView, LookupTables};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    let router = route_both(
        Router::new(),
        "/api/leaderboard",
        get(list_entries).post(create_entry),
    );
    let router = route_both(router, "/api/leaderboard/recompute", post(recompute));
    route_both(
        router,
        "/api/leaderboard/{id}",
        get(get_entry)
            .put(replace_entry)
            .patch(patch_entry)
            .delete(delete_entry),
    )
}

async fn find_entry(state: &AppState, id: &str) -> Result<LeaderboardEntry> {
    state
        .db
        .get_leaderboard_entry(id)
        .await?
        .ok_or_else(|| AppError::not_found(collections::LEADERBOARD, id))
}

async fn render_all(
    state: &AppState,
    entries: &[LeaderboardEntry],
) -> Result<Json<Vec<LeaderboardView>>> {
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(
        entries
            .iter()
            .map(|e| leaderboard_view(e, &lookup))
            .collect(),
    ))
}

async fn render(state: &AppState, entry: &LeaderboardEntry) -> Result<Json<LeaderboardView>> {
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(leaderboard_view(entry, &lookup)))
}

/// List entries in rank order, unranked entries last.
async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<LeaderboardFilter>,
) -> Result<Json<Vec<LeaderboardView>>> {
    let entries = state.db.list_leaderboard(&filter).await?;
    render_all(&state, &entries).await
}

/// Rebuild the leaderboard and return it in rank order.
async fn recompute(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardView>>> {
    let entries = recompute_leaderboard(state.db.as_ref()).await?;
    render_all(&state, &entries).await
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<LeaderboardPayload>, AppError>,
) -> Result<(StatusCode, Json<LeaderboardView>)> {
    payload.validate()?;

    let entry = state
        .db
        .insert_leaderboard_entry(LeaderboardEntry::new(payload))
        .await?;
    tracing::info!(entry_id = %entry.id, user_id = %entry.user_id, "Leaderboard entry created");

    Ok((StatusCode::CREATED, render(&state, &entry).await?))
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeaderboardView>> {
    let entry = find_entry(&state, &id).await?;
    render(&state, &entry).await
}

async fn replace_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<LeaderboardPayload>, AppError>,
) -> Result<Json<LeaderboardView>> {
    payload.validate()?;

    let mut entry = find_entry(&state, &id).await?;
    entry.replace_with(payload);
    state.db.update_leaderboard_entry(&entry).await?;

    render(&state, &entry).await
}

async fn patch_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<LeaderboardPatch>, AppError>,
) -> Result<Json<LeaderboardView>> {
    patch.validate()?;

    let mut entry = find_entry(&state, &id).await?;
    entry.apply_patch(patch);
    state.db.update_leaderboard_entry(&entry).await?;

    render(&state, &entry).await
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_leaderboard_entry(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
