// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team collection routes.

use super::route_both;
use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{Team, TeamFilter, TeamPatch, TeamPayload};
use crate::views::{team_view, LookupTables, TeamView};
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
        "/api/teams",
        get(list_teams).post(create_team),
    );
    route_both(
        router,
        "/api/teams/{id}",
        get(get_team)
            .put(replace_team)
            .patch(patch_team)
            .delete(delete_team),
    )
}

async fn find_team(state: &AppState, id: &str) -> Result<Team> {
    state
        .db
        .get_team(id)
        .await?
        .ok_or_else(|| AppError::not_found(collections::TEAMS, id))
}

async fn render(state: &AppState, team: &Team) -> Result<Json<TeamView>> {
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(team_view(team, &lookup)))
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TeamFilter>,
) -> Result<Json<Vec<TeamView>>> {
    let teams = state.db.list_teams(&filter).await?;
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(teams.iter().map(|t| team_view(t, &lookup)).collect()))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<TeamPayload>, AppError>,
) -> Result<(StatusCode, Json<TeamView>)> {
    payload.validate()?;

    let team = state.db.insert_team(Team::new(payload)).await?;
    tracing::info!(team_id = %team.id, name = %team.name, "Team created");

    Ok((StatusCode::CREATED, render(&state, &team).await?))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamView>> {
    let team = find_team(&state, &id).await?;
    render(&state, &team).await
}

async fn replace_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<TeamPayload>, AppError>,
) -> Result<Json<TeamView>> {
    payload.validate()?;

    let mut team = find_team(&state, &id).await?;
    team.replace_with(payload);
    state.db.update_team(&team).await?;

    render(&state, &team).await
}

async fn patch_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<TeamPatch>, AppError>,
) -> Result<Json<TeamView>> {
    patch.validate()?;

    let mut team = find_team(&state, &id).await?;
    team.apply_patch(patch);
    state.db.update_team(&team).await?;

    render(&state, &team).await
}

/// Delete a team. Members keep their now-dangling `team_id`.
async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_team(&id).await?;
    tracing::info!(team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}
