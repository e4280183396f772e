// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity log routes.
//!
//! Writing an activity does not touch the leaderboard; totals only change
//! on the next recompute.

use super::route_both;
use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityFilter, ActivityPatch, ActivityPayload};
use crate::views::{activity_view, ActivityView, LookupTables};
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
        "/api/activities",
        get(list_activities).post(create_activity),
    );
    route_both(
        router,
        "/api/activities/{id}",
        get(get_activity)
            .put(replace_activity)
            .patch(patch_activity)
            .delete(delete_activity),
    )
}

async fn find_activity(state: &AppState, id: &str) -> Result<Activity> {
    state
        .db
        .get_activity(id)
        .await?
        .ok_or_else(|| AppError::not_found(collections::ACTIVITIES, id))
}

async fn render(state: &AppState, activity: &Activity) -> Result<Json<ActivityView>> {
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(activity_view(activity, &lookup)))
}

/// List activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ActivityFilter>,
) -> Result<Json<Vec<ActivityView>>> {
    let activities = state.db.list_activities(&filter).await?;
    let lookup = LookupTables::load(state.db.as_ref()).await?;
    Ok(Json(
        activities
            .iter()
            .map(|a| activity_view(a, &lookup))
            .collect(),
    ))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<ActivityPayload>, AppError>,
) -> Result<(StatusCode, Json<ActivityView>)> {
    payload.validate()?;

    let activity = state.db.insert_activity(Activity::new(payload)).await?;
    tracing::info!(
        activity_id = %activity.id,
        user_id = %activity.user_id,
        calories = activity.calories,
        "Activity logged"
    );

    Ok((StatusCode::CREATED, render(&state, &activity).await?))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityView>> {
    let activity = find_activity(&state, &id).await?;
    render(&state, &activity).await
}

async fn replace_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ActivityPayload>, AppError>,
) -> Result<Json<ActivityView>> {
    payload.validate()?;

    let mut activity = find_activity(&state, &id).await?;
    activity.replace_with(payload);
    state.db.update_activity(&activity).await?;

    render(&state, &activity).await
}

async fn patch_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<ActivityPatch>, AppError>,
) -> Result<Json<ActivityView>> {
    patch.validate()?;

    let mut activity = find_activity(&state, &id).await?;
    activity.apply_patch(patch);
    state.db.update_activity(&activity).await?;

    render(&state, &activity).await
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_activity(&id).await?;
    tracing::info!(activity_id = %id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}
