// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout suggestion routes.

use super::route_both;
use crate::db::collections;
use crate::error::{AppError, Result};
use crate::models::{Workout, WorkoutFilter, WorkoutPatch, WorkoutPayload};
use crate::views::{workout_view, WorkoutView};
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
        "/api/workouts",
        get(list_workouts).post(create_workout),
    );
    route_both(
        router,
        "/api/workouts/{id}",
        get(get_workout)
            .put(replace_workout)
            .patch(patch_workout)
            .delete(delete_workout),
    )
}

async fn find_workout(state: &AppState, id: &str) -> Result<Workout> {
    state
        .db
        .get_workout(id)
        .await?
        .ok_or_else(|| AppError::not_found(collections::WORKOUTS, id))
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<WorkoutFilter>,
) -> Result<Json<Vec<WorkoutView>>> {
    let workouts = state.db.list_workouts(&filter).await?;
    Ok(Json(workouts.iter().map(workout_view).collect()))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<WorkoutPayload>, AppError>,
) -> Result<(StatusCode, Json<WorkoutView>)> {
    payload.validate()?;

    let workout = state.db.insert_workout(Workout::new(payload)).await?;
    tracing::info!(workout_id = %workout.id, difficulty = %workout.difficulty, "Workout created");

    Ok((StatusCode::CREATED, Json(workout_view(&workout))))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>> {
    let workout = find_workout(&state, &id).await?;
    Ok(Json(workout_view(&workout)))
}

async fn replace_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<WorkoutPayload>, AppError>,
) -> Result<Json<WorkoutView>> {
    payload.validate()?;

    let mut workout = find_workout(&state, &id).await?;
    workout.replace_with(payload);
    state.db.update_workout(&workout).await?;

    Ok(Json(workout_view(&workout)))
}

async fn patch_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<WorkoutPatch>, AppError>,
) -> Result<Json<WorkoutView>> {
    patch.validate()?;

    let mut workout = find_workout(&state, &id).await?;
    workout.apply_patch(patch);
    state.db.update_workout(&workout).await?;

    Ok(Json(workout_view(&workout)))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.db.delete_workout(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
