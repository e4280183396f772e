// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.
//!
//! Every collection answers both with and without a trailing slash, so
//! clients written against `/api/users/` keep working.

pub mod activities;
pub mod leaderboard;
pub mod teams;
pub mod users;
pub mod workouts;

use crate::AppState;
use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Links to every collection.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ApiRootResponse {
    pub users: String,
    pub teams: String,
    pub activities: String,
    pub leaderboard: String,
    pub workouts: String,
}

async fn api_root(State(state): State<Arc<AppState>>) -> Json<ApiRootResponse> {
    let base = state.config.public_url.trim_end_matches('/');
    let link = |collection: &str| format!("{}/api/{}/", base, collection);

    Json(ApiRootResponse {
        users: link("users"),
        teams: link("teams"),
        activities: link("activities"),
        leaderboard: link("leaderboard"),
        workouts: link("workouts"),
    })
}

/// Route `path` and `path/` to the same handlers.
pub(crate) fn route_both<S>(router: Router<S>, path: &str, handlers: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, handlers.clone())
        .route(&format!("{}/", path), handlers)
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let api = route_both(Router::new(), "/api", get(api_root))
        .merge(users::routes())
        .merge(teams::routes())
        .merge(activities::routes())
        .merge(leaderboard::routes())
        .merge(workouts::routes());

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
