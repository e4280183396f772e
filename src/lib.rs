// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OctoFit Tracker: fitness tracking for teams
//!
//! This crate provides the backend REST API for users, teams, logged
//! activities, a calorie leaderboard and suggested workouts.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::EntityStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn EntityStore>,
}
