// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.
//!
//! Each entity has a stored record, a full write payload (create and PUT), a
//! partial patch (PATCH) and a list filter.

pub mod activity;
pub mod leaderboard;
pub mod team;
pub mod user;
pub mod workout;

pub use activity::{Activity, ActivityFilter, ActivityPatch, ActivityPayload};
pub use leaderboard::{LeaderboardEntry, LeaderboardFilter, LeaderboardPatch, LeaderboardPayload};
pub use team::{Team, TeamFilter, TeamPatch, TeamPayload};
pub use user::{User, UserFilter, UserPatch, UserPayload};
pub use workout::{Difficulty, Workout, WorkoutFilter, WorkoutPatch, WorkoutPayload};

use serde::{Deserialize, Deserializer};

/// Treat an empty reference as no reference.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Deserialize a nullable PATCH field.
///
/// * JSON field absent  => `None`          (keep)
/// * JSON field = null  => `Some(None)`    (clear)
/// * JSON field = value => `Some(Some(v))` (set)
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
