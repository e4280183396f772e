// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API representations of stored records.
//!
//! Views add fields resolved from other collections: team names, user names,
//! fitness level and team member counts. They are computed for every
//! response and never stored. A reference that points nowhere resolves to a
//! fixed fallback instead of an error.

use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::EntityStore;
use crate::error::Result;
use crate::models::{
    Activity, Difficulty, LeaderboardEntry, LeaderboardFilter, Team, TeamFilter, User, UserFilter,
    Workout,
};
use crate::time_utils::format_utc_rfc3339;

/// Shown in place of the name of a user that does not exist.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Cross-collection lookups needed to build views.
pub trait EntityLookup {
    fn team_name(&self, team_id: &str) -> Option<&str>;
    fn user_name(&self, user_id: &str) -> Option<&str>;
    /// Total calories on the user's leaderboard entry, if it has one.
    fn leaderboard_calories(&self, user_id: &str) -> Option<u64>;
    /// Number of users whose `team_id` is `team_id`.
    fn member_count(&self, team_id: &str) -> u32;
}

/// Fitness tier derived from leaderboard calories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub const INTERMEDIATE_CALORIES: u64 = 5000;
    pub const ADVANCED_CALORIES: u64 = 7000;

    pub fn from_total_calories(total_calories: u64) -> Self {
        if total_calories >= Self::ADVANCED_CALORIES {
            FitnessLevel::Advanced
        } else if total_calories >= Self::INTERMEDIATE_CALORIES {
            FitnessLevel::Intermediate
        } else {
            FitnessLevel::Beginner
        }
    }
}

/// Snapshot of the lookup data, loaded once per request.
#[derive(Debug, Default)]
pub struct LookupTables {
    team_names: HashMap<String, String>,
    user_names: HashMap<String, String>,
    calories: HashMap<String, u64>,
    member_counts: HashMap<String, u32>,
}

impl LookupTables {
    /// Load teams, users and leaderboard entries from the store.
    pub async fn load(db: &dyn EntityStore) -> Result<Self> {
        let teams = db.list_teams(&TeamFilter::default()).await?;
        let users = db.list_users(&UserFilter::default()).await?;
        let entries = db.list_leaderboard(&LeaderboardFilter::default()).await?;
        Ok(Self::from_records(&teams, &users, &entries))
    }

    /// Build from already loaded records.
    ///
    /// `entries` should be in rank order: when a user has several entries the
    /// first one wins.
    pub fn from_records(teams: &[Team], users: &[User], entries: &[LeaderboardEntry]) -> Self {
        let team_names = teams
            .iter()
            .map(|t| (t.id.clone(), t.name.clone()))
            .collect();

        let user_names = users
            .iter()
            .map(|u| (u.id.clone(), u.name.clone()))
            .collect();

        let mut member_counts: HashMap<String, u32> = HashMap::new();
        for team_id in users.iter().filter_map(|u| u.team_id.as_ref()) {
            *member_counts.entry(team_id.clone()).or_insert(0) += 1;
        }

        let mut calories = HashMap::new();
        for entry in entries {
            calories
                .entry(entry.user_id.clone())
                .or_insert(entry.total_calories);
        }

        Self {
            team_names,
            user_names,
            calories,
            member_counts,
        }
    }
}

impl EntityLookup for LookupTables {
    fn team_name(&self, team_id: &str) -> Option<&str> {
        self.team_names.get(team_id).map(String::as_str)
    }

    fn user_name(&self, user_id: &str) -> Option<&str> {
        self.user_names.get(user_id).map(String::as_str)
    }

    fn leaderboard_calories(&self, user_id: &str) -> Option<u64> {
        self.calories.get(user_id).copied()
    }

    fn member_count(&self, team_id: &str) -> u32 {
        self.member_counts.get(team_id).copied().unwrap_or(0)
    }
}

// ─── Views ───────────────────────────────────────────────────

/// User as returned by the API. Never includes the password.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub fitness_level: FitnessLevel,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub member_count: u32,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityView {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub activity_type: String,
    pub duration: u32,
    pub distance: Option<f64>,
    pub calories: u32,
    pub date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardView {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub total_activities: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_calories: u64,
    pub total_distance: f64,
    pub rank: Option<u32>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: u32,
    pub calories_estimate: u32,
    pub category: String,
}

fn resolve_team_name(lookup: &impl EntityLookup, team_id: Option<&str>) -> Option<String> {
    team_id
        .and_then(|id| lookup.team_name(id))
        .map(String::from)
}

fn resolve_user_name(lookup: &impl EntityLookup, user_id: &str) -> String {
    lookup.user_name(user_id).unwrap_or(UNKNOWN_USER).to_string()
}

pub fn user_view(user: &User, lookup: &impl EntityLookup) -> UserView {
    let fitness_level = lookup
        .leaderboard_calories(&user.id)
        .map(FitnessLevel::from_total_calories)
        .unwrap_or(FitnessLevel::Beginner);

    UserView {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        team_id: user.team_id.clone(),
        team_name: resolve_team_name(lookup, user.team_id.as_deref()),
        fitness_level,
        created_at: format_utc_rfc3339(user.created_at),
    }
}

pub fn team_view(team: &Team, lookup: &impl EntityLookup) -> TeamView {
    TeamView {
        id: team.id.clone(),
        name: team.name.clone(),
        description: team.description.clone(),
        member_count: lookup.member_count(&team.id),
        created_at: format_utc_rfc3339(team.created_at),
    }
}

pub fn activity_view(activity: &Activity, lookup: &impl EntityLookup) -> ActivityView {
    ActivityView {
        id: activity.id.clone(),
        user_id: activity.user_id.clone(),
        user_name: resolve_user_name(lookup, &activity.user_id),
        activity_type: activity.activity_type.clone(),
        duration: activity.duration,
        distance: activity.distance,
        calories: activity.calories,
        date: format_utc_rfc3339(activity.date),
        notes: activity.notes.clone(),
    }
}

pub fn leaderboard_view(entry: &LeaderboardEntry, lookup: &impl EntityLookup) -> LeaderboardView {
    LeaderboardView {
        id: entry.id.clone(),
        user_id: entry.user_id.clone(),
        user_name: resolve_user_name(lookup, &entry.user_id),
        team_id: entry.team_id.clone(),
        team_name: resolve_team_name(lookup, entry.team_id.as_deref()),
        total_activities: entry.total_activities,
        total_calories: entry.total_calories,
        total_distance: entry.total_distance,
        rank: entry.rank,
    }
}

/// Workouts reference nothing, so no lookup is needed.
pub fn workout_view(workout: &Workout) -> WorkoutView {
    WorkoutView {
        id: workout.id.clone(),
        name: workout.name.clone(),
        description: workout.description.clone(),
        difficulty: workout.difficulty,
        duration: workout.duration,
        calories_estimate: workout.calories_estimate,
        category: workout.category.clone(),
    }
}
