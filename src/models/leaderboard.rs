//! Leaderboard entries: per-user aggregates with a point-in-time rank.
//!
//! Entries are a derived cache. The ranking pass in
//! [`crate::services::ranking`] replaces the whole collection; nothing updates
//! them when activities change.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{collections, Document};
use crate::models::{double_option, non_empty};

/// Leaderboard entry stored in the `leaderboard` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub total_calories: u64,
    /// Kilometers, rounded to 2 decimals by the ranking pass
    #[serde(default)]
    pub total_distance: f64,
    /// 1-based position by total calories; `None` until ranked
    #[serde(default)]
    pub rank: Option<u32>,
}

impl Document for LeaderboardEntry {
    const COLLECTION: &'static str = collections::LEADERBOARD;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeaderboardPayload {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub team_id: Option<String>,
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub total_calories: u64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_distance: f64,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LeaderboardPatch {
    #[validate(length(min = 1, max = 100))]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 100))]
    pub team_id: Option<Option<String>>,
    pub total_activities: Option<u32>,
    pub total_calories: Option<u64>,
    #[validate(range(min = 0.0))]
    pub total_distance: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 1))]
    pub rank: Option<Option<u32>>,
}

impl LeaderboardEntry {
    pub fn new(payload: LeaderboardPayload) -> Self {
        Self {
            id: String::new(),
            user_id: payload.user_id,
            team_id: non_empty(payload.team_id),
            total_activities: payload.total_activities,
            total_calories: payload.total_calories,
            total_distance: payload.total_distance,
            rank: payload.rank,
        }
    }

    pub fn replace_with(&mut self, payload: LeaderboardPayload) {
        let id = std::mem::take(&mut self.id);
        *self = Self::new(payload);
        self.id = id;
    }

    pub fn apply_patch(&mut self, patch: LeaderboardPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = non_empty(team_id);
        }
        if let Some(total_activities) = patch.total_activities {
            self.total_activities = total_activities;
        }
        if let Some(total_calories) = patch.total_calories {
            self.total_calories = total_calories;
        }
        if let Some(total_distance) = patch.total_distance {
            self.total_distance = total_distance;
        }
        if let Some(rank) = patch.rank {
            self.rank = rank;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardFilter {
    pub user_id: Option<String>,
    pub team_id: Option<String>,
}

impl LeaderboardFilter {
    pub fn field_conditions(&self) -> Vec<(&'static str, String)> {
        let mut conditions = Vec::new();
        if let Some(user_id) = &self.user_id {
            conditions.push(("user_id", user_id.clone()));
        }
        if let Some(team_id) = &self.team_id {
            conditions.push(("team_id", team_id.clone()));
        }
        conditions
    }

    pub fn matches(&self, entry: &LeaderboardEntry) -> bool {
        self.user_id.as_ref().is_none_or(|u| &entry.user_id == u)
            && self
                .team_id
                .as_ref()
                .is_none_or(|t| entry.team_id.as_ref() == Some(t))
    }

    /// Filter and order entries by rank; unranked entries go last.
    pub fn apply(&self, entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> =
            entries.into_iter().filter(|e| self.matches(e)).collect();
        entries.sort_by_key(|e| e.rank.unwrap_or(u32::MAX));
        entries
    }
}
