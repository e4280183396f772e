// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard aggregation and ranking.
//!
//! The leaderboard is rebuilt from scratch on every pass:
//! 1. Load all users and all activities
//! 2. Sum each user's activities into one entry
//! 3. Rank entries by total calories, highest first
//! 4. Replace the stored leaderboard with the new entries
//!
//! Two passes running at once can interleave their replace steps. Callers are
//! expected to run one pass at a time.

use std::collections::HashMap;

use crate::db::EntityStore;
use crate::error::Result;
use crate::models::{Activity, ActivityFilter, LeaderboardEntry, User, UserFilter};

/// Per-user totals over a set of activities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserTotals {
    pub total_activities: u32,
    pub total_calories: u64,
    /// Kilometers, rounded to 2 decimals
    pub total_distance: f64,
}

impl UserTotals {
    /// Sum activities. Activities without a distance add nothing to it.
    pub fn from_activities<'a, I>(activities: I) -> Self
    where
        I: IntoIterator<Item = &'a Activity>,
    {
        let mut totals = UserTotals::default();
        let mut distance = 0.0;

        for activity in activities {
            totals.total_activities += 1;
            totals.total_calories += u64::from(activity.calories);
            distance += activity.distance.unwrap_or(0.0);
        }

        totals.total_distance = round_to_hundredths(distance);
        totals
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assign dense ranks by total calories, highest first.
///
/// The sort is stable, so entries with equal calories keep their input order.
pub fn assign_ranks(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.total_calories.cmp(&a.total_calories));
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(position as u32 + 1);
    }
}

/// Build one ranked entry per user, in user order before ranking.
///
/// Activities whose `user_id` matches no user are ignored.
pub fn build_leaderboard(users: &[User], activities: &[Activity]) -> Vec<LeaderboardEntry> {
    let mut by_user: HashMap<&str, Vec<&Activity>> = HashMap::new();
    for activity in activities {
        by_user
            .entry(activity.user_id.as_str())
            .or_default()
            .push(activity);
    }

    let mut entries: Vec<LeaderboardEntry> = users
        .iter()
        .map(|user| {
            let totals = UserTotals::from_activities(
                by_user.get(user.id.as_str()).into_iter().flatten().copied(),
            );
            LeaderboardEntry {
                id: String::new(),
                user_id: user.id.clone(),
                team_id: user.team_id.clone(),
                total_activities: totals.total_activities,
                total_calories: totals.total_calories,
                total_distance: totals.total_distance,
                rank: None,
            }
        })
        .collect();

    assign_ranks(&mut entries);
    entries
}

/// Recompute the whole leaderboard and store it in place of the old one.
pub async fn recompute_leaderboard(db: &dyn EntityStore) -> Result<Vec<LeaderboardEntry>> {
    let users = db.list_users(&UserFilter::default()).await?;
    let activities = db.list_activities(&ActivityFilter::default()).await?;

    tracing::info!(
        users = users.len(),
        activities = activities.len(),
        "Recomputing leaderboard"
    );

    let entries = build_leaderboard(&users, &activities);
    let stored = db.replace_leaderboard(entries).await?;

    tracing::info!(entries = stored.len(), "Leaderboard recomputed");
    Ok(stored)
}
