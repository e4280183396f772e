// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{collections, Document};
use crate::models::double_option;

/// Activity types produced by the seed generator.
pub const ACTIVITY_TYPES: [&str; 6] = [
    "Running",
    "Swimming",
    "Cycling",
    "Weight Training",
    "Yoga",
    "Boxing",
];

/// Activity types that cover a distance.
pub const DISTANCE_ACTIVITY_TYPES: [&str; 3] = ["Running", "Cycling", "Swimming"];

/// Logged workout session stored in the `activities` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub id: String,
    /// Weak reference to the owning user
    pub user_id: String,
    /// Free-form type (Running, Yoga, ...)
    pub activity_type: String,
    /// Duration in minutes
    pub duration: u32,
    /// Distance in kilometers, only for distance sports
    #[serde(default)]
    pub distance: Option<f64>,
    pub calories: u32,
    /// When the activity happened
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Document for Activity {
    const COLLECTION: &'static str = collections::ACTIVITIES;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityPayload {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: String,
    pub duration: u32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    pub calories: u32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityPatch {
    #[validate(length(min = 1, max = 100))]
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub activity_type: Option<String>,
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(range(min = 0.0))]
    pub distance: Option<Option<f64>>,
    pub calories: Option<u32>,
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl Activity {
    pub fn new(payload: ActivityPayload) -> Self {
        Self {
            id: String::new(),
            user_id: payload.user_id,
            activity_type: payload.activity_type,
            duration: payload.duration,
            distance: payload.distance,
            calories: payload.calories,
            date: payload.date,
            notes: payload.notes,
        }
    }

    pub fn replace_with(&mut self, payload: ActivityPayload) {
        let id = std::mem::take(&mut self.id);
        *self = Self::new(payload);
        self.id = id;
    }

    pub fn apply_patch(&mut self, patch: ActivityPatch) {
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(activity_type) = patch.activity_type {
            self.activity_type = activity_type;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(distance) = patch.distance {
            self.distance = distance;
        }
        if let Some(calories) = patch.calories {
            self.calories = calories;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub user_id: Option<String>,
    pub activity_type: Option<String>,
}

impl ActivityFilter {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        }
    }

    pub fn field_conditions(&self) -> Vec<(&'static str, String)> {
        let mut conditions = Vec::new();
        if let Some(user_id) = &self.user_id {
            conditions.push(("user_id", user_id.clone()));
        }
        if let Some(activity_type) = &self.activity_type {
            conditions.push(("activity_type", activity_type.clone()));
        }
        conditions
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        self.user_id.as_ref().is_none_or(|u| &activity.user_id == u)
            && self
                .activity_type
                .as_ref()
                .is_none_or(|t| &activity.activity_type == t)
    }

    /// Filter and order activities, most recent first.
    pub fn apply(&self, activities: Vec<Activity>) -> Vec<Activity> {
        let mut activities: Vec<Activity> = activities
            .into_iter()
            .filter(|a| self.matches(a))
            .collect();
        activities.sort_by(|a, b| b.date.cmp(&a.date));
        activities
    }
}
