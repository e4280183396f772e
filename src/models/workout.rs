// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout suggestion catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::{collections, Document};

/// Workout difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry stored in the `workouts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Duration in minutes
    pub duration: u32,
    pub calories_estimate: u32,
    pub category: String,
}

impl Document for Workout {
    const COLLECTION: &'static str = collections::WORKOUTS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WorkoutPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub duration: u32,
    pub calories_estimate: u32,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WorkoutPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<u32>,
    pub calories_estimate: Option<u32>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
}

impl Workout {
    pub fn new(payload: WorkoutPayload) -> Self {
        Self {
            id: String::new(),
            name: payload.name,
            description: payload.description,
            difficulty: payload.difficulty,
            duration: payload.duration,
            calories_estimate: payload.calories_estimate,
            category: payload.category,
        }
    }

    pub fn replace_with(&mut self, payload: WorkoutPayload) {
        let id = std::mem::take(&mut self.id);
        *self = Self::new(payload);
        self.id = id;
    }

    pub fn apply_patch(&mut self, patch: WorkoutPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(calories_estimate) = patch.calories_estimate {
            self.calories_estimate = calories_estimate;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

impl WorkoutFilter {
    pub fn field_conditions(&self) -> Vec<(&'static str, String)> {
        let mut conditions = Vec::new();
        if let Some(difficulty) = self.difficulty {
            conditions.push(("difficulty", difficulty.to_string()));
        }
        if let Some(category) = &self.category {
            conditions.push(("category", category.clone()));
        }
        conditions
    }

    pub fn matches(&self, workout: &Workout) -> bool {
        self.difficulty.is_none_or(|d| workout.difficulty == d)
            && self.category.as_ref().is_none_or(|c| &workout.category == c)
    }

    /// Filter workouts, keeping catalog order.
    pub fn apply(&self, workouts: Vec<Workout>) -> Vec<Workout> {
        workouts.into_iter().filter(|w| self.matches(w)).collect()
    }
}
