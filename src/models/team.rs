//! Team model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{collections, Document};
use crate::models::double_option;

/// Team stored in the `teams` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document for Team {
    const COLLECTION: &'static str = collections::TEAMS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeamPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeamPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl Team {
    pub fn new(payload: TeamPayload) -> Self {
        Self {
            id: String::new(),
            name: payload.name,
            description: payload.description,
            created_at: Utc::now(),
        }
    }

    pub fn replace_with(&mut self, payload: TeamPayload) {
        self.name = payload.name;
        self.description = payload.description;
    }

    pub fn apply_patch(&mut self, patch: TeamPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamFilter {
    pub name: Option<String>,
}

impl TeamFilter {
    pub fn field_conditions(&self) -> Vec<(&'static str, String)> {
        self.name
            .iter()
            .map(|name| ("name", name.clone()))
            .collect()
    }

    pub fn matches(&self, team: &Team) -> bool {
        self.name.as_ref().is_none_or(|n| &team.name == n)
    }

    /// Filter and order teams, oldest first.
    pub fn apply(&self, teams: Vec<Team>) -> Vec<Team> {
        let mut teams: Vec<Team> = teams.into_iter().filter(|t| self.matches(t)).collect();
        teams.sort_by_key(|t| t.created_at);
        teams
    }
}
