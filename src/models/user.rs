//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::{collections, Document};
use crate::models::{double_option, non_empty};

/// User profile stored in the `users` collection.
///
/// The password is kept exactly as submitted. It is write-only at the API
/// boundary and never appears in a view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned document ID
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Unique across all users
    pub email: String,
    pub password: String,
    /// Weak reference to a team document
    #[serde(default)]
    pub team_id: Option<String>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = collections::USERS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Body of a user create or full update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub team_id: Option<String>,
}

/// Body of a partial user update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 100))]
    pub team_id: Option<Option<String>>,
}

impl User {
    /// Build a new, not yet stored, user.
    pub fn new(payload: UserPayload) -> Self {
        Self {
            id: String::new(),
            name: payload.name,
            email: payload.email,
            password: payload.password,
            team_id: non_empty(payload.team_id),
            created_at: Utc::now(),
        }
    }

    /// Replace every writable field, keeping id and creation time.
    pub fn replace_with(&mut self, payload: UserPayload) {
        self.name = payload.name;
        self.email = payload.email;
        self.password = payload.password;
        self.team_id = non_empty(payload.team_id);
    }

    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = non_empty(team_id);
        }
    }
}

/// Exact-match filters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub team_id: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn by_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    /// Equality conditions a document store can evaluate server-side.
    pub fn field_conditions(&self) -> Vec<(&'static str, String)> {
        let mut conditions = Vec::new();
        if let Some(team_id) = &self.team_id {
            conditions.push(("team_id", team_id.clone()));
        }
        if let Some(email) = &self.email {
            conditions.push(("email", email.clone()));
        }
        conditions
    }

    pub fn matches(&self, user: &User) -> bool {
        self.team_id
            .as_ref()
            .is_none_or(|t| user.team_id.as_ref() == Some(t))
            && self.email.as_ref().is_none_or(|e| &user.email == e)
    }

    /// Filter and order users: oldest first, ties kept in store order.
    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let mut users: Vec<User> = users.into_iter().filter(|u| self.matches(u)).collect();
        users.sort_by_key(|u| u.created_at);
        users
    }
}
