//! Database layer: the entity store seam and its backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::models::{
    Activity, ActivityFilter, LeaderboardEntry, LeaderboardFilter, Team, TeamFilter, User,
    UserFilter, Workout, WorkoutFilter,
};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TEAMS: &str = "teams";
    pub const ACTIVITIES: &str = "activities";
    pub const LEADERBOARD: &str = "leaderboard";
    pub const WORKOUTS: &str = "workouts";

    pub const ALL: [&str; 5] = [USERS, TEAMS, ACTIVITIES, LEADERBOARD, WORKOUTS];
}

/// A record stored as one document in a named collection.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// Generate a fresh document ID.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Open the store selected by `config`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn EntityStore>> {
    match config.store_backend {
        StoreBackend::Firestore => {
            let db = FirestoreDb::new(&config.gcp_project_id).await?;
            Ok(Arc::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryDb::new()))
        }
    }
}

/// Persistence for the five entity collections.
///
/// Inserts assign a new ID and return the stored record. Updates and deletes
/// of a missing ID fail with `NotFound`. User writes enforce email uniqueness
/// with `DuplicateKey`. Nothing else is checked: references between
/// collections are plain strings.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn update_user(&self, user: &User) -> Result<()>;
    async fn delete_user(&self, id: &str) -> Result<()>;

    // ─── Teams ───────────────────────────────────────────────────
    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>>;
    async fn get_team(&self, id: &str) -> Result<Option<Team>>;
    async fn insert_team(&self, team: Team) -> Result<Team>;
    async fn update_team(&self, team: &Team) -> Result<()>;
    async fn delete_team(&self, id: &str) -> Result<()>;

    // ─── Activities ──────────────────────────────────────────────
    async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>>;
    async fn get_activity(&self, id: &str) -> Result<Option<Activity>>;
    async fn insert_activity(&self, activity: Activity) -> Result<Activity>;
    async fn update_activity(&self, activity: &Activity) -> Result<()>;
    async fn delete_activity(&self, id: &str) -> Result<()>;

    // ─── Leaderboard ─────────────────────────────────────────────
    async fn list_leaderboard(&self, filter: &LeaderboardFilter) -> Result<Vec<LeaderboardEntry>>;
    async fn get_leaderboard_entry(&self, id: &str) -> Result<Option<LeaderboardEntry>>;
    async fn insert_leaderboard_entry(&self, entry: LeaderboardEntry) -> Result<LeaderboardEntry>;
    async fn update_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Result<()>;
    async fn delete_leaderboard_entry(&self, id: &str) -> Result<()>;

    /// Drop every stored entry and store `entries` in their place.
    async fn replace_leaderboard(
        &self,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<Vec<LeaderboardEntry>>;

    // ─── Workouts ────────────────────────────────────────────────
    async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>>;
    async fn get_workout(&self, id: &str) -> Result<Option<Workout>>;
    async fn insert_workout(&self, workout: Workout) -> Result<Workout>;
    async fn update_workout(&self, workout: &Workout) -> Result<()>;
    async fn delete_workout(&self, id: &str) -> Result<()>;

    /// Empty every collection.
    async fn clear_all(&self) -> Result<()>;
}
