// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Each entity lives in its own collection, keyed by the record's `id`.
//! List filters are pushed down as equality conditions; ordering is applied
//! after the fetch so no composite indexes are needed.

use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::Deserialize;

use crate::db::{collections, new_document_id, Document, EntityStore};
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityFilter, LeaderboardEntry, LeaderboardFilter, Team, TeamFilter, User,
    UserFilter, Workout, WorkoutFilter,
};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Only the `id` field, for bulk deletes.
#[derive(Deserialize)]
struct DocId {
    #[serde(default)]
    id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Operations ─────────────────────────────

    async fn get_doc<T: Document>(&self, id: &str) -> Result<Option<T>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(T::COLLECTION)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch all documents of a collection matching every `(field, value)` pair.
    async fn list_docs<T: Document>(
        &self,
        conditions: Vec<(&'static str, String)>,
    ) -> Result<Vec<T>> {
        self.get_client()?
            .fluent()
            .select()
            .from(T::COLLECTION)
            .filter(move |q| {
                q.for_all(
                    conditions
                        .iter()
                        .map(|(field, value)| q.field(*field).eq(value.clone())),
                )
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_doc<T: Document>(&self, doc: &T) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(T::COLLECTION)
            .document_id(doc.id())
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn insert_doc<T: Document>(&self, mut doc: T) -> Result<T> {
        doc.set_id(new_document_id());
        self.upsert_doc(&doc).await?;
        tracing::debug!(collection = T::COLLECTION, id = doc.id(), "Inserted document");
        Ok(doc)
    }

    async fn update_doc<T: Document>(&self, doc: &T) -> Result<()> {
        if self.get_doc::<T>(doc.id()).await?.is_none() {
            return Err(AppError::not_found(T::COLLECTION, doc.id()));
        }
        self.upsert_doc(doc).await
    }

    async fn delete_doc<T: Document>(&self, id: &str) -> Result<()> {
        if self.get_doc::<T>(id).await?.is_none() {
            return Err(AppError::not_found(T::COLLECTION, id));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(T::COLLECTION)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(collection = T::COLLECTION, id, "Deleted document");
        Ok(())
    }

    /// Reject `user` if another stored user already has its email.
    ///
    /// Firestore has no unique indexes, so this is a read followed by a write.
    async fn ensure_email_free(&self, user: &User) -> Result<()> {
        let holders: Vec<User> = self
            .list_docs(UserFilter::by_email(&user.email).field_conditions())
            .await?;
        if holders.iter().any(|u| u.id != user.id) {
            return Err(AppError::DuplicateKey(format!(
                "email {} is already in use",
                user.email
            )));
        }
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete(&self, collection: &str, ids: &[String]) -> Result<()> {
        let client = self.get_client()?;

        for chunk in ids.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for doc_id in chunk {
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    /// Delete every document in a collection.
    async fn clear_collection(&self, collection: &'static str) -> Result<usize> {
        let ids: Vec<String> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .obj::<DocId>()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|d| d.id)
            .filter(|id| !id.is_empty())
            .collect();

        self.batch_delete(collection, &ids).await?;
        Ok(ids.len())
    }
}

#[async_trait]
impl EntityStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let users = self.list_docs(filter.field_conditions()).await?;
        Ok(filter.apply(users))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.get_doc(id).await
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        self.ensure_email_free(&user).await?;
        self.insert_doc(user).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.ensure_email_free(user).await?;
        self.update_doc(user).await
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete_doc::<User>(id).await
    }

    // ─── Team Operations ─────────────────────────────────────────

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let teams = self.list_docs(filter.field_conditions()).await?;
        Ok(filter.apply(teams))
    }

    async fn get_team(&self, id: &str) -> Result<Option<Team>> {
        self.get_doc(id).await
    }

    async fn insert_team(&self, team: Team) -> Result<Team> {
        self.insert_doc(team).await
    }

    async fn update_team(&self, team: &Team) -> Result<()> {
        self.update_doc(team).await
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        self.delete_doc::<Team>(id).await
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>> {
        let activities = self.list_docs(filter.field_conditions()).await?;
        Ok(filter.apply(activities))
    }

    async fn get_activity(&self, id: &str) -> Result<Option<Activity>> {
        self.get_doc(id).await
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
        self.insert_doc(activity).await
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        self.update_doc(activity).await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.delete_doc::<Activity>(id).await
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    async fn list_leaderboard(&self, filter: &LeaderboardFilter) -> Result<Vec<LeaderboardEntry>> {
        let entries = self.list_docs(filter.field_conditions()).await?;
        Ok(filter.apply(entries))
    }

    async fn get_leaderboard_entry(&self, id: &str) -> Result<Option<LeaderboardEntry>> {
        self.get_doc(id).await
    }

    async fn insert_leaderboard_entry(&self, entry: LeaderboardEntry) -> Result<LeaderboardEntry> {
        self.insert_doc(entry).await
    }

    async fn update_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Result<()> {
        self.update_doc(entry).await
    }

    async fn delete_leaderboard_entry(&self, id: &str) -> Result<()> {
        self.delete_doc::<LeaderboardEntry>(id).await
    }

    /// Delete the old snapshot, then write the new one.
    ///
    /// Not atomic: readers between the two steps see a partial leaderboard.
    async fn replace_leaderboard(
        &self,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let removed = self.clear_collection(collections::LEADERBOARD).await?;

        let entries: Vec<LeaderboardEntry> = entries
            .into_iter()
            .map(|mut entry| {
                entry.set_id(new_document_id());
                entry
            })
            .collect();

        stream::iter(entries.clone())
            .map(|entry| async move { self.upsert_doc(&entry).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<()>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()?;

        tracing::info!(removed, written = entries.len(), "Leaderboard replaced");
        Ok(entries)
    }

    // ─── Workout Operations ──────────────────────────────────────

    async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>> {
        let workouts = self.list_docs(filter.field_conditions()).await?;
        Ok(filter.apply(workouts))
    }

    async fn get_workout(&self, id: &str) -> Result<Option<Workout>> {
        self.get_doc(id).await
    }

    async fn insert_workout(&self, workout: Workout) -> Result<Workout> {
        self.insert_doc(workout).await
    }

    async fn update_workout(&self, workout: &Workout) -> Result<()> {
        self.update_doc(workout).await
    }

    async fn delete_workout(&self, id: &str) -> Result<()> {
        self.delete_doc::<Workout>(id).await
    }

    async fn clear_all(&self) -> Result<()> {
        for collection in collections::ALL {
            let count = self.clear_collection(collection).await?;
            tracing::debug!(collection, count, "Cleared collection");
        }
        Ok(())
    }
}
