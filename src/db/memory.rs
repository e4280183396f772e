// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process entity store.
//!
//! Keeps every collection as an ordered list of JSON documents, so records go
//! through the same serde representation they would have in Firestore.
//! Insertion order is preserved. Used by tests and local demos.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::{collections, new_document_id, Document, EntityStore};
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityFilter, LeaderboardEntry, LeaderboardFilter, Team, TeamFilter, User,
    UserFilter, Workout, WorkoutFilter,
};

type Collections = HashMap<&'static str, Vec<Value>>;

/// Memory-backed store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list<T: Document>(&self) -> Result<Vec<T>> {
        let collections = self.collections.read().await;
        match collections.get(T::COLLECTION) {
            Some(docs) => docs.iter().map(decode::<T>).collect(),
            None => Ok(Vec::new()),
        }
    }

    async fn get<T: Document>(&self, id: &str) -> Result<Option<T>> {
        let collections = self.collections.read().await;
        collections
            .get(T::COLLECTION)
            .and_then(|docs| docs.iter().find(|d| doc_id(d) == Some(id)))
            .map(decode::<T>)
            .transpose()
    }

    /// Assign an ID and append, after `guard` approves against the current
    /// contents of the collection.
    async fn insert_with<T, G>(&self, mut doc: T, guard: G) -> Result<T>
    where
        T: Document,
        G: FnOnce(&[Value], &T) -> Result<()>,
    {
        doc.set_id(new_document_id());
        let value = encode(&doc)?;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(T::COLLECTION).or_default();
        guard(docs.as_slice(), &doc)?;
        docs.push(value);

        tracing::debug!(collection = T::COLLECTION, id = doc.id(), "Inserted document");
        Ok(doc)
    }

    async fn insert<T: Document>(&self, doc: T) -> Result<T> {
        self.insert_with(doc, |_, _| Ok(())).await
    }

    /// Replace an existing document in place, after `guard` approves.
    async fn update_with<T, G>(&self, doc: &T, guard: G) -> Result<()>
    where
        T: Document,
        G: FnOnce(&[Value], &T) -> Result<()>,
    {
        let value = encode(doc)?;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(T::COLLECTION).or_default();
        let position = docs
            .iter()
            .position(|d| doc_id(d) == Some(doc.id()))
            .ok_or_else(|| AppError::not_found(T::COLLECTION, doc.id()))?;
        guard(docs.as_slice(), doc)?;
        docs[position] = value;
        Ok(())
    }

    async fn update<T: Document>(&self, doc: &T) -> Result<()> {
        self.update_with(doc, |_, _| Ok(())).await
    }

    async fn delete<T: Document>(&self, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(T::COLLECTION).or_default();
        let position = docs
            .iter()
            .position(|d| doc_id(d) == Some(id))
            .ok_or_else(|| AppError::not_found(T::COLLECTION, id))?;
        docs.remove(position);

        tracing::debug!(collection = T::COLLECTION, id, "Deleted document");
        Ok(())
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

fn encode<T: Document>(doc: &T) -> Result<Value> {
    serde_json::to_value(doc).map_err(|e| {
        AppError::Database(format!("Failed to encode {} document: {}", T::COLLECTION, e))
    })
}

fn decode<T: Document>(doc: &Value) -> Result<T> {
    serde_json::from_value(doc.clone()).map_err(|e| {
        AppError::Database(format!("Failed to decode {} document: {}", T::COLLECTION, e))
    })
}

/// Reject `user` if another stored user already has its email.
fn ensure_email_free(docs: &[Value], user: &User) -> Result<()> {
    let taken = docs.iter().any(|d| {
        d.get("email").and_then(Value::as_str) == Some(user.email.as_str())
            && doc_id(d) != Some(user.id.as_str())
    });
    if taken {
        return Err(AppError::DuplicateKey(format!(
            "email {} is already in use",
            user.email
        )));
    }
    Ok(())
}

#[async_trait]
impl EntityStore for MemoryDb {
    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.get(id).await
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        self.insert_with(user, ensure_email_free).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.update_with(user, ensure_email_free).await
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete::<User>(id).await
    }

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn get_team(&self, id: &str) -> Result<Option<Team>> {
        self.get(id).await
    }

    async fn insert_team(&self, team: Team) -> Result<Team> {
        self.insert(team).await
    }

    async fn update_team(&self, team: &Team) -> Result<()> {
        self.update(team).await
    }

    async fn delete_team(&self, id: &str) -> Result<()> {
        self.delete::<Team>(id).await
    }

    async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn get_activity(&self, id: &str) -> Result<Option<Activity>> {
        self.get(id).await
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
        self.insert(activity).await
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        self.update(activity).await
    }

    async fn delete_activity(&self, id: &str) -> Result<()> {
        self.delete::<Activity>(id).await
    }

    async fn list_leaderboard(&self, filter: &LeaderboardFilter) -> Result<Vec<LeaderboardEntry>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn get_leaderboard_entry(&self, id: &str) -> Result<Option<LeaderboardEntry>> {
        self.get(id).await
    }

    async fn insert_leaderboard_entry(&self, entry: LeaderboardEntry) -> Result<LeaderboardEntry> {
        self.insert(entry).await
    }

    async fn update_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Result<()> {
        self.update(entry).await
    }

    async fn delete_leaderboard_entry(&self, id: &str) -> Result<()> {
        self.delete::<LeaderboardEntry>(id).await
    }

    async fn replace_leaderboard(
        &self,
        mut entries: Vec<LeaderboardEntry>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut docs = Vec::with_capacity(entries.len());
        for entry in &mut entries {
            entry.set_id(new_document_id());
            docs.push(encode(&*entry)?);
        }

        let mut collections = self.collections.write().await;
        collections.insert(collections::LEADERBOARD, docs);

        tracing::debug!(count = entries.len(), "Replaced leaderboard");
        Ok(entries)
    }

    async fn list_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<Workout>> {
        Ok(filter.apply(self.list().await?))
    }

    async fn get_workout(&self, id: &str) -> Result<Option<Workout>> {
        self.get(id).await
    }

    async fn insert_workout(&self, workout: Workout) -> Result<Workout> {
        self.insert(workout).await
    }

    async fn update_workout(&self, workout: &Workout) -> Result<()> {
        self.update(workout).await
    }

    async fn delete_workout(&self, id: &str) -> Result<()> {
        self.delete::<Workout>(id).await
    }

    async fn clear_all(&self) -> Result<()> {
        self.collections.write().await.clear();
        Ok(())
    }
}
