// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard recompute tests.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{create, send};

/// Create a user and log one activity per calorie value.
async fn user_with_calories(
    app: &axum::Router,
    name: &str,
    team_id: Option<&str>,
    calories: &[u32],
) -> String {
    let user = create(
        app,
        "/api/users",
        json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "password": "secret",
            "team_id": team_id
        }),
    )
    .await;
    let user_id = user["id"].as_str().unwrap().to_string();

    for &kcal in calories {
        create(
            app,
            "/api/activities",
            json!({
                "user_id": user_id,
                "activity_type": "Running",
                "duration": 30,
                "distance": 2.5,
                "calories": kcal,
                "date": "2024-01-15T07:00:00Z"
            }),
        )
        .await;
    }
    user_id
}

fn ranks(entries: &Value) -> Vec<(String, u64)> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["user_name"].as_str().unwrap().to_string(),
                e["rank"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_recompute_ranks_by_calories() {
    let (app, _state) = common::create_test_app();
    let team = create(&app, "/api/teams", json!({"name": "Team Marvel"})).await;
    let team_id = team["id"].as_str().unwrap();

    user_with_calories(&app, "Bruce Banner", Some(team_id), &[100]).await;
    user_with_calories(&app, "Thor Odinson", Some(team_id), &[3000, 3000, 1500]).await;
    user_with_calories(&app, "Peter Parker", None, &[2000]).await;

    let (status, entries) = send(&app, "POST", "/api/leaderboard/recompute", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ranks(&entries),
        vec![
            ("Thor Odinson".to_string(), 1),
            ("Peter Parker".to_string(), 2),
            ("Bruce Banner".to_string(), 3),
        ]
    );

    let thor = &entries[0];
    assert_eq!(thor["total_activities"], 3);
    assert_eq!(thor["total_calories"], 7500);
    assert_eq!(thor["total_distance"], 7.5);
    assert_eq!(thor["team_name"], "Team Marvel");
    assert_eq!(entries[1]["team_id"], Value::Null);

    // Listing returns the same order
    let (_, listed) = send(&app, "GET", "/api/leaderboard/", None).await;
    assert_eq!(ranks(&listed), ranks(&entries));
}

/// Entries with their regenerated `id` removed.
fn without_ids(entries: &Value) -> Vec<Value> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            let mut e = e.clone();
            e.as_object_mut().unwrap().remove("id");
            e
        })
        .collect()
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let (app, _state) = common::create_test_app();
    user_with_calories(&app, "Clark Kent", None, &[500, 700]).await;
    user_with_calories(&app, "Bruce Wayne", None, &[900]).await;

    let arthur = user_with_calories(&app, "Arthur Curry", None, &[]).await;
    for (distance, calories) in [(3.337, 400), (1.111, 450)] {
        create(
            &app,
            "/api/activities",
            json!({
                "user_id": arthur,
                "activity_type": "Swimming",
                "duration": 40,
                "distance": distance,
                "calories": calories,
                "date": "2024-01-15T07:00:00Z"
            }),
        )
        .await;
    }

    let (_, first) = send(&app, "POST", "/api/leaderboard/recompute/", None).await;
    let (_, second) = send(&app, "POST", "/api/leaderboard/recompute", None).await;

    assert_eq!(without_ids(&first), without_ids(&second));

    let arthur_entry = first
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["user_id"] == arthur.as_str())
        .unwrap();
    assert_eq!(arthur_entry["total_activities"], 2);
    assert_eq!(arthur_entry["total_calories"], 850);
    assert_eq!(arthur_entry["total_distance"], 4.45);

    let (_, listed) = send(&app, "GET", "/api/leaderboard", None).await;
    assert_eq!(without_ids(&listed), without_ids(&second));
}

#[tokio::test]
async fn test_fitness_level_follows_leaderboard() {
    let (app, _state) = common::create_test_app();
    let hulk = user_with_calories(&app, "Bruce Banner", None, &[4000, 3500]).await;
    let flash = user_with_calories(&app, "Barry Allen", None, &[2500, 2500]).await;
    let idle = user_with_calories(&app, "Hal Jordan", None, &[]).await;

    // No entries yet: everyone is a beginner
    let (_, before) = send(&app, "GET", &format!("/api/users/{}", hulk), None).await;
    assert_eq!(before["fitness_level"], "Beginner");

    send(&app, "POST", "/api/leaderboard/recompute", None).await;

    for (user_id, expected) in [
        (&hulk, "Advanced"),
        (&flash, "Intermediate"),
        (&idle, "Beginner"),
    ] {
        let (_, user) = send(&app, "GET", &format!("/api/users/{}", user_id), None).await;
        assert_eq!(user["fitness_level"], expected);
    }
}

#[tokio::test]
async fn test_new_activity_waits_for_recompute() {
    let (app, _state) = common::create_test_app();
    let user_id = user_with_calories(&app, "Diana Prince", None, &[100]).await;
    send(&app, "POST", "/api/leaderboard/recompute", None).await;

    create(
        &app,
        "/api/activities",
        json!({
            "user_id": user_id,
            "activity_type": "Swimming",
            "duration": 60,
            "calories": 600,
            "date": "2024-01-16T07:00:00Z"
        }),
    )
    .await;

    let uri = format!("/api/leaderboard?user_id={}", user_id);
    let (_, stale) = send(&app, "GET", &uri, None).await;
    assert_eq!(stale[0]["total_calories"], 100);

    send(&app, "POST", "/api/leaderboard/recompute", None).await;
    let (_, fresh) = send(&app, "GET", &uri, None).await;
    assert_eq!(fresh[0]["total_calories"], 700);
}

#[tokio::test]
async fn test_manual_entry_crud() {
    let (app, _state) = common::create_test_app();
    let entry = create(
        &app,
        "/api/leaderboard",
        json!({"user_id": "ghost", "total_calories": 1234}),
    )
    .await;
    let id = entry["id"].as_str().unwrap();

    assert_eq!(entry["user_name"], "Unknown User");
    assert_eq!(entry["rank"], Value::Null);

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/leaderboard/{}", id),
        Some(json!({"rank": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["rank"], 4);
    assert_eq!(patched["total_calories"], 1234);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/leaderboard/{}", id),
        Some(json!({"rank": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, cleared) = send(
        &app,
        "PATCH",
        &format!("/api/leaderboard/{}", id),
        Some(json!({"rank": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["rank"], Value::Null);

    let (status, _) = send(&app, "DELETE", &format!("/api/leaderboard/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
