// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! REST API tests against the in-memory store.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::{create, send};

fn tony() -> Value {
    json!({
        "name": "Tony Stark",
        "email": "ironman@marvel.com",
        "password": "stark123"
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_api_root_links() {
    let (app, _state) = common::create_test_app();

    for uri in ["/api", "/api/"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"], "http://localhost:8000/api/users/");
        assert_eq!(body["teams"], "http://localhost:8000/api/teams/");
        assert_eq!(body["activities"], "http://localhost:8000/api/activities/");
        assert_eq!(body["leaderboard"], "http://localhost:8000/api/leaderboard/");
        assert_eq!(body["workouts"], "http://localhost:8000/api/workouts/");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USERS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_lifecycle() {
    let (app, _state) = common::create_test_app();

    let team = create(&app, "/api/teams/", json!({"name": "Team Marvel"})).await;
    let team_id = team["id"].as_str().unwrap().to_string();

    let mut payload = tony();
    payload["team_id"] = json!(team_id);
    let user = create(&app, "/api/users/", payload).await;
    let id = user["id"].as_str().unwrap().to_string();

    assert!(!id.is_empty());
    assert_eq!(user["team_name"], "Team Marvel");
    assert_eq!(user["fitness_level"], "Beginner");
    assert!(user.get("password").is_none());

    let (status, fetched) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "ironman@marvel.com");

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}/", id),
        Some(json!({"name": "Iron Man"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "Iron Man");
    assert_eq!(patched["team_id"], json!(team_id));

    // PUT replaces every field; team_id omitted means no team.
    let (status, replaced) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", id),
        Some(json!({
            "name": "Anthony Stark",
            "email": "tony@stark.com",
            "password": "pepper"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["email"], "tony@stark.com");
    assert_eq!(replaced["team_id"], Value::Null);
    assert_eq!(replaced["team_name"], Value::Null);
    assert_eq!(replaced["created_at"], user["created_at"]);

    let (status, body) = send(&app, "DELETE", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let (app, _state) = common::create_test_app();
    create(&app, "/api/users", tony()).await;

    let (status, body) = send(&app, "POST", "/api/users", Some(tony())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_key");

    let (_, users) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_to_taken_email_rejected() {
    let (app, _state) = common::create_test_app();
    create(&app, "/api/users", tony()).await;
    let steve = create(
        &app,
        "/api/users",
        json!({"name": "Steve Rogers", "email": "cap@marvel.com", "password": "rogers123"}),
    )
    .await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", steve["id"].as_str().unwrap()),
        Some(json!({"email": "ironman@marvel.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_users_never_returns_passwords() {
    let (app, _state) = common::create_test_app();
    create(&app, "/api/users", tony()).await;

    let (status, users) = send(&app, "GET", "/api/users/", None).await;
    assert_eq!(status, StatusCode::OK);
    for user in users.as_array().unwrap() {
        assert!(user.get("password").is_none());
    }
}

#[tokio::test]
async fn test_user_filters() {
    let (app, _state) = common::create_test_app();
    let team = create(&app, "/api/teams", json!({"name": "Team DC"})).await;
    let team_id = team["id"].as_str().unwrap();

    create(&app, "/api/users", tony()).await;
    create(
        &app,
        "/api/users",
        json!({
            "name": "Clark Kent",
            "email": "superman@dc.com",
            "password": "kent123",
            "team_id": team_id
        }),
    )
    .await;

    let (_, by_team) = send(&app, "GET", &format!("/api/users?team_id={}", team_id), None).await;
    let by_team = by_team.as_array().unwrap();
    assert_eq!(by_team.len(), 1);
    assert_eq!(by_team[0]["name"], "Clark Kent");

    let (_, by_email) = send(&app, "GET", "/api/users?email=ironman@marvel.com", None).await;
    assert_eq!(by_email.as_array().unwrap().len(), 1);

    // Exact match only
    let (_, by_case) = send(&app, "GET", "/api/users?email=IRONMAN@marvel.com", None).await;
    assert!(by_case.as_array().unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_invalid_email_rejected() {
    let (app, _state) = common::create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"name": "Bad", "email": "not-an-email", "password": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let (app, _state) = common::create_test_app();
    let (status, body) = send(&app, "POST", "/api/teams", Some(json!({"description": "x"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_negative_calories_rejected() {
    let (app, _state) = common::create_test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/activities",
        Some(json!({
            "user_id": "u1",
            "activity_type": "Running",
            "duration": 30,
            "calories": -5,
            "date": "2024-01-15T07:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_name_too_long_rejected() {
    let (app, _state) = common::create_test_app();
    let long_name = "a".repeat(101);
    let (status, _) = send(&app, "POST", "/api/teams", Some(json!({"name": long_name}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_difficulty_rejected() {
    let (app, _state) = common::create_test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/workouts",
        Some(json!({
            "name": "Mystery",
            "description": "???",
            "difficulty": "Extreme",
            "duration": 10,
            "calories_estimate": 100,
            "category": "Cardio"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ═══════════════════════════════════════════════════════════════════════════
// TEAMS, ACTIVITIES, WORKOUTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_team_member_count() {
    let (app, _state) = common::create_test_app();
    let team = create(&app, "/api/teams", json!({"name": "Team Marvel"})).await;
    let team_id = team["id"].as_str().unwrap();
    assert_eq!(team["member_count"], 0);

    let mut payload = tony();
    payload["team_id"] = json!(team_id);
    create(&app, "/api/users", payload).await;

    let (_, fetched) = send(&app, "GET", &format!("/api/teams/{}", team_id), None).await;
    assert_eq!(fetched["member_count"], 1);
}

#[tokio::test]
async fn test_patch_null_clears_nullable_fields() {
    let (app, _state) = common::create_test_app();
    let team = create(
        &app,
        "/api/teams",
        json!({"name": "Team Marvel", "description": "Avengers"}),
    )
    .await;
    let team_id = team["id"].as_str().unwrap();

    let mut payload = tony();
    payload["team_id"] = json!(team_id);
    let user = create(&app, "/api/users", payload).await;
    let user_uri = format!("/api/users/{}", user["id"].as_str().unwrap());

    let (status, patched) = send(&app, "PATCH", &user_uri, Some(json!({"team_id": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["team_id"], Value::Null);
    assert_eq!(patched["team_name"], Value::Null);
    assert_eq!(patched["name"], "Tony Stark");

    let team_uri = format!("/api/teams/{}", team_id);
    let (status, patched) =
        send(&app, "PATCH", &team_uri, Some(json!({"description": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["description"], Value::Null);
    assert_eq!(patched["name"], "Team Marvel");
    assert_eq!(patched["member_count"], 0);
}

#[tokio::test]
async fn test_patch_null_clears_activity_distance() {
    let (app, _state) = common::create_test_app();
    let activity = create(
        &app,
        "/api/activities",
        json!({
            "user_id": "u1",
            "activity_type": "Running",
            "duration": 30,
            "distance": 5.0,
            "calories": 300,
            "date": "2024-01-15T07:00:00Z",
            "notes": "Park loop"
        }),
    )
    .await;
    let uri = format!("/api/activities/{}", activity["id"].as_str().unwrap());

    let (status, patched) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({"distance": null, "calories": 350})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["distance"], Value::Null);
    assert_eq!(patched["calories"], 350);
    assert_eq!(patched["notes"], "Park loop");
}

#[tokio::test]
async fn test_deleted_team_leaves_member_reference() {
    let (app, _state) = common::create_test_app();
    let team = create(&app, "/api/teams", json!({"name": "Team Marvel"})).await;
    let team_id = team["id"].as_str().unwrap();

    let mut payload = tony();
    payload["team_id"] = json!(team_id);
    let user = create(&app, "/api/users", payload).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/teams/{}", team_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(
        &app,
        "GET",
        &format!("/api/users/{}", user["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(fetched["team_id"], json!(team_id));
    assert_eq!(fetched["team_name"], Value::Null);
}

#[tokio::test]
async fn test_activity_for_unknown_user() {
    let (app, _state) = common::create_test_app();
    let activity = create(
        &app,
        "/api/activities",
        json!({
            "user_id": "no-such-user",
            "activity_type": "Yoga",
            "duration": 45,
            "calories": 200,
            "date": "2024-01-15T07:00:00Z"
        }),
    )
    .await;

    assert_eq!(activity["user_name"], "Unknown User");
    assert_eq!(activity["distance"], Value::Null);
    assert_eq!(activity["date"], "2024-01-15T07:00:00Z");
}

#[tokio::test]
async fn test_activities_newest_first_and_filtered() {
    let (app, _state) = common::create_test_app();
    let user = create(&app, "/api/users", tony()).await;
    let user_id = user["id"].as_str().unwrap();

    for (activity_type, date) in [
        ("Running", "2024-01-10T07:00:00Z"),
        ("Cycling", "2024-01-20T07:00:00Z"),
        ("Running", "2024-01-15T07:00:00Z"),
    ] {
        create(
            &app,
            "/api/activities",
            json!({
                "user_id": user_id,
                "activity_type": activity_type,
                "duration": 30,
                "distance": 5.0,
                "calories": 300,
                "date": date
            }),
        )
        .await;
    }

    let (_, all) = send(&app, "GET", "/api/activities/", None).await;
    let dates: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["date"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![
            "2024-01-20T07:00:00Z",
            "2024-01-15T07:00:00Z",
            "2024-01-10T07:00:00Z"
        ]
    );
    assert_eq!(all[0]["user_name"], "Tony Stark");

    let (_, running) = send(&app, "GET", "/api/activities?activity_type=Running", None).await;
    assert_eq!(running.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_workout_round_trip() {
    let (app, _state) = common::create_test_app();
    let workout = create(
        &app,
        "/api/workouts",
        json!({
            "name": "Morning Run",
            "description": "Easy pace around the park",
            "difficulty": "Medium",
            "duration": 45,
            "calories_estimate": 400,
            "category": "Cardio"
        }),
    )
    .await;
    let id = workout["id"].as_str().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/api/workouts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Morning Run");
    assert_eq!(fetched["difficulty"], "Medium");
    assert_eq!(fetched["duration"], 45);
    assert_eq!(fetched["calories_estimate"], 400);
    assert_eq!(fetched["category"], "Cardio");

    let (_, hard) = send(&app, "GET", "/api/workouts?difficulty=Hard", None).await;
    assert!(hard.as_array().unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let (app, _state) = common::create_test_app();

    for uri in [
        "/api/users/missing",
        "/api/teams/missing",
        "/api/activities/missing",
        "/api/leaderboard/missing",
        "/api/workouts/missing",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {}", uri);
        assert_eq!(body["error"], "not_found");

        let (status, _) = send(&app, "DELETE", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {}", uri);
    }
}

#[tokio::test]
async fn test_store_failure_is_database_error() {
    let (app, _state) = common::create_offline_app();
    let (status, body) = send(&app, "GET", "/api/users", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}
