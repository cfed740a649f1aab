mod common;

use axum::http::{header, StatusCode};
use ocd_manager_api::database::ExerciseRepository;
use serde_json::{json, Value};

use common::{cookie, id_of, register, server, server_with, test_config, today};

#[tokio::test]
async fn test_habit_crud_is_scoped_to_owner() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);
    let alex = cookie(&register(&server, "alex@example.com").await);

    let response = server
        .post("/api/habits")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"name": "Evening journal", "userId": 999, "id": 5}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let habit_id = id_of(&body, "habit");
    assert_eq!(body["habit"]["category"], "general");
    assert_eq!(body["habit"]["targetFrequency"], "daily");
    assert_eq!(body["habit"]["isActive"], true);
    assert_ne!(body["habit"]["userId"], 999);

    let path = format!("/api/habits/{habit_id}");

    // Foreign rows look exactly like missing ones.
    server
        .get(&path)
        .add_header(header::COOKIE, alex.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .put(&path)
        .add_header(header::COOKIE, alex.clone())
        .json(&json!({"name": "Hijacked"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&path)
        .add_header(header::COOKIE, alex.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let listed: Value = server
        .get("/api/habits")
        .add_header(header::COOKIE, alex)
        .await
        .json();
    assert_eq!(listed["habits"], json!([]));

    let updated: Value = server
        .put(&path)
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"targetFrequency": "weekly"}))
        .await
        .json();
    assert_eq!(updated["habit"]["name"], "Evening journal");
    assert_eq!(updated["habit"]["targetFrequency"], "weekly");

    server
        .delete(&path)
        .add_header(header::COOKIE, sam.clone())
        .await
        .assert_json(&json!({"success": true}));
    server
        .get(&path)
        .add_header(header::COOKIE, sam)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_payloads_write_nothing() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    let response = server
        .post("/api/symptoms")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "anxietyLevel": 11}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["error"], "Anxiety level must be between 0 and 10");

    server
        .post("/api/symptoms")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "anxietyLevel": 4, "mood": "ecstatic"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/habits")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"name": "   "}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let symptoms: Value = server
        .get("/api/symptoms")
        .add_header(header::COOKIE, sam.clone())
        .await
        .json();
    assert_eq!(symptoms["symptoms"], json!([]));
    let habits: Value = server
        .get("/api/habits")
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(habits["habits"], json!([]));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    server
        .get("/api/symptoms/not-a-number")
        .add_header(header::COOKIE, sam)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_symptoms_listed_newest_first_with_defaults() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    for (date, level) in [("2026-10-01", 7), ("2026-10-03", 3), ("2026-10-02", 5)] {
        server
            .post("/api/symptoms")
            .add_header(header::COOKIE, sam.clone())
            .json(&json!({"date": date, "anxietyLevel": level}))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let body: Value = server
        .get("/api/symptoms")
        .add_header(header::COOKIE, sam)
        .await
        .json();
    let symptoms = body["symptoms"].as_array().unwrap();
    let dates: Vec<&str> = symptoms.iter().map(|s| s["date"].as_str().unwrap()).collect();
    assert_eq!(dates, ["2026-10-03", "2026-10-02", "2026-10-01"]);
    assert_eq!(symptoms[0]["mood"], "neutral");
    assert_eq!(symptoms[0]["resistanceLevel"], 5);
    assert_eq!(symptoms[0]["intrusiveThoughtFrequency"], "none");
}

#[tokio::test]
async fn test_exercises_visibility_and_ownership() {
    let (server, store) = server_with(test_config()).await;
    let sam = cookie(&register(&server, "sam@example.com").await);
    let alex = cookie(&register(&server, "alex@example.com").await);

    let system = store
        .create_system_exercise(&serde_json::from_value(json!({
            "title": "Touch a doorknob",
            "description": "Touch it and wait",
            "category": "contamination",
            "difficulty": 2
        }))
        .unwrap())
        .await
        .unwrap();

    let response = server
        .post("/api/exercises")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({
            "title": "Leave the stove",
            "description": "Check once only",
            "category": "checking",
            "isSystemExercise": true
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let own_id = id_of(&body, "exercise");
    assert_eq!(body["exercise"]["isSystemExercise"], false);
    assert_eq!(body["exercise"]["estimatedMinutes"], 15);

    let listed: Value = server
        .get("/api/exercises")
        .add_header(header::COOKIE, alex.clone())
        .await
        .json();
    let ids: Vec<i64> = listed["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [system.id]);

    // System exercises are readable but not writable.
    let system_path = format!("/api/exercises/{}", system.id);
    server
        .get(&system_path)
        .add_header(header::COOKIE, sam.clone())
        .await
        .assert_status_ok();
    server
        .delete(&system_path)
        .add_header(header::COOKIE, sam.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .put(&format!("/api/exercises/{own_id}"))
        .add_header(header::COOKIE, alex)
        .json(&json!({"difficulty": 5}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let updated: Value = server
        .put(&format!("/api/exercises/{own_id}"))
        .add_header(header::COOKIE, sam)
        .json(&json!({"difficulty": 5}))
        .await
        .json();
    assert_eq!(updated["exercise"]["difficulty"], 5);
}

#[tokio::test]
async fn test_progress_log_references_must_be_reachable() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);
    let alex = cookie(&register(&server, "alex@example.com").await);

    let habit: Value = server
        .post("/api/habits")
        .add_header(header::COOKIE, alex)
        .json(&json!({"name": "Alex's habit"}))
        .await
        .json();

    let response = server
        .post("/api/progress")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "habitId": id_of(&habit, "habit"), "completed": true}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Habit not found");

    let response = server
        .post("/api/progress")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "exerciseId": 4242}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Exercise not found");

    let logs: Value = server
        .get("/api/progress")
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(logs["logs"], json!([]));
}

#[tokio::test]
async fn test_deleting_habit_keeps_its_logs() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    let habit: Value = server
        .post("/api/habits")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"name": "Walk"}))
        .await
        .json();
    let habit_id = id_of(&habit, "habit");

    let log: Value = server
        .post("/api/progress")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "habitId": habit_id, "completed": true}))
        .await
        .json();
    let log_id = id_of(&log, "log");

    server
        .delete(&format!("/api/habits/{habit_id}"))
        .add_header(header::COOKIE, sam.clone())
        .await
        .assert_status_ok();

    let log: Value = server
        .get(&format!("/api/progress/{log_id}"))
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(log["log"]["habitId"], Value::Null);
    assert_eq!(log["log"]["completed"], true);
}

#[tokio::test]
async fn test_habit_toggle_is_idempotent() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    let habit: Value = server
        .post("/api/habits")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"name": "Walk"}))
        .await
        .json();
    let habit_id = id_of(&habit, "habit");
    let toggle = format!("/api/habits/{habit_id}/toggle");

    for _ in 0..2 {
        server
            .post(&toggle)
            .add_header(header::COOKIE, sam.clone())
            .json(&json!({"completed": true}))
            .await
            .assert_json(&json!({"habitId": habit_id, "date": today(), "completedToday": true}));
    }

    let logs: Value = server
        .get("/api/progress")
        .add_header(header::COOKIE, sam.clone())
        .await
        .json();
    assert_eq!(logs["logs"].as_array().unwrap().len(), 1);

    let dashboard: Value = server
        .get("/api/dashboard")
        .add_header(header::COOKIE, sam.clone())
        .await
        .json();
    assert_eq!(dashboard["today"]["habits"][0]["completedToday"], true);

    server
        .post(&toggle)
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"completed": false}))
        .await
        .assert_json(&json!({"habitId": habit_id, "date": today(), "completedToday": false}));

    server
        .post("/api/habits/9999/toggle")
        .add_header(header::COOKIE, sam)
        .json(&json!({"completed": true}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
