mod common;

use axum::http::{header, StatusCode};
use serde_json::{json, Value};

use common::{cookie, register, server, today};

#[tokio::test]
async fn test_stats_for_new_user_are_zero() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    let body: Value = server
        .get("/api/progress/stats")
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(body["stats"]["avgAnxiety"].as_f64(), Some(0.0));
    assert_eq!(body["stats"]["symptomEntries"], 0);
    assert_eq!(body["stats"]["exercisesCompleted"], 0);
    assert_eq!(body["stats"]["avgAnxietyReduction"].as_f64(), Some(0.0));
    assert_eq!(body["stats"]["activeHabits"], 0);
    assert_eq!(body["symptomTrend"], json!([]));
    assert_eq!(body["habitTrend"], json!([]));
}

#[tokio::test]
async fn test_stats_reflect_symptoms_and_sessions() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    server
        .post("/api/symptoms")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "anxietyLevel": 6}))
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/api/progress")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "completed": true, "anxietyBefore": 8, "anxietyAfter": 3}))
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = server
        .get("/api/progress/stats")
        .add_query_param("days", 30)
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(body["stats"]["avgAnxiety"].as_f64(), Some(6.0));
    assert_eq!(body["stats"]["exercisesCompleted"], 1);
    assert_eq!(body["stats"]["avgAnxietyReduction"].as_f64(), Some(5.0));
    assert_eq!(body["symptomTrend"][0]["anxietyLevel"], 6);
}

#[tokio::test]
async fn test_stats_window_bounds() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    for days in ["0", "3651", "soon"] {
        server
            .get("/api/progress/stats")
            .add_query_param("days", days)
            .add_header(header::COOKIE, sam.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_dashboard_prompts_checkin_until_symptom_logged() {
    let server = server().await;
    let sam = cookie(&register(&server, "sam@example.com").await);

    let body: Value = server
        .get("/api/dashboard")
        .add_header(header::COOKIE, sam.clone())
        .await
        .json();
    assert_eq!(body["today"]["needsCheckin"], true);
    assert_eq!(body["today"]["symptom"], Value::Null);
    assert_eq!(body["today"]["compulsionCount"], 0);
    assert_eq!(body["recentActivity"], json!([]));

    server
        .post("/api/symptoms")
        .add_header(header::COOKIE, sam.clone())
        .json(&json!({"date": today(), "anxietyLevel": 4, "mood": "good", "compulsionCount": 2}))
        .await
        .assert_status(StatusCode::CREATED);

    let body: Value = server
        .get("/api/dashboard")
        .add_header(header::COOKIE, sam)
        .await
        .json();
    assert_eq!(body["today"]["needsCheckin"], false);
    assert_eq!(body["today"]["anxietyLevel"], 4);
    assert_eq!(body["today"]["compulsionCount"], 2);
    assert_eq!(
        body["recentActivity"][0],
        json!({
            "id": body["today"]["symptom"]["id"],
            "type": "symptom",
            "description": "Anxiety: 4/10, Mood: good",
            "date": today()
        })
    );
}
