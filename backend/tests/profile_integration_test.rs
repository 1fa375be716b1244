//! Onboarding, session bootstrap and energy targets

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires database"]
async fn test_new_account_needs_onboarding() {
    let app = common::TestApp::new().await;
    let (token, _) = app.register().await;

    let (status, body) = app.get("/api/v1/session", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "needs_onboarding");
    assert_eq!(body["role"], "user");

    let (status, _) = app.get("/api/v1/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_onboarding_computes_energy() {
    let app = common::TestApp::new().await;
    let (token, _) = app.onboarded_user().await;

    let (status, body) = app.get("/api/v1/session", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["profile"]["name"], "Somchai");

    let (status, energy) = app.get("/api/v1/profile/energy", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let energy: Value = serde_json::from_str(&energy).unwrap();
    assert_eq!(energy["bmr"], 1649);
    assert_eq!(energy["tdee"], 1979);
    assert_eq!(energy["target_calories"], 1479);
    assert_eq!(energy["meal_ceiling"], 493);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_incomplete_onboarding_rejected() {
    let app = common::TestApp::new().await;
    let (token, _) = app.register().await;

    let (status, body) = app
        .put(
            "/api/v1/profile",
            Some(&token),
            json!({ "name": "Somchai", "age": 30 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_custom_goal_round_trips() {
    let app = common::TestApp::new().await;
    let (token, _) = app.register().await;

    let (status, body) = app
        .put(
            "/api/v1/profile",
            Some(&token),
            json!({
                "name": "Malee",
                "age": 28,
                "gender": "female",
                "height_cm": 160.0,
                "weight_kg": 55.0,
                "activity": "วิ่งทุกเช้า",
                "goal": "อยากมีกล้ามท้อง"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, profile) = app.get("/api/v1/profile", Some(&token)).await;
    let profile: Value = serde_json::from_str(&profile).unwrap();
    assert_eq!(profile["goal"], "อยากมีกล้ามท้อง");
    assert_eq!(profile["activity"], "วิ่งทุกเช้า");
}
