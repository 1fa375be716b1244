//! Gemini client against a mock HTTP server

use foodbuddy_backend::config::AiConfig;
use foodbuddy_backend::generation::{
    GeminiClient, GenerationError, InlineImage, MealGenerator, PromptContext,
};
use foodbuddy_shared::{ChatMessage, ChatRole, Gender, GoalSelection, ProfileDraft};
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-test:generateContent";
const VISION_PATH: &str = "/models/gemini-vision-test:generateContent";

fn config(server: &MockServer) -> AiConfig {
    AiConfig {
        api_key: SecretString::new("test-key".to_string()),
        base_url: server.uri(),
        model: "gemini-test".to_string(),
        vision_model: "gemini-vision-test".to_string(),
        max_retries: 3,
        initial_backoff_ms: 1,
        request_timeout_secs: 5,
    }
}

fn context() -> PromptContext {
    let profile = ProfileDraft {
        name: Some("Somchai".to_string()),
        age: Some(30),
        gender: Some(Gender::Male),
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
        activity: None,
        goal: Some(GoalSelection::Custom("ลดพุง".to_string())),
        dietary_restrictions: vec!["Halal".to_string()],
    }
    .into_profile(None)
    .unwrap();
    PromptContext::new(profile, 1979)
}

fn meal_json(name: &str, calories: f64) -> Value {
    json!({
        "name": name,
        "calories": calories,
        "protein": 25,
        "carbs": 40,
        "fats": 12,
        "description": "ทำง่าย",
        "cookingTime": "20 นาที"
    })
}

fn day_json(day: &str) -> Value {
    json!({
        "day": day,
        "breakfast": meal_json("โจ๊กหมู", 350.0),
        "lunch": meal_json("ข้าวผัดกะเพราไก่", 600.0),
        "dinner": meal_json("ต้มยำกุ้ง", 450.0),
        "totalCalories": 1400
    })
}

/// Model output arrives as JSON text inside the first candidate
fn candidate(payload: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": payload }] } }]
    }))
}

#[tokio::test]
async fn test_daily_plan_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(candidate(&day_json("วันนี้").to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let plan = client.daily_plan(&context()).await.unwrap();

    assert_eq!(plan.day, "วันนี้");
    assert_eq!(plan.lunch.name, "ข้าวผัดกะเพราไก่");
    assert_eq!(plan.lunch.cooking_time.as_deref(), Some("20 นาที"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(instruction.contains("Custom Goal: \"ลดพุง\""));
    assert!(instruction.contains("Halal"));
    assert!(body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("1979 kcal"));
}

#[tokio::test]
async fn test_retries_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded." }
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(candidate(&meal_json("ยำวุ้นเส้น", 320.0).to_string()))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let meal = client.suggest_meal(&context(), "lunch", None).await.unwrap();

    assert_eq!(meal.name, "ยำวุ้นเส้น");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "Internal error" }
        })))
        .expect(4)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let err = client.daily_plan(&context()).await.unwrap_err();

    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_short_weekly_plan_is_retried() {
    let server = MockServer::start().await;
    let six: Vec<Value> = (1..=6).map(|d| day_json(&format!("วันที่ {}", d))).collect();
    let seven: Vec<Value> = (1..=7).map(|d| day_json(&format!("วันที่ {}", d))).collect();
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(candidate(&json!({ "days": six }).to_string()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(candidate(&json!({ "days": seven }).to_string()))
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let week = client.weekly_plan(&context()).await.unwrap();

    assert_eq!(week.days.len(), 7);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_analyze_image_uses_vision_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VISION_PATH))
        .respond_with(candidate(&meal_json("ส้มตำไทย", 180.0).to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let image = InlineImage::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
    let meal = client.analyze_image(&image).await.unwrap();

    assert_eq!(meal.name, "ส้มตำไทย");
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["contents"][0]["parts"][1]["inlineData"],
        json!({ "mimeType": "image/png", "data": "iVBORw0KGgo=" })
    );
    assert!(body.get("systemInstruction").is_none());
}

#[tokio::test]
async fn test_chat_sends_history_as_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ลองข้าวกล้อง" }, { "text": "ครับ" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(&config(&server)).unwrap();
    let history = vec![
        ChatMessage {
            role: ChatRole::User,
            text: "สวัสดี".to_string(),
        },
        ChatMessage {
            role: ChatRole::Model,
            text: "สวัสดีครับ".to_string(),
        },
    ];
    let reply = client.chat(&context(), &history, "กินอะไรดี").await.unwrap();

    assert_eq!(reply, "ลองข้าวกล้องครับ");
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let roles: Vec<&str> = body["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
    assert!(body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .ends_with("Answer concisely in Thai."));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    let mut config = config(&server);
    config.api_key = SecretString::new(String::new());

    let client = GeminiClient::new(&config).unwrap();
    let err = client.daily_plan(&context()).await.unwrap_err();

    assert!(matches!(err, GenerationError::MissingApiKey));
    assert!(server.received_requests().await.unwrap().is_empty());
}
