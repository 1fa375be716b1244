//! Gemini REST client
//!
//! Talks to `POST {base}/models/{model}:generateContent`. Structured calls
//! use JSON mode with a response schema; chat is free text. Every call goes
//! through the shared [`RetryPolicy`], and a response that fails to decode
//! counts as a failed attempt.

use std::time::Duration;

use async_trait::async_trait;
use foodbuddy_shared::{ChatMessage, ChatRole, DayPlan, Meal, WeeklyPlan};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::prompt::{PromptContext, IMAGE_PROMPT, WEEKLY_PLAN_PROMPT};
use super::{schema, GenerationError, InlineImage, MealGenerator, RetryPolicy};
use crate::config::AiConfig;

const GENERATE_METHOD: &str = "generateContent";
const JSON_MIME_TYPE: &str = "application/json";

const MEAL_TEMPERATURE: f32 = 0.8;
const PLAN_TEMPERATURE: f32 = 0.7;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: &'static str,
    response_schema: Value,
}

impl GenerationConfig {
    fn json(schema: Value, temperature: Option<f32>) -> Self {
        Self {
            temperature,
            response_mime_type: JSON_MIME_TYPE,
            response_schema: schema,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, empty when there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    vision_model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            vision_model: config.vision_model.clone(),
            retry: RetryPolicy::from(config),
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, GENERATE_METHOD)
    }

    /// One HTTP round trip, no retries
    async fn send(&self, model: &str, request: &GenerateRequest) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(self.url(model))
            .query(&[("key", self.api_key.expose_secret())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, model, "Gemini API error");
            return Err(map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        if let Some(err) = parsed.error {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: err.message,
            });
        }

        Ok(parsed.text())
    }

    /// One attempt at a JSON-mode call, decoded into `T`
    async fn send_json<T: DeserializeOwned>(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<T, GenerationError> {
        let text = self.send(model, request).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Run `op` under the retry policy with request and failure counters
    async fn with_retry<T, F, Fut>(&self, kind: &'static str, op: F) -> Result<T, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, GenerationError>>,
    {
        if self.api_key.expose_secret().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        metrics::counter!("generation_requests_total", "kind" => kind).increment(1);
        let result = self.retry.run(kind, op).await;
        if let Err(err) = &result {
            metrics::counter!("generation_failures_total", "kind" => kind).increment(1);
            error!(kind, error = %err, "Generation failed after retries");
        }
        result
    }
}

fn map_api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    GenerationError::Api { status, message }
}

fn chat_contents(history: &[ChatMessage], message: &str) -> Vec<Content> {
    history
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            };
            Content::text(Some(role), m.text.clone())
        })
        .chain(std::iter::once(Content::text(Some("user"), message)))
        .collect()
}

#[async_trait]
impl MealGenerator for GeminiClient {
    #[instrument(skip(self, ctx, prompt), fields(model = %self.model))]
    async fn suggest_meal(
        &self,
        ctx: &PromptContext,
        meal_type: &str,
        prompt: Option<&str>,
    ) -> Result<Meal, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), ctx.meal_prompt(meal_type, prompt))],
            system_instruction: Some(Content::text(None, ctx.system_instruction())),
            generation_config: Some(GenerationConfig::json(schema::meal(), Some(MEAL_TEMPERATURE))),
        };

        self.with_retry("meal", || self.send_json(&self.model, &request))
            .await
    }

    #[instrument(skip(self, ctx), fields(model = %self.model, target = ctx.target_calories))]
    async fn daily_plan(&self, ctx: &PromptContext) -> Result<DayPlan, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), ctx.daily_plan_prompt())],
            system_instruction: Some(Content::text(None, ctx.system_instruction())),
            generation_config: Some(GenerationConfig::json(
                schema::day_plan(),
                Some(PLAN_TEMPERATURE),
            )),
        };

        let plan: DayPlan = self
            .with_retry("daily_plan", || self.send_json(&self.model, &request))
            .await?;
        debug!(day = %plan.day, total = plan.total_calories, "Daily plan generated");
        Ok(plan)
    }

    #[instrument(skip(self, ctx), fields(model = %self.model, target = ctx.target_calories))]
    async fn weekly_plan(&self, ctx: &PromptContext) -> Result<WeeklyPlan, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), WEEKLY_PLAN_PROMPT)],
            system_instruction: Some(Content::text(None, ctx.system_instruction())),
            generation_config: Some(GenerationConfig::json(
                schema::weekly_plan(),
                Some(PLAN_TEMPERATURE),
            )),
        };

        // A short week is retried like any other bad response
        let request = &request;
        self.with_retry("weekly_plan", move || async move {
            let plan: WeeklyPlan = self.send_json(&self.model, request).await?;
            plan.ensure_complete()?;
            Ok(plan)
        })
        .await
    }

    #[instrument(skip(self, image), fields(model = %self.vision_model, mime = %image.mime_type))]
    async fn analyze_image(&self, image: &InlineImage) -> Result<Meal, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    Part::Text {
                        text: IMAGE_PROMPT.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                ],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig::json(schema::meal(), None)),
        };

        self.with_retry("image", || self.send_json(&self.vision_model, &request))
            .await
    }

    #[instrument(skip(self, ctx, history, message), fields(model = %self.model, turns = history.len()))]
    async fn chat(
        &self,
        ctx: &PromptContext,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: chat_contents(history, message),
            system_instruction: Some(Content::text(None, ctx.chat_instruction())),
            generation_config: None,
        };

        self.with_retry("chat", || self.send(&self.model, &request))
            .await
    }
}
