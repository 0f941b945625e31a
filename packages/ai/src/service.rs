// ABOUTME: AI service for chat completions against an OpenAI-compatible API
// ABOUTME: Handles request building, response parsing and usage logging

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use intake_config::constants::{OPENAI_API_KEY, OPENAI_BASE_URL, OPENAI_MODEL};
use intake_core::ChatMessage;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Value shipped in the sample `.env`; treated the same as a missing key
pub const PLACEHOLDER_API_KEY: &str = "tu-api-key-aqui";

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("network error: could not fetch a completion: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[allow(dead_code)]
    id: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Debug)]
pub struct AIResponse<T> {
    pub data: T,
    pub usage: Usage,
}

/// Anything that can turn a message list into a single completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Whether a usable API key is present
    fn is_configured(&self) -> bool;

    /// Model name sent with each request
    fn model(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> AIServiceResult<AIResponse<String>>;
}

/// Chat completion client for the hosted model
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AIService {
    fn create_client() -> Client {
        Client::builder()
            .user_agent(concat!("intake/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            })
    }

    /// Creates a new AI service instance
    /// API key is read from OPENAI_API_KEY, model from OPENAI_MODEL and
    /// the endpoint from OPENAI_BASE_URL
    pub fn new() -> Self {
        let api_key = env::var(OPENAI_API_KEY).ok();
        if api_key.is_none() {
            warn!("{} not set - chat requests will be rejected", OPENAI_API_KEY);
        }

        let model = env::var(OPENAI_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom model: {}", model);
        }

        let base_url = env::var(OPENAI_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            client: Self::create_client(),
            api_key,
            model,
            base_url,
        }
    }

    /// Creates a new AI service instance with a specific API key
    pub fn with_api_key(api_key: String) -> Self {
        let model = env::var(OPENAI_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::with_api_key_and_model(api_key, model)
    }

    /// Creates a new AI service instance with a specific API key and model
    pub fn with_api_key_and_model(api_key: String, model: String) -> Self {
        Self {
            client: Self::create_client(),
            api_key: Some(api_key),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the service at a different OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

#[async_trait]
impl CompletionClient for AIService {
    fn is_configured(&self) -> bool {
        self.usable_key().is_some()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> AIServiceResult<AIResponse<String>> {
        let api_key = self.usable_key().ok_or(AIServiceError::NoApiKey)?;

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        info!(
            "Making chat completion request: model={}, messages={}",
            request.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Chat completion request failed: {}", e);
                AIServiceError::Network(e)
            })?;

        let status = response.status();
        info!("Received chat completion response: status={}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_text);
            error!("Model API error: {} - {}", status, detail);
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, detail
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AIServiceError::InvalidResponse)?;

        let usage = completion.usage.unwrap_or_default();
        info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens(),
            "Chat completion finished"
        );

        Ok(AIResponse { data: text, usage })
    }
}

impl Default for AIService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_not_configured() {
        let service = AIService::with_api_key_and_model(
            PLACEHOLDER_API_KEY.to_string(),
            DEFAULT_MODEL.to_string(),
        );
        assert!(!service.is_configured());
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let service =
            AIService::with_api_key_and_model("   ".to_string(), DEFAULT_MODEL.to_string());
        assert!(!service.is_configured());
    }

    #[test]
    fn test_real_key_is_configured() {
        let service =
            AIService::with_api_key_and_model("sk-test".to_string(), "gpt-4o".to_string());
        assert!(service.is_configured());
        assert_eq!(service.model(), "gpt-4o");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let service = AIService::with_api_key_and_model("sk".to_string(), "m".to_string())
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(service.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hola")];
        let request = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1000);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hola");
    }

    #[test]
    fn test_error_display() {
        let error = AIServiceError::ApiError("API returned 500: boom".to_string());
        assert_eq!(error.to_string(), "API error: API returned 500: boom");
        assert_eq!(AIServiceError::NoApiKey.to_string(), "No API key configured");
    }
}
