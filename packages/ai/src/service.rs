// ABOUTME: Generative service client for structured plan synthesis calls
// ABOUTME: Handles Anthropic API requests, fence stripping, and JSON response parsing

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 8192;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum GenerativeError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Response contained no content")]
    EmptyResponse,
}

pub type GenerativeResult<T> = Result<T, GenerativeError>;

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug)]
pub struct GenerativeResponse<T> {
    pub data: T,
    pub usage: Usage,
}

/// Client for structured generation calls against the Anthropic Messages API
pub struct GenerativeService {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl GenerativeService {
    fn build_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    /// Creates a service reading ANTHROPIC_API_KEY / ANTHROPIC_MODEL from the environment
    pub fn new() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY").ok();
        if api_key.is_none() {
            info!("ANTHROPIC_API_KEY not set - generative calls will fail until configured");
        }

        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            client: Self::build_client(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            model,
        }
    }

    /// Creates a service with an explicit API key
    pub fn with_api_key(api_key: String) -> Self {
        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            client: Self::build_client(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: Some(api_key),
            model,
        }
    }

    /// Override the endpoint URL (used by tests to point at a mock server)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the model for this service instance
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a structured generation call; the prompt must request JSON output
    /// conforming to `T` and the response body is parsed into it.
    pub async fn generate_structured<T: for<'de> Deserialize<'de>>(
        &self,
        prompt: String,
        system_prompt: Option<String>,
    ) -> GenerativeResult<GenerativeResponse<T>> {
        let raw = self.generate_text(prompt, system_prompt).await?;
        let json_text = strip_code_fences(&raw.data);

        let data: T = serde_json::from_str(json_text).map_err(|e| {
            error!(
                "Structured response parsing failed: {}. Snippet: {}",
                e,
                &json_text[..json_text.len().min(500)]
            );
            GenerativeError::Parse(format!("Failed to parse JSON: {}", e))
        })?;

        Ok(GenerativeResponse {
            data,
            usage: raw.usage,
        })
    }

    /// Makes a plain text generation call
    pub async fn generate_text(
        &self,
        prompt: String,
        system_prompt: Option<String>,
    ) -> GenerativeResult<GenerativeResponse<String>> {
        let api_key = self.api_key.as_ref().ok_or(GenerativeError::NoApiKey)?;

        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            system: system_prompt,
        };

        info!(
            "Generative request: model={}, max_tokens={}",
            request.model, request.max_tokens
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Generative request timed out after {}s", REQUEST_TIMEOUT_SECS);
                    GenerativeError::Api(format!(
                        "Request timed out after {} seconds",
                        REQUEST_TIMEOUT_SECS
                    ))
                } else {
                    error!("Generative request failed: {}", e);
                    GenerativeError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Generative API error: {} - {}", status, error_text);
            return Err(GenerativeError::Api(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GenerativeError::Parse(e.to_string()))?;

        let text = parsed
            .content
            .first()
            .ok_or(GenerativeError::EmptyResponse)?
            .text
            .clone();

        Ok(GenerativeResponse {
            data: text,
            usage: parsed.usage,
        })
    }
}

impl Default for GenerativeService {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip markdown code fences (```json ... ```) the model sometimes wraps
/// JSON output in, returning the inner text.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let start = trimmed.find('\n').map(|i| i + 1).unwrap_or(0);
    let end = trimmed[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(trimmed.len());
    trimmed[start..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Greeting {
        message: String,
    }

    fn messages_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 12, "output_tokens": 34}
        })
    }

    #[test]
    fn test_strip_code_fences_plain_text() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_json_fence() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_generate_structured_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(messages_body("```json\n{\"message\": \"hi\"}\n```")),
            )
            .mount(&server)
            .await;

        let service = GenerativeService::with_api_key("test-key".to_string())
            .with_api_url(format!("{}/v1/messages", server.uri()));

        let response: GenerativeResponse<Greeting> = service
            .generate_structured("say hi as JSON".to_string(), None)
            .await
            .unwrap();

        assert_eq!(response.data.message, "hi");
        assert_eq!(response.usage.total_tokens(), 46);
    }

    #[tokio::test]
    async fn test_generate_structured_rejects_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("not json")))
            .mount(&server)
            .await;

        let service = GenerativeService::with_api_key("test-key".to_string())
            .with_api_url(server.uri());

        let result: GenerativeResult<GenerativeResponse<Greeting>> = service
            .generate_structured("say hi".to_string(), None)
            .await;

        assert!(matches!(result, Err(GenerativeError::Parse(_))));
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let service = GenerativeService::with_api_key("test-key".to_string())
            .with_api_url(server.uri());

        let result = service.generate_text("hello".to_string(), None).await;
        assert!(matches!(result, Err(GenerativeError::Api(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let service =
            GenerativeService::with_api_key("k".to_string()).with_api_url("http://unused");
        // rebuild without a key by hand
        let service = GenerativeService {
            api_key: None,
            ..service
        };
        let result = service.generate_text("hello".to_string(), None).await;
        assert!(matches!(result, Err(GenerativeError::NoApiKey)));
    }
}
