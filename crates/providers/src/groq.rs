//! Groq provider implementation.
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint, so the
//! wire format below is the standard chat-completions shape with the
//! assembled prompt sent as a single user message.

use async_trait::async_trait;
use connectsense_core::error::ProviderError;
use connectsense_core::provider::*;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// The Groq chat provider (primary backend).
pub struct GroqProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GroqProvider {
    /// Create a new Groq provider.
    ///
    /// Fails with `NotConfigured` when the API key is absent or empty —
    /// construction is the fallback decision point, so a missing key must
    /// surface here, not on the first request.
    pub fn new(api_key: Option<&str>) -> Result<Self, ProviderError> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => {
                return Err(ProviderError::NotConfigured(
                    "GROQ_API_KEY is not set".into(),
                ));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            name: "groq".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key,
            client,
        })
    }

    /// Override the base URL (for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": &request.model,
            "messages": [{ "role": "user", "content": &request.prompt }],
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("No choices in response".into())
        })?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            model: api_response.model,
            usage,
        })
    }
}

// --- OpenAI-compatible API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let result = GroqProvider::new(None);
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn empty_key_is_not_configured() {
        let result = GroqProvider::new(Some("   "));
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn constructor_with_key() {
        let provider = GroqProvider::new(Some("gsk-test")).unwrap();
        assert_eq!(provider.name(), "groq");
        assert!(provider.base_url.contains("api.groq.com"));
    }

    #[test]
    fn base_url_override_trims_slash() {
        let provider = GroqProvider::new(Some("gsk-test"))
            .unwrap()
            .with_base_url("http://localhost:9999/");
        assert_eq!(provider.base_url, "http://localhost:9999");
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "llama-3.3-70b-versatile",
            "choices": [{"message": {"role": "assistant", "content": "Use GPON for the valley."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Use GPON for the valley.")
        );
        assert_eq!(parsed.usage.as_ref().unwrap().total_tokens, 160);
    }

    #[test]
    fn parse_response_without_usage() {
        let data = r#"{"model": "m", "choices": [{"message": {"content": "hi"}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.usage.is_none());
    }
}
