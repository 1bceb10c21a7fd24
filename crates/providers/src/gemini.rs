//! Gemini native provider implementation.
//!
//! Uses Google's Generative Language API directly (not an OpenAI-compatible
//! proxy).
//!
//! Features:
//! - `x-goog-api-key` header authentication (not Bearer)
//! - `generateContent` for chat completions
//! - `embedContent` for query embeddings — Gemini is the only embedding
//!   backend in the system, used regardless of which chat provider won the
//!   startup selection

use async_trait::async_trait;
use connectsense_core::error::ProviderError;
use connectsense_core::provider::*;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini native API provider (chat fallback + embeddings).
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Fails with `NotConfigured` when the API key is absent or empty, so
    /// the startup selector sees the failure at construction time.
    pub fn new(api_key: Option<&str>) -> Result<Self, ProviderError> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => {
                return Err(ProviderError::NotConfigured(
                    "GOOGLE_API_KEY is not set".into(),
                ));
            }
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            name: "gemini".into(),
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

    /// Map an HTTP error status to a `ProviderError`.
    async fn error_for_status(
        status: u16,
        response: reqwest::Response,
    ) -> ProviderError {
        if status == 429 {
            return ProviderError::RateLimited {
                retry_after_secs: 5,
            };
        }
        if status == 401 || status == 403 {
            return ProviderError::AuthenticationFailed("Invalid Google API key".into());
        }
        let error_body = response.text().await.unwrap_or_default();
        warn!(status, body = %error_body, "Gemini API error");
        ProviderError::Api {
            status_code: status,
            message: error_body,
        }
    }

    fn map_transport_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError> {
        // Model ids carry their resource prefix ("models/gemini-2.0-flash").
        let url = format!("{}/v1beta/{}:generateContent", self.base_url, request.model);

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": &request.prompt }],
            }],
            "generationConfig": generation_config,
        });

        debug!(provider = "gemini", model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Self::error_for_status(status, response).await);
        }

        let api_resp: GenerateResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse Gemini response: {e}"))
        })?;

        let candidate = api_resp.candidates.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("No candidates in Gemini response".into())
        })?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = api_resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(CompletionResponse {
            text,
            model: request.model,
            usage,
        })
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        let url = format!("{}/v1beta/{}:embedContent", self.base_url, request.model);

        let body = serde_json::json!({
            "model": &request.model,
            "content": {
                "parts": [{ "text": &request.input }],
            },
        });

        debug!(
            provider = "gemini",
            model = %request.model,
            chars = request.input.len(),
            "Sending embedding request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Self::error_for_status(status, response).await);
        }

        let api_resp: EmbedResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse embedding response: {e}"))
        })?;

        Ok(EmbeddingResponse {
            embedding: api_resp.embedding.values,
            model: request.model,
        })
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_configured() {
        let result = GeminiProvider::new(None);
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn constructor_with_key() {
        let provider = GeminiProvider::new(Some("aiza-test")).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.base_url.contains("generativelanguage"));
    }

    #[test]
    fn parse_generate_response() {
        let data = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"text": "Consider a "}, {"text": "microwave backbone."}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 50, "candidatesTokenCount": 12, "totalTokenCount": 62}
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        assert_eq!(text, "Consider a microwave backbone.");
        assert_eq!(parsed.usage_metadata.unwrap().total_token_count, 62);
    }

    #[test]
    fn parse_generate_response_without_usage() {
        let data = r#"{"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.usage_metadata.is_none());
    }

    #[test]
    fn parse_embed_response() {
        let data = r#"{"embedding": {"values": [0.013, -0.008, 0.021]}}"#;
        let parsed: EmbedResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.embedding.values, vec![0.013, -0.008, 0.021]);
    }

    #[test]
    fn generate_url_keeps_model_prefix() {
        // "models/..." is part of the resource path, not stripped
        let url = format!(
            "{}/v1beta/{}:generateContent",
            DEFAULT_BASE_URL, "models/gemini-2.0-flash"
        );
        assert!(url.ends_with("/v1beta/models/gemini-2.0-flash:generateContent"));
    }
}
