//! Provider trait — the abstraction over LLM backends.
//!
//! A Provider knows how to send an assembled prompt to an inference service
//! and get a text answer back, and (when the backend supports it) how to
//! compute embeddings for retrieval.
//!
//! Implementations: Groq (OpenAI-compatible endpoint), Gemini (native API).
//! Each turn issues at most one blocking completion — there is no streaming
//! and no tool calling in this system.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A completion request: one fully assembled prompt string.
///
/// The chat runtime builds the prompt (instruction + context window + new
/// question) before it reaches the provider, so the wire format below is a
/// single user turn regardless of backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// The assembled prompt text
    pub prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.5
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated answer text
    pub text: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An embedding request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The model to use for embeddings (e.g., "models/embedding-001").
    pub model: String,

    /// The text to embed.
    pub input: String,
}

/// An embedding response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The embedding vector.
    pub embedding: Vec<f32>,

    /// Which model was used.
    pub model: String,
}

/// The core Provider trait.
///
/// The chat runtime calls `complete()` without knowing which provider was
/// selected at startup — pure polymorphism.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq", "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and get a complete answer.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;

    /// Compute an embedding for the given text.
    ///
    /// Default implementation returns an error indicating embeddings aren't
    /// supported — only the Gemini backend implements this.
    async fn embed(
        &self,
        _request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        Err(ProviderError::NotConfigured(format!(
            "Provider '{}' does not support embeddings",
            self.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_defaults() {
        let req = CompletionRequest {
            model: "llama-3.3-70b-versatile".into(),
            prompt: "How do I connect a Himalayan school?".into(),
            temperature: default_temperature(),
            max_tokens: None,
        };
        assert!((req.temperature - 0.5).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn completion_request_deserializes_without_temperature() {
        let req: CompletionRequest =
            serde_json::from_str(r#"{"model":"m","prompt":"q"}"#).unwrap();
        assert!((req.temperature - 0.5).abs() < f32::EPSILON);
    }

    struct ChatOnlyProvider;

    #[async_trait]
    impl Provider for ChatOnlyProvider {
        fn name(&self) -> &str {
            "chat-only"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                text: "ok".into(),
                model: "test".into(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn embed_defaults_to_unsupported() {
        let provider = ChatOnlyProvider;
        let result = provider
            .embed(EmbeddingRequest {
                model: "models/embedding-001".into(),
                input: "text".into(),
            })
            .await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
