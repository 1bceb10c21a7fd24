//! Error types for the ConnectSense domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. Nothing here is allowed
//! to cross a turn boundary undisplayed — the chat runtime converts every
//! failure into either a visible reply or a degraded-mode flag.

use thiserror::Error;

/// The top-level error type for all ConnectSense operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Query engine errors ---
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether this failure stems from local configuration rather than the
    /// remote service. The selector logs the distinction; fallback treats
    /// both classes identically.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::NotConfigured(_) | ProviderError::AuthenticationFailed(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index artifact not found at {path}")]
    NotFound { path: String },

    #[error("Failed to read index artifact at {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse index artifact: {0}")]
    Parse(String),

    #[error("Chunk '{id}' has embedding of length {actual}, index declares {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },
}

/// Failures surfaced by the query engine at the turn boundary.
///
/// Index search is infallible once the artifact has loaded, so only the
/// two provider calls can fail here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Embedding failed: {0}")]
    Embedding(ProviderError),

    #[error("Generation failed: {0}")]
    Generation(ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn configuration_classification() {
        assert!(ProviderError::NotConfigured("no key".into()).is_configuration());
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_configuration());
        assert!(!ProviderError::Network("conn refused".into()).is_configuration());
        assert!(
            !ProviderError::Api {
                status_code: 500,
                message: "oops".into()
            }
            .is_configuration()
        );
    }

    #[test]
    fn index_error_displays_path() {
        let err = IndexError::NotFound {
            path: "vector_db/full_index.json".into(),
        };
        assert!(err.to_string().contains("vector_db/full_index.json"));
    }

    #[test]
    fn engine_error_wraps_provider_error() {
        let err = EngineError::Generation(ProviderError::Timeout("120s elapsed".into()));
        assert!(err.to_string().contains("Generation failed"));
        assert!(err.to_string().contains("120s"));
    }
}
